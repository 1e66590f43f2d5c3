/*!
Role based access control for contracts.

A contract holds one [`Roles`] controller and asks it whether a caller holds
a given role before running a privileged operation. Membership is plain
storage, so tests can set it up with `grant` and mock storage.
*/

mod roles;

pub use roles::{RoleError, Roles};
