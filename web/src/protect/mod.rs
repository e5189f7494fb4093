//! Route layers that authorize access to a resource before its controller runs.
//!
//! Each submodule guards one kind of resource. A resource that doesn't belong to the
//! authenticated user is answered exactly like a missing one, so ids of other users'
//! records can't be probed.

pub(crate) mod conversations;
