//! Response DTOs for resources whose wire shape differs from their database model.

pub(crate) mod auth;
pub(crate) mod material;
pub(crate) mod practice_quiz;
