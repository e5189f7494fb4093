//! Request bodies and query strings accepted by the REST controllers.
//!
//! These types only describe the wire format. Validation that needs more than serde
//! (blank strings, ranges, ownership) happens in the `domain` layer.

pub(crate) mod agent;
pub(crate) mod auth;
pub(crate) mod conversation;
pub(crate) mod material;
pub(crate) mod message;
pub(crate) mod practice_quiz;
pub(crate) mod question;
pub(crate) mod rag;
