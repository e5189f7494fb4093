//! This module re-exports various items from the `entity_api` crate.
//!
//! The purpose of this re-export is to ensure that consumers of the `domain` crate do not need to
//! directly depend on the `entity_api` crate. By re-exporting these items, we provide a clear and
//! consistent interface for working with query filters within the domain layer, while encapsulating
//! the underlying implementation details remain in the `entity_api` crate.
pub use entity_api::{
    mutate::{IntoUpdateMap, UpdateMap},
    IntoQueryFilterMap, QueryFilterMap,
};

// Re-exports from `entity` crate via `entity_api`
pub use entity_api::{
    conversations, learning_materials, messages, practice_quizzes, questions, users, Id,
};

pub use entity::{
    difficulty, json_list, material_type, message_role, processing_status, question_type,
    quiz_status,
};

pub mod agent_chat;
pub mod auth;
pub mod conversation;
pub mod error;
pub mod jwt;
pub mod learning_material;
pub mod message;
pub mod practice_quiz;
pub mod question;
pub mod rag;
pub mod user;

pub mod gateway;

/// Turns a requested page size into a usable one: missing or non-positive values fall back to
/// `default`, anything above `max` is capped.
pub fn clamp_limit(requested: Option<i64>, default: u64, max: u64) -> u64 {
    match requested {
        Some(limit) if limit > 0 => (limit as u64).min(max),
        _ => default,
    }
}

/// Parses an optional id taken from a query string; blank counts as absent.
pub(crate) fn parse_optional_id(
    value: Option<&str>,
    message: &str,
) -> Result<Option<Id>, error::Error> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => Id::parse_str(value)
            .map(Some)
            .map_err(|_| error::Error::input(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limit_uses_default_for_missing_or_non_positive() {
        assert_eq!(clamp_limit(None, 50, 100), 50);
        assert_eq!(clamp_limit(Some(0), 50, 100), 50);
        assert_eq!(clamp_limit(Some(-3), 20, 50), 20);
    }

    #[test]
    fn clamp_limit_caps_at_max() {
        assert_eq!(clamp_limit(Some(7), 50, 100), 7);
        assert_eq!(clamp_limit(Some(500), 50, 100), 100);
        assert_eq!(clamp_limit(Some(51), 20, 50), 50);
    }

    #[test]
    fn parse_optional_id_rejects_garbage() {
        let id = Id::new_v4();
        assert_eq!(
            parse_optional_id(Some(&id.to_string()), "Invalid materialId").unwrap(),
            Some(id)
        );
        assert_eq!(parse_optional_id(Some("  "), "Invalid materialId").unwrap(), None);
        assert_eq!(
            parse_optional_id(Some("abc"), "Invalid materialId")
                .unwrap_err()
                .message(),
            "Invalid materialId"
        );
    }
}
