use crate::conversations::{Model, DEFAULT_TITLE};
use crate::error::Error;
use crate::Id;
use entity_api::conversation;
use log::*;
use sea_orm::DatabaseConnection;

pub use entity_api::conversation::{find_by_user, touch};

const NOT_FOUND: &str = "Conversation not found";

/// Trims a requested title; blank or absent becomes the default title.
pub fn normalize_title(title: Option<&str>) -> String {
    match title.map(str::trim) {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => DEFAULT_TITLE.to_string(),
    }
}

pub async fn create(
    db: &DatabaseConnection,
    user_id: Id,
    title: Option<&str>,
) -> Result<Model, Error> {
    Ok(conversation::create(db, user_id, normalize_title(title)).await?)
}

/// A conversation owned by someone else is reported as missing.
pub async fn find_by_id_and_user(
    db: &DatabaseConnection,
    id: Id,
    user_id: Id,
) -> Result<Model, Error> {
    conversation::find_by_id_and_user(db, id, user_id)
        .await
        .map_err(|e| Error::from(e).with_not_found_message(NOT_FOUND))
}

pub async fn update_title(
    db: &DatabaseConnection,
    id: Id,
    user_id: Id,
    title: Option<&str>,
) -> Result<Model, Error> {
    let title = title
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .ok_or_else(|| Error::input("Title is required"))?;

    find_by_id_and_user(db, id, user_id).await?;
    Ok(conversation::update_title(db, id, title.to_string()).await?)
}

/// Messages and practice quizzes go with the conversation; materials and questions stay,
/// unassigned.
pub async fn delete(db: &DatabaseConnection, id: Id, user_id: Id) -> Result<(), Error> {
    find_by_id_and_user(db, id, user_id).await?;
    debug!("Deleting conversation {id}");

    conversation::delete_by_id(db, id)
        .await
        .map_err(|e| Error::from(e).with_not_found_message(NOT_FOUND))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_title_trims_and_defaults() {
        assert_eq!(normalize_title(Some("  Biology 101 ")), "Biology 101");
        assert_eq!(normalize_title(Some("   ")), "New Chat");
        assert_eq!(normalize_title(None), "New Chat");
    }
}
