use crate::error::Error;
use crate::message_role::MessageRole;
use crate::messages::Model;
use crate::{conversation, Id};
use entity_api::message;
use sea_orm::DatabaseConnection;

/// Only chat participants may author messages.
pub fn parse_role(role: &str) -> Result<MessageRole, Error> {
    match role.trim() {
        "user" => Ok(MessageRole::User),
        "assistant" => Ok(MessageRole::Assistant),
        _ => Err(Error::input("Role must be either user or assistant")),
    }
}

/// Oldest first. The conversation must belong to `user_id`.
pub async fn find_by_conversation(
    db: &DatabaseConnection,
    conversation_id: Id,
    user_id: Id,
) -> Result<Vec<Model>, Error> {
    conversation::find_by_id_and_user(db, conversation_id, user_id).await?;
    Ok(message::find_by_conversation(db, conversation_id).await?)
}

pub async fn create(
    db: &DatabaseConnection,
    conversation_id: Id,
    user_id: Id,
    role: &str,
    content: &str,
) -> Result<Model, Error> {
    let role = parse_role(role)?;
    if content.trim().is_empty() {
        return Err(Error::input("Content is required"));
    }

    conversation::find_by_id_and_user(db, conversation_id, user_id).await?;
    let message = message::create(db, conversation_id, role, content.to_string()).await?;
    conversation::touch(db, conversation_id).await?;

    Ok(message)
}


#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use crate::conversations;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn messages_of_foreign_conversation_are_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<conversations::Model>::new()])
            .into_connection();

        let err = find_by_conversation(&db, Id::new_v4(), Id::new_v4())
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Conversation not found");
    }

    #[tokio::test]
    async fn create_persists_message_and_touches_conversation() -> Result<(), Error> {
        let now = chrono::Utc::now();
        let user_id = Id::new_v4();
        let conversation = conversations::Model {
            id: Id::new_v4(),
            user_id,
            title: "Biology".to_string(),
            created_at: now.into(),
            updated_at: now.into(),
        };
        let message = Model {
            id: Id::new_v4(),
            conversation_id: conversation.id,
            role: MessageRole::User,
            content: "What is ATP?".to_string(),
            created_at: now.into(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![conversation.clone()]])
            .append_query_results(vec![vec![message.clone()]])
            .append_query_results(vec![vec![conversation.clone()]])
            .into_connection();

        let created = create(&db, conversation.id, user_id, "user", "What is ATP?").await?;

        assert_eq!(created, message);
        Ok(())
    }
}
