use super::error::Error;
use entity::message_role::MessageRole;
use entity::messages::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{
    entity::prelude::*, ConnectionTrait, QueryOrder, QuerySelect, Set,
};

pub async fn create(
    db: &impl ConnectionTrait,
    conversation_id: Id,
    role: MessageRole,
    content: String,
) -> Result<Model, Error> {
    debug!("New {role} Message for conversation {conversation_id}");

    let message_active_model: ActiveModel = ActiveModel {
        conversation_id: Set(conversation_id),
        role: Set(role),
        content: Set(content),
        created_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    };

    Ok(message_active_model.insert(db).await?)
}

/// Oldest first.
pub async fn find_by_conversation(
    db: &impl ConnectionTrait,
    conversation_id: Id,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::ConversationId.eq(conversation_id))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// The newest `limit` messages of a conversation, returned in chronological order.
pub async fn find_recent(
    db: &impl ConnectionTrait,
    conversation_id: Id,
    limit: u64,
) -> Result<Vec<Model>, Error> {
    let mut messages = Entity::find()
        .filter(Column::ConversationId.eq(conversation_id))
        .order_by_desc(Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await?;

    messages.reverse();
    Ok(messages)
}
