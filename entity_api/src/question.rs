use super::error::Error;
use crate::mutate::{self, UpdateMap};
use crate::query::{self, QueryOptions};
use crate::QueryFilterMap;
use entity::questions::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{
    entity::prelude::*, ActiveValue::Unchanged, ConnectionTrait, IntoActiveModel, Order, Set,
};

pub async fn create(db: &impl ConnectionTrait, question_model: Model) -> Result<Model, Error> {
    debug!("New Question Model to be inserted: {question_model:?}");

    let now = chrono::Utc::now();
    let question_active_model: ActiveModel = ActiveModel {
        user_id: Set(question_model.user_id),
        conversation_id: Set(question_model.conversation_id),
        material_id: Set(question_model.material_id),
        question: Set(question_model.question),
        question_type: Set(question_model.question_type),
        options: Set(question_model.options),
        correct_answer: Set(question_model.correct_answer),
        explanation: Set(question_model.explanation),
        difficulty: Set(question_model.difficulty),
        tags: Set(question_model.tags),
        source_summary: Set(question_model.source_summary),
        attempts: Set(0),
        correct_attempts: Set(0),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(question_active_model.insert(db).await?)
}

pub async fn find_by_id_and_user(
    db: &impl ConnectionTrait,
    id: Id,
    user_id: Id,
) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .filter(Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(Error::record_not_found)
}

/// Newest first, at most `limit` rows.
pub async fn find_by(
    db: &impl ConnectionTrait,
    query_filter_map: QueryFilterMap,
    limit: u64,
) -> Result<Vec<Model>, Error> {
    query::find_by::<Entity, Column>(
        db,
        query_filter_map,
        QueryOptions {
            sort: Some((Column::CreatedAt, Order::Desc)),
            limit: Some(limit),
        },
    )
    .await
}

pub async fn update(
    db: &impl ConnectionTrait,
    question: Model,
    update_map: UpdateMap,
) -> Result<Model, Error> {
    debug!("Existing Question model to be Updated: {question:?}");

    mutate::update::<ActiveModel, Column>(db, question.into_active_model(), update_map).await
}

/// Counts one graded attempt against the question.
pub async fn record_attempt(
    db: &impl ConnectionTrait,
    question: Model,
    is_correct: bool,
) -> Result<Model, Error> {
    let correct_attempts = if is_correct {
        question.correct_attempts + 1
    } else {
        question.correct_attempts
    };

    let active_model = ActiveModel {
        id: Unchanged(question.id),
        attempts: Set(question.attempts + 1),
        correct_attempts: Set(correct_attempts),
        updated_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    };

    Ok(active_model.update(db).await?)
}

pub async fn delete_by_id(db: &impl ConnectionTrait, id: Id) -> Result<(), Error> {
    Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}
