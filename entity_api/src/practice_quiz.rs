use super::error::Error;
use crate::query::{self, QueryOptions};
use crate::QueryFilterMap;
use entity::practice_quizzes::{ActiveModel, Column, Entity, Model, QuizSubmission};
use entity::quiz_status::QuizStatus;
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ActiveValue::Unchanged, ConnectionTrait, Order, Set};

pub async fn create(db: &impl ConnectionTrait, quiz_model: Model) -> Result<Model, Error> {
    debug!(
        "New Practice Quiz with {} questions for conversation {}",
        quiz_model.questions.0.len(),
        quiz_model.conversation_id
    );

    let now = chrono::Utc::now();
    let quiz_active_model: ActiveModel = ActiveModel {
        user_id: Set(quiz_model.user_id),
        conversation_id: Set(quiz_model.conversation_id),
        material_ids: Set(quiz_model.material_ids),
        question_type: Set(quiz_model.question_type),
        difficulty: Set(quiz_model.difficulty),
        count: Set(quiz_model.count),
        status: Set(QuizStatus::Generated),
        material_summary: Set(quiz_model.material_summary),
        questions: Set(quiz_model.questions),
        submissions: Set(Default::default()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(quiz_active_model.insert(db).await?)
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

/// Appends a graded submission and marks the quiz completed.
pub async fn record_submission(
    db: &impl ConnectionTrait,
    quiz: Model,
    submission: QuizSubmission,
) -> Result<Model, Error> {
    debug!(
        "Recording submission for Practice Quiz {} scoring {}",
        quiz.id, submission.summary.score
    );

    let mut submissions = quiz.submissions;
    submissions.0.push(submission);

    let active_model = ActiveModel {
        id: Unchanged(quiz.id),
        status: Set(QuizStatus::Completed),
        submissions: Set(submissions),
        updated_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    };

    Ok(active_model.update(db).await?)
}
