use super::error::Error;
use crate::mutate::{self, UpdateMap};
use crate::query::{self, QueryOptions};
use crate::QueryFilterMap;
use entity::learning_materials::{ActiveModel, Column, Entity, Model};
use entity::processing_status::ProcessingStatus;
use entity::Id;
use log::*;
use sea_orm::{
    entity::prelude::*, ActiveValue::Unchanged, ConnectionTrait, IntoActiveModel, Order,
    QueryOrder, Set,
};

pub async fn create(db: &impl ConnectionTrait, material_model: Model) -> Result<Model, Error> {
    debug!("New Learning Material Model to be inserted: {material_model:?}");

    let now = chrono::Utc::now();
    let material_active_model: ActiveModel = ActiveModel {
        user_id: Set(material_model.user_id),
        conversation_id: Set(material_model.conversation_id),
        course_name: Set(material_model.course_name),
        material_type: Set(material_model.material_type),
        description: Set(material_model.description),
        file_path: Set(material_model.file_path),
        file_size: Set(material_model.file_size),
        original_filename: Set(material_model.original_filename),
        processing_status: Set(ProcessingStatus::Pending),
        processing_error: Set(None),
        processed_at: Set(None),
        vector_document_count: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(material_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::record_not_found)
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

/// Newest first. A `conversation_id` filter of `Value::Uuid(None)` selects unassigned materials.
pub async fn find_by(
    db: &impl ConnectionTrait,
    query_filter_map: QueryFilterMap,
) -> Result<Vec<Model>, Error> {
    query::find_by::<Entity, Column>(
        db,
        query_filter_map,
        QueryOptions {
            sort: Some((Column::CreatedAt, Order::Desc)),
            limit: None,
        },
    )
    .await
}

pub async fn find_by_conversation(
    db: &impl ConnectionTrait,
    conversation_id: Id,
    user_id: Id,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::ConversationId.eq(conversation_id))
        .filter(Column::UserId.eq(user_id))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// Ids of the conversation's materials that the RAG service has indexed.
pub async fn find_processed_ids(
    db: &impl ConnectionTrait,
    conversation_id: Id,
    user_id: Id,
) -> Result<Vec<Id>, Error> {
    Ok(Entity::find()
        .filter(Column::ConversationId.eq(conversation_id))
        .filter(Column::UserId.eq(user_id))
        .filter(Column::ProcessingStatus.eq(ProcessingStatus::Processed))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(|material| material.id)
        .collect())
}

pub async fn update(
    db: &impl ConnectionTrait,
    id: Id,
    update_map: UpdateMap,
) -> Result<Model, Error> {
    let material = find_by_id(db, id).await?;
    debug!("Existing Learning Material model to be Updated: {material:?}");

    mutate::update::<ActiveModel, Column>(db, material.into_active_model(), update_map).await
}

/// Moves a material into `processing` and clears any previous failure.
pub async fn mark_processing(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    let active_model = ActiveModel {
        id: Unchanged(id),
        processing_status: Set(ProcessingStatus::Processing),
        processing_error: Set(None),
        updated_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    };

    Ok(active_model.update(db).await?)
}

pub async fn mark_processed(
    db: &impl ConnectionTrait,
    id: Id,
    vector_document_count: Option<i32>,
) -> Result<Model, Error> {
    let now = chrono::Utc::now();
    let active_model = ActiveModel {
        id: Unchanged(id),
        processing_status: Set(ProcessingStatus::Processed),
        processing_error: Set(None),
        processed_at: Set(Some(now.into())),
        vector_document_count: Set(vector_document_count),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.update(db).await?)
}

pub async fn mark_failed(
    db: &impl ConnectionTrait,
    id: Id,
    processing_error: String,
) -> Result<Model, Error> {
    warn!("Learning Material {id} failed processing: {processing_error}");

    let active_model = ActiveModel {
        id: Unchanged(id),
        processing_status: Set(ProcessingStatus::Failed),
        processing_error: Set(Some(processing_error)),
        updated_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    };

    Ok(active_model.update(db).await?)
}

pub async fn delete_by_id(db: &impl ConnectionTrait, id: Id) -> Result<(), Error> {
    Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use entity::material_type::MaterialType;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    fn material_model(user_id: Id, conversation_id: Option<Id>) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            user_id,
            conversation_id,
            course_name: "Biology 101".to_owned(),
            material_type: MaterialType::Lecture,
            description: String::new(),
            file_path: format!("{user_id}/1700000000000_cells.pdf"),
            file_size: 2048,
            original_filename: "cells.pdf".to_owned(),
            processing_status: ProcessingStatus::Pending,
            processing_error: None,
            processed_at: None,
            vector_document_count: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_returns_a_pending_material() -> Result<(), Error> {
        let material = material_model(Id::new_v4(), None);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![material.clone()]])
            .into_connection();

        let created = create(&db, material.clone()).await?;

        assert_eq!(created.processing_status, ProcessingStatus::Pending);
        assert_eq!(created.id, material.id);

        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_and_user_returns_not_found_for_foreign_material() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = find_by_id_and_user(&db, Id::new_v4(), Id::new_v4()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn find_processed_ids_returns_only_ids() -> Result<(), Error> {
        let user_id = Id::new_v4();
        let conversation_id = Id::new_v4();
        let processed = Model {
            processing_status: ProcessingStatus::Processed,
            ..material_model(user_id, Some(conversation_id))
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![processed.clone()]])
            .into_connection();

        let ids = find_processed_ids(&db, conversation_id, user_id).await?;

        assert_eq!(ids, vec![processed.id]);

        Ok(())
    }

    #[tokio::test]
    async fn mark_failed_records_the_error() -> Result<(), Error> {
        let failed = Model {
            processing_status: ProcessingStatus::Failed,
            processing_error: Some("RAG service error".to_owned()),
            ..material_model(Id::new_v4(), None)
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![failed.clone()]])
            .into_connection();

        let result = mark_failed(&db, failed.id, "RAG service error".to_owned()).await?;

        assert_eq!(result.processing_status, ProcessingStatus::Failed);
        assert_eq!(result.processing_error.as_deref(), Some("RAG service error"));

        Ok(())
    }

    #[tokio::test]
    async fn update_applies_only_mapped_columns() -> Result<(), Error> {
        let material = material_model(Id::new_v4(), None);
        let renamed = Model {
            course_name: "Biology 102".to_owned(),
            ..material.clone()
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![material.clone()], vec![renamed.clone()]])
            .into_connection();

        let mut update_map = UpdateMap::new();
        update_map.insert(
            "course_name".to_string(),
            Some(Value::from("Biology 102".to_string())),
        );

        let result = update(&db, material.id, update_map).await?;

        assert_eq!(result.course_name, "Biology 102");

        Ok(())
    }
}
