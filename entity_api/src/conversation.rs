use super::error::Error;
use entity::conversations::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{
    entity::prelude::*, ActiveValue::Unchanged, ConnectionTrait, DatabaseConnection, QueryOrder,
    Set,
};

pub async fn create(db: &DatabaseConnection, user_id: Id, title: String) -> Result<Model, Error> {
    debug!("New Conversation for user {user_id} with title {title:?}");

    let now = chrono::Utc::now();
    let conversation_active_model: ActiveModel = ActiveModel {
        user_id: Set(user_id),
        title: Set(title),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(conversation_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::record_not_found)
}

/// Finds a conversation only if `user_id` owns it.
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

/// Most recently active first.
pub async fn find_by_user(db: &DatabaseConnection, user_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_desc(Column::UpdatedAt)
        .all(db)
        .await?)
}

pub async fn update_title(db: &DatabaseConnection, id: Id, title: String) -> Result<Model, Error> {
    let conversation = find_by_id(db, id).await?;
    debug!("Existing Conversation model to be Updated: {conversation:?}");

    let active_model = ActiveModel {
        id: Unchanged(conversation.id),
        user_id: Unchanged(conversation.user_id),
        title: Set(title),
        created_at: Unchanged(conversation.created_at),
        updated_at: Set(chrono::Utc::now().into()),
    };

    Ok(active_model.update(db).await?)
}

/// Bumps `updated_at` so the conversation sorts first.
pub async fn touch(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    let active_model = ActiveModel {
        id: Unchanged(id),
        updated_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    };

    Ok(active_model.update(db).await?)
}

pub async fn delete_by_id(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    let result = Entity::delete_by_id(id).exec(db).await?;

    if result.rows_affected == 0 {
        warn!("Conversation with id {id} not found for deletion");
        return Err(Error::record_not_found());
    }

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
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction};

    fn conversation_model(user_id: Id) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            user_id,
            title: "Cell biology".to_owned(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_returns_a_new_conversation_model() -> Result<(), Error> {
        let user_id = Id::new_v4();
        let conversation = conversation_model(user_id);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![conversation.clone()]])
            .into_connection();

        let created = create(&db, user_id, "Cell biology".to_owned()).await?;

        assert_eq!(created, conversation);

        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_and_user_returns_not_found_for_foreign_conversation() {
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
    async fn find_by_id_and_user_filters_on_owner() -> Result<(), Error> {
        let user_id = Id::new_v4();
        let conversation = conversation_model(user_id);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![conversation.clone()]])
            .into_connection();

        find_by_id_and_user(&db, conversation.id, user_id).await?;

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"SELECT "conversations"."id", "conversations"."user_id", "conversations"."title", "conversations"."created_at", "conversations"."updated_at" FROM "learning_assistant"."conversations" WHERE "conversations"."id" = $1 AND "conversations"."user_id" = $2 LIMIT $3"#,
                [
                    conversation.id.into(),
                    user_id.into(),
                    sea_orm::Value::BigUnsigned(Some(1))
                ]
            )]
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_title_returns_the_updated_conversation() -> Result<(), Error> {
        let conversation = conversation_model(Id::new_v4());
        let renamed = Model {
            title: "Genetics".to_owned(),
            ..conversation.clone()
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![conversation.clone()], vec![renamed.clone()]])
            .into_connection();

        let result = update_title(&db, conversation.id, "Genetics".to_owned()).await?;

        assert_eq!(result.title, "Genetics");

        Ok(())
    }

    #[tokio::test]
    async fn delete_by_id_deletes_a_single_conversation() -> Result<(), Error> {
        let id = Id::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        delete_by_id(&db, id).await?;

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"DELETE FROM "learning_assistant"."conversations" WHERE "conversations"."id" = $1"#,
                [id.into()]
            )]
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_by_id_reports_missing_conversation() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = delete_by_id(&db, Id::new_v4()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }
}
