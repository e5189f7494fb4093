use crate::{error::Error, QueryFilterMap};
use sea_orm::strum::IntoEnumIterator;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect, Value,
};

/// Ordering and paging applied after filtering.
pub struct QueryOptions<C> {
    pub sort: Option<(C, Order)>,
    pub limit: Option<u64>,
}

impl<C> Default for QueryOptions<C> {
    fn default() -> Self {
        Self {
            sort: None,
            limit: None,
        }
    }
}

/// Find all records of an entity by the given query filter map.
pub async fn find_by<E, C>(
    db: &impl ConnectionTrait,
    query_filter_map: QueryFilterMap,
    options: QueryOptions<C>,
) -> Result<Vec<E::Model>, Error>
where
    E: EntityTrait<Column = C>,
    C: ColumnTrait + IntoEnumIterator,
{
    let mut query = E::find();

    // We iterate through the entity's defined columns so that we only attempt
    // to filter by columns that exist.
    for column in C::iter() {
        if let Some(value) = query_filter_map.get(&column.to_string()) {
            query = match value {
                Value::Uuid(None) => query.filter(column.is_null()),
                value => query.filter(column.eq(value)),
            };
        }
    }

    if let Some((column, order)) = options.sort {
        query = query.order_by(column, order);
    }

    if let Some(limit) = options.limit {
        query = query.limit(limit);
    }

    Ok(query.all(db).await?)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use entity::conversations::{Column, Entity, Model};
    use entity::Id;
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction};

    #[tokio::test]
    async fn find_by_filters_sorts_and_limits() -> Result<(), Error> {
        let now = chrono::Utc::now();
        let user_id = Id::new_v4();
        let conversation = Model {
            id: Id::new_v4(),
            user_id,
            title: "Biology".to_owned(),
            created_at: now.into(),
            updated_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![conversation.clone()]])
            .into_connection();

        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert("user_id".to_string(), Some(Value::from(user_id)));
        query_filter_map.insert("not_a_column".to_string(), Some(Value::from(1)));

        let results = find_by::<Entity, Column>(
            &db,
            query_filter_map,
            QueryOptions {
                sort: Some((Column::UpdatedAt, Order::Desc)),
                limit: Some(10),
            },
        )
        .await?;

        assert_eq!(results, vec![conversation]);

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"SELECT "conversations"."id", "conversations"."user_id", "conversations"."title", "conversations"."created_at", "conversations"."updated_at" FROM "learning_assistant"."conversations" WHERE "conversations"."user_id" = $1 ORDER BY "conversations"."updated_at" DESC LIMIT $2"#,
                [user_id.into(), sea_orm::Value::BigUnsigned(Some(10))]
            )]
        );

        Ok(())
    }

    #[tokio::test]
    async fn find_by_treats_a_null_uuid_as_is_null() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<entity::learning_materials::Model>::new()])
            .into_connection();

        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert("conversation_id".to_string(), Some(Value::Uuid(None)));

        let results = find_by::<entity::learning_materials::Entity, entity::learning_materials::Column>(
            &db,
            query_filter_map,
            QueryOptions::default(),
        )
        .await?;

        assert!(results.is_empty());

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("IS NULL"));

        Ok(())
    }
}
