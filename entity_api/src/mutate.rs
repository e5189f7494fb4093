use crate::error::Error;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, Value,
};
use std::collections::HashMap;

/// Column that is bumped on every partial update when the entity has one.
const UPDATED_AT: &str = "updated_at";

/// Applies a partial update to an existing record.
///
/// Only the columns named in `update_map` are written; names that are not columns of the
/// entity are ignored. When the entity has an `updated_at` column and the map doesn't set
/// it, it's set to now.
pub async fn update<A, C>(
    db: &impl ConnectionTrait,
    mut active_model: A,
    update_map: UpdateMap,
) -> Result<<A::Entity as EntityTrait>::Model, Error>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    C: ColumnTrait,
    A::Entity: EntityTrait<Column = C>,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    for column in C::iter() {
        let name = column.to_string();
        if let Some(value) = update_map.get(&name) {
            active_model.set(column, value.clone());
        } else if name == UPDATED_AT {
            let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
            active_model.set(column, now.into());
        }
    }
    Ok(active_model.update(db).await?)
}

/// Column names mapped to their new values.
#[derive(Debug, Default)]
pub struct UpdateMap {
    map: HashMap<String, Option<Value>>,
}

impl UpdateMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key).and_then(|opt| opt.as_ref())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.map.remove(key).and_then(|opt| opt)
    }

    pub fn insert(&mut self, key: String, value: Option<Value>) {
        self.map.insert(key, value);
    }

    /// True when no column carries a value, i.e. the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.map.values().all(Option::is_none)
    }
}

pub trait IntoUpdateMap {
    fn into_update_map(self) -> UpdateMap;
}
