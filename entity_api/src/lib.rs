use sea_orm::Value;
use std::collections::HashMap;

pub use entity::{
    conversations, learning_materials, messages, practice_quizzes, questions, users, Id,
};

pub mod conversation;
pub mod error;
pub mod learning_material;
pub mod message;
pub mod mutate;
pub mod practice_quiz;
pub mod query;
pub mod question;
pub mod user;

/// `QueryFilterMap` is a data structure that serves as a bridge for translating filter parameters
/// between different layers of the application. It is essentially a wrapper around a `HashMap`
/// where the keys are filter parameter names (as `String`) and the values are optional `Value` types
/// from `sea_orm`.
///
/// A `Value::Uuid(None)` entry filters for rows where that column IS NULL, which is how
/// "unassigned" materials are selected.
///
/// # Example
///
/// ```
/// use sea_orm::Value;
/// use entity_api::{Id, QueryFilterMap};
///
/// let mut query_filter_map = QueryFilterMap::new();
/// query_filter_map.insert("user_id".to_string(), Some(Value::from(Id::new_v4())));
/// let filter_value = query_filter_map.get("user_id");
/// assert!(filter_value.is_some());
/// ```
pub struct QueryFilterMap {
    map: HashMap<String, Option<Value>>,
}

impl QueryFilterMap {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        // HashMap.get returns an Option and so we need to "flatten" this to a single Option
        self.map
            .get(key)
            .and_then(|inner_option| inner_option.clone())
    }

    pub fn insert(&mut self, key: String, value: Option<Value>) {
        self.map.insert(key, value);
    }
}

impl Default for QueryFilterMap {
    fn default() -> Self {
        Self::new()
    }
}

/// `IntoQueryFilterMap` is a trait that provides a method for converting a struct into a `QueryFilterMap`.
/// This is particularly useful for translating data between different layers of the application,
/// such as from web request parameters to database query filters.
pub trait IntoQueryFilterMap {
    fn into_query_filter_map(self) -> QueryFilterMap;
}
