//! JSON-backed list columns.

use crate::Id;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A list of strings stored as a `jsonb` array (question options, tags).
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct StringList(pub Vec<String>);

impl From<Vec<String>> for StringList {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

/// A list of entity ids stored as a `jsonb` array.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
#[schema(value_type = Vec<String>)]
pub struct IdList(pub Vec<Id>);

impl From<Vec<Id>> for IdList {
    fn from(values: Vec<Id>) -> Self {
        Self(values)
    }
}
