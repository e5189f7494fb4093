use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Eq, PartialEq, EnumIter, Deserialize, Default, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "quiz_status")]
pub enum QuizStatus {
    #[sea_orm(string_value = "generated")]
    #[default]
    Generated,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl std::fmt::Display for QuizStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizStatus::Generated => write!(fmt, "generated"),
            QuizStatus::Completed => write!(fmt, "completed"),
        }
    }
}
