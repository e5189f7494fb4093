use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Eq, PartialEq, EnumIter, Deserialize, Default, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "question_type")]
pub enum QuestionType {
    #[sea_orm(string_value = "multiple_choice")]
    #[default]
    MultipleChoice,
    #[sea_orm(string_value = "true_false")]
    TrueFalse,
    #[sea_orm(string_value = "short_answer")]
    ShortAnswer,
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionType::MultipleChoice => write!(fmt, "multiple_choice"),
            QuestionType::TrueFalse => write!(fmt, "true_false"),
            QuestionType::ShortAnswer => write!(fmt, "short_answer"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "multiple_choice" => Ok(QuestionType::MultipleChoice),
            "true_false" => Ok(QuestionType::TrueFalse),
            "short_answer" => Ok(QuestionType::ShortAnswer),
            other => Err(format!("Unknown question type: {other}")),
        }
    }
}
