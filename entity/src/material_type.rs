use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Eq, PartialEq, EnumIter, Deserialize, Default, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "material_type")]
pub enum MaterialType {
    #[sea_orm(string_value = "lecture")]
    Lecture,
    #[sea_orm(string_value = "textbook")]
    Textbook,
    #[sea_orm(string_value = "slides")]
    Slides,
    #[sea_orm(string_value = "assignment")]
    Assignment,
    #[sea_orm(string_value = "other")]
    #[default]
    Other,
}

impl std::fmt::Display for MaterialType {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaterialType::Lecture => write!(fmt, "lecture"),
            MaterialType::Textbook => write!(fmt, "textbook"),
            MaterialType::Slides => write!(fmt, "slides"),
            MaterialType::Assignment => write!(fmt, "assignment"),
            MaterialType::Other => write!(fmt, "other"),
        }
    }
}

impl FromStr for MaterialType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "lecture" => Ok(MaterialType::Lecture),
            "textbook" => Ok(MaterialType::Textbook),
            "slides" => Ok(MaterialType::Slides),
            "assignment" => Ok(MaterialType::Assignment),
            "other" => Ok(MaterialType::Other),
            other => Err(format!("Unknown material type: {other}")),
        }
    }
}
