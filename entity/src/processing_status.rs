use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Where a learning material is in the vector indexing pipeline.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, EnumIter, Deserialize, Default, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "processing_status"
)]
pub enum ProcessingStatus {
    /// Uploaded but never sent to the RAG service
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "processing")]
    Processing,
    /// Indexed and available to the agent and quiz services
    #[sea_orm(string_value = "processed")]
    Processed,
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl ProcessingStatus {
    /// Materials in these states are picked up again when a quiz needs them.
    pub fn is_reprocessable(&self) -> bool {
        matches!(self, ProcessingStatus::Pending | ProcessingStatus::Failed)
    }
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStatus::Pending => write!(fmt, "pending"),
            ProcessingStatus::Processing => write!(fmt, "processing"),
            ProcessingStatus::Processed => write!(fmt, "processed"),
            ProcessingStatus::Failed => write!(fmt, "failed"),
        }
    }
}
