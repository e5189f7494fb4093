use domain::learning_materials::Model as MaterialModel;
use serde::Serialize;
use utoipa::ToSchema;

/// A learning material together with a presigned download URL
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialWithUrl {
    #[serde(flatten)]
    pub material: MaterialModel,

    pub public_url: String,
}
