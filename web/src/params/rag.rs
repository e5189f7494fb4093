use domain::{rag::QueryRequest, Id};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProcessParams {
    #[schema(value_type = Option<String>, format = Uuid)]
    pub(crate) material_id: Option<Id>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryParams {
    pub(crate) question: Option<String>,
    /// Restricts retrieval to these materials; all of the caller's when absent
    #[schema(value_type = Option<Vec<String>>)]
    pub(crate) material_ids: Option<Vec<Id>>,
    pub(crate) top_k: Option<u32>,
}

impl From<QueryParams> for QueryRequest {
    fn from(params: QueryParams) -> Self {
        QueryRequest {
            question: params.question,
            material_ids: params.material_ids,
            top_k: params.top_k,
        }
    }
}
