use domain::learning_material::{MaterialUpdate, RegisterRequest};
use domain::Id;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub(crate) struct IndexParams {
    /// `all` (default), `none`/`unassigned`, or a conversation id
    pub(crate) conversation_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterParams {
    #[schema(value_type = Option<String>, format = Uuid)]
    pub(crate) conversation_id: Option<Id>,
    pub(crate) course_name: Option<String>,
    pub(crate) material_type: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) file_path: Option<String>,
    pub(crate) file_size: Option<i64>,
    pub(crate) original_filename: Option<String>,
}

impl From<RegisterParams> for RegisterRequest {
    fn from(params: RegisterParams) -> Self {
        RegisterRequest {
            conversation_id: params.conversation_id,
            course_name: params.course_name,
            material_type: params.material_type,
            description: params.description,
            file_path: params.file_path,
            file_size: params.file_size,
            original_filename: params.original_filename,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateParams {
    pub(crate) course_name: Option<String>,
    pub(crate) material_type: Option<String>,
    pub(crate) description: Option<String>,
}

impl From<UpdateParams> for MaterialUpdate {
    fn from(params: UpdateParams) -> Self {
        MaterialUpdate {
            course_name: params.course_name,
            material_type: params.material_type,
            description: params.description,
        }
    }
}
