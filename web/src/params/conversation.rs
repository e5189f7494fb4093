use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub(crate) struct CreateParams {
    /// Defaults to "New Chat" when absent or blank
    pub(crate) title: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateParams {
    pub(crate) title: Option<String>,
}
