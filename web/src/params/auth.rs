use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct CallbackParams {
    /// Authorization code issued by Google
    pub(crate) code: Option<String>,
}
