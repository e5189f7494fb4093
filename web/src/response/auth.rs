use domain::{users, Id};
use serde::Serialize;
use utoipa::ToSchema;

/// The public profile of the signed in user
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserProfile {
    #[schema(value_type = String, format = Uuid)]
    pub id: Id,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
}

impl From<users::Model> for UserProfile {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            avatar: user.avatar,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub success: bool,
    pub user: UserProfile,
}
