use crate::extractors::{authenticated_user::AuthenticatedUser, valid_json::ValidJson};
use crate::graphql::AppSchema;
use async_graphql::http::GraphiQLSource;
use axum::response::{Html, IntoResponse};
use axum::{Extension, Json};

use log::*;

/// POST execute a GraphQL query or mutation as the signed in user
#[utoipa::path(
    post,
    path = "/api/graphql",
    responses(
        (status = 200, description = "A GraphQL response; resolver errors are reported in `errors`"),
        (status = 400, description = "Invalid request body"),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn execute(
    AuthenticatedUser(user): AuthenticatedUser,
    Extension(schema): Extension<AppSchema>,
    ValidJson(request): ValidJson<async_graphql::Request>,
) -> impl IntoResponse {
    trace!("GraphQL request from user {}: {}", user.id, request.query);

    Json(schema.execute(request.data(user)).await)
}

/// GET the GraphiQL explorer
#[utoipa::path(
    get,
    path = "/api/graphql",
    responses(
        (status = 200, description = "GraphiQL page", content_type = "text/html"),
    )
)]
pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/api/graphql").finish())
}
