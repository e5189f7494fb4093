use crate::controller::ApiResponse;
use crate::extractors::{authenticated_user::AuthenticatedUser, valid_json::ValidJson};
use crate::params::material::{IndexParams, RegisterParams, UpdateParams};
use crate::response::material::MaterialWithUrl;
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::learning_material::{self as LearningMaterialApi, ConversationFilter};
use domain::Id;

use log::*;

/// GET the caller's learning materials, newest first
#[utoipa::path(
    get,
    path = "/api/materials",
    params(IndexParams),
    responses(
        (status = 200, description = "Successfully retrieved Learning Materials", body = [domain::learning_materials::Model]),
        (status = 400, description = "Invalid conversationId"),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Learning Materials with params: {params:?}");

    let filter = ConversationFilter::parse(params.conversation_id.as_deref())?;
    let materials =
        LearningMaterialApi::find_by_user(app_state.db_conn_ref(), user.id, filter).await?;

    Ok(Json(ApiResponse::new(materials)))
}

/// POST record a file that is already in object storage
#[utoipa::path(
    post,
    path = "/api/materials",
    request_body = RegisterParams,
    responses(
        (status = 201, description = "Successfully Created a New Learning Material", body = domain::learning_materials::Model),
        (status = 400, description = "Missing required fields"),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    ValidJson(params): ValidJson<RegisterParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Register a Learning Material from: {params:?}");

    let material =
        LearningMaterialApi::register(app_state.db_conn_ref(), user.id, params.into()).await?;

    debug!("New Learning Material: {material:?}");

    Ok((StatusCode::CREATED, Json(ApiResponse::new(material))))
}

/// GET a Learning Material with a presigned download URL
#[utoipa::path(
    get,
    path = "/api/materials/{id}",
    params(
        ("id" = Uuid, Path, description = "Learning Material id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a Learning Material", body = MaterialWithUrl),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Material not found"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn read(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Learning Material by id: {id}");

    let material =
        LearningMaterialApi::find_by_id_and_user(app_state.db_conn_ref(), id, user.id).await?;
    let public_url = LearningMaterialApi::public_url(&app_state.config, &material)?;

    Ok(Json(ApiResponse::new(MaterialWithUrl {
        material,
        public_url,
    })))
}

#[utoipa::path(
    put,
    path = "/api/materials/{id}",
    params(
        ("id" = Uuid, Path, description = "Id of the Learning Material to update"),
    ),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "Successfully Updated Learning Material", body = domain::learning_materials::Model),
        (status = 400, description = "No fields to update"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Material not found"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    ValidJson(params): ValidJson<UpdateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Learning Material {id} with: {params:?}");

    let material =
        LearningMaterialApi::update(app_state.db_conn_ref(), id, user.id, params.into()).await?;

    Ok(Json(ApiResponse::new(material)))
}

#[utoipa::path(
    delete,
    path = "/api/materials/{id}",
    params(
        ("id" = Uuid, Path, description = "Id of the Learning Material to delete"),
    ),
    responses(
        (status = 200, description = "Successfully Deleted Learning Material"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Material not found"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Learning Material {id}");

    LearningMaterialApi::delete(app_state.db_conn_ref(), &app_state.config, id, user.id).await?;

    Ok(Json(ApiResponse::<()>::message(
        "Material deleted successfully",
    )))
}
