use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::response::material::MaterialWithUrl;
use crate::{AppState, Error};
use axum::extract::{multipart::MultipartError, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::error::Error as DomainError;
use domain::learning_material::{self as LearningMaterialApi, UploadRequest, UploadedFile};

use log::*;

/// A body over the size limit fails while streaming the form, before any validation runs.
fn multipart_error(e: MultipartError, max_upload_bytes: usize) -> DomainError {
    warn!("Unreadable multipart upload: {e}");
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        DomainError::input(format!(
            "File size must be less than {}MB",
            max_upload_bytes / (1024 * 1024)
        ))
    } else {
        DomainError::input("No file uploaded")
    }
}

/// Collects the known form fields; anything else in the form is ignored.
async fn read_upload_form(
    mut multipart: Multipart,
    max_upload_bytes: usize,
) -> Result<UploadRequest, DomainError> {
    let mut request = UploadRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_upload_bytes))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            let filename = field.file_name().unwrap_or("upload.pdf").to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| multipart_error(e, max_upload_bytes))?;

            request.file = Some(UploadedFile {
                filename,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|_| DomainError::input("Invalid form field"))?;
        match name.as_str() {
            "courseName" => request.course_name = Some(value),
            "materialType" => request.material_type = Some(value),
            "description" => request.description = Some(value),
            "conversationId" => request.conversation_id = Some(value),
            other => trace!("Ignoring upload form field {other}"),
        }
    }

    Ok(request)
}

/// POST upload a PDF and record it as a Learning Material
#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content_type = "multipart/form-data", description = "Fields: file, courseName, materialType, description, conversationId"),
    responses(
        (status = 201, description = "Successfully uploaded the file", body = MaterialWithUrl),
        (status = 400, description = "Missing fields, not a PDF, or too large"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Conversation not found"),
        (status = 500, description = "Failed to save material"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, Error> {
    let request = read_upload_form(multipart, app_state.config.max_upload_bytes).await?;

    info!(
        "Upload from user {}: {:?} ({} bytes)",
        user.id,
        request.file.as_ref().map(|file| file.filename.as_str()),
        request.file.as_ref().map_or(0, |file| file.bytes.len())
    );

    let (material, public_url) = LearningMaterialApi::upload(
        app_state.db_conn_ref(),
        &app_state.config,
        user.id,
        request,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(MaterialWithUrl {
            material,
            public_url,
        })),
    ))
}
