//! Course materials: uploads to object storage, listing, editing and removal.

use crate::error::Error;
use crate::gateway::r2::R2Client;
use crate::learning_materials::Model;
use crate::material_type::MaterialType;
use crate::processing_status::ProcessingStatus;
use crate::{conversation, Id, QueryFilterMap, UpdateMap};
use chrono::Utc;
use entity_api::learning_material;
use log::*;
use sea_orm::{DatabaseConnection, Value};
use service::config::Config;

pub use entity_api::learning_material::{find_by_conversation, find_processed_ids};

const NOT_FOUND: &str = "Material not found";
const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Which materials a listing should return, as selected by the `conversationId` query value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConversationFilter {
    All,
    Unassigned,
    Conversation(Id),
}

impl ConversationFilter {
    /// Absent or `all` lists everything; `none`, `null`, `unassigned` or an empty value lists
    /// materials without a conversation; anything else must be a conversation id.
    pub fn parse(value: Option<&str>) -> Result<Self, Error> {
        match value.map(str::trim) {
            None | Some("all") => Ok(Self::All),
            Some("") | Some("none") | Some("null") | Some("unassigned") => Ok(Self::Unassigned),
            Some(value) => Id::parse_str(value)
                .map(Self::Conversation)
                .map_err(|_| Error::input("Invalid conversationId")),
        }
    }
}

/// The file part of an upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// The fields of an upload form as received; validation happens in `upload`.
#[derive(Debug, Default)]
pub struct UploadRequest {
    pub file: Option<UploadedFile>,
    pub course_name: Option<String>,
    pub material_type: Option<String>,
    pub description: Option<String>,
    pub conversation_id: Option<String>,
}

/// Metadata for a blob that is already in object storage.
#[derive(Debug, Default)]
pub struct RegisterRequest {
    pub conversation_id: Option<Id>,
    pub course_name: Option<String>,
    pub material_type: Option<String>,
    pub description: Option<String>,
    pub file_path: Option<String>,
    pub file_size: Option<i64>,
    pub original_filename: Option<String>,
}

#[derive(Debug, Default)]
pub struct MaterialUpdate {
    pub course_name: Option<String>,
    pub material_type: Option<String>,
    pub description: Option<String>,
}

struct ValidUpload {
    file: UploadedFile,
    course_name: String,
    material_type: MaterialType,
    description: String,
    conversation_id: Option<Id>,
}

fn parse_material_type(value: &str) -> Result<MaterialType, Error> {
    value
        .parse::<MaterialType>()
        .map_err(|_| Error::input("Invalid material type"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn validate_upload(request: UploadRequest, max_upload_bytes: usize) -> Result<ValidUpload, Error> {
    let (Some(file), Some(course_name), Some(material_type)) = (
        request.file,
        non_blank(request.course_name),
        non_blank(request.material_type),
    ) else {
        return Err(Error::input("Missing required fields"));
    };

    if file.content_type != PDF_CONTENT_TYPE {
        return Err(Error::input("Only PDF files are allowed"));
    }
    if file.bytes.len() > max_upload_bytes {
        return Err(Error::input(format!(
            "File size must be less than {}MB",
            max_upload_bytes / (1024 * 1024)
        )));
    }

    Ok(ValidUpload {
        file,
        course_name,
        material_type: parse_material_type(&material_type)?,
        description: request.description.unwrap_or_default(),
        conversation_id: crate::parse_optional_id(
            request.conversation_id.as_deref(),
            "Invalid conversationId",
        )?,
    })
}

/// Object storage key for a new upload: `{user_id}/{unix_millis}_{filename}`.
///
/// Only the last path component of the client's filename is kept, so the key never leaves
/// the user's prefix or contains segments a URL parser would collapse.
pub fn storage_key(user_id: Id, filename: &str) -> String {
    let name = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or("upload.pdf");

    format!("{user_id}/{}_{name}", Utc::now().timestamp_millis())
}

#[allow(clippy::too_many_arguments)]
fn new_model(
    user_id: Id,
    conversation_id: Option<Id>,
    course_name: String,
    material_type: MaterialType,
    description: String,
    file_path: String,
    file_size: i64,
    original_filename: String,
) -> Model {
    let now = Utc::now();
    Model {
        id: Default::default(),
        user_id,
        conversation_id,
        course_name,
        material_type,
        description,
        file_path,
        file_size,
        original_filename,
        processing_status: ProcessingStatus::Pending,
        processing_error: None,
        processed_at: None,
        vector_document_count: None,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

/// Stores an uploaded PDF and records it. If the record can't be written the blob is removed
/// again. Returns the material with a presigned download URL.
pub async fn upload(
    db: &DatabaseConnection,
    config: &Config,
    user_id: Id,
    request: UploadRequest,
) -> Result<(Model, String), Error> {
    let upload = validate_upload(request, config.max_upload_bytes)?;

    if let Some(conversation_id) = upload.conversation_id {
        conversation::find_by_id_and_user(db, conversation_id, user_id).await?;
    }

    let storage = R2Client::from_config(config)?;
    let key = storage_key(user_id, &upload.file.filename);
    let file_size = upload.file.bytes.len() as i64;

    storage
        .put_object(&key, upload.file.bytes, &upload.file.content_type)
        .await?;

    let model = new_model(
        user_id,
        upload.conversation_id,
        upload.course_name,
        upload.material_type,
        upload.description,
        key.clone(),
        file_size,
        upload.file.filename,
    );

    let material = match learning_material::create(db, model).await {
        Ok(material) => material,
        Err(e) => {
            error!("Failed to record uploaded material {key}: {e}");
            if let Err(cleanup) = storage.delete_object(&key).await {
                warn!("Failed to remove orphaned upload {key}: {cleanup}");
            }
            return Err(Error {
                source: Some(Box::new(e)),
                ..Error::other("Failed to save material")
            });
        }
    };

    let public_url = storage.presigned_get_url(&material.file_path, config.signed_url_expiry_secs)?;
    Ok((material, public_url))
}

/// Records a blob that was stored out of band.
pub async fn register(
    db: &DatabaseConnection,
    user_id: Id,
    request: RegisterRequest,
) -> Result<Model, Error> {
    let (
        Some(course_name),
        Some(material_type),
        Some(file_path),
        Some(file_size),
        Some(original_filename),
    ) = (
        non_blank(request.course_name),
        non_blank(request.material_type),
        non_blank(request.file_path),
        request.file_size,
        non_blank(request.original_filename),
    )
    else {
        return Err(Error::input("Missing required fields"));
    };

    if let Some(conversation_id) = request.conversation_id {
        conversation::find_by_id_and_user(db, conversation_id, user_id).await?;
    }

    let model = new_model(
        user_id,
        request.conversation_id,
        course_name,
        parse_material_type(&material_type)?,
        request.description.unwrap_or_default(),
        file_path,
        file_size,
        original_filename,
    );

    Ok(learning_material::create(db, model).await?)
}

/// Newest first.
pub async fn find_by_user(
    db: &DatabaseConnection,
    user_id: Id,
    filter: ConversationFilter,
) -> Result<Vec<Model>, Error> {
    let mut query_filter_map = QueryFilterMap::new();
    query_filter_map.insert("user_id".to_string(), Some(Value::from(user_id)));

    match filter {
        ConversationFilter::All => {}
        ConversationFilter::Unassigned => {
            query_filter_map.insert("conversation_id".to_string(), Some(Value::Uuid(None)))
        }
        ConversationFilter::Conversation(conversation_id) => query_filter_map.insert(
            "conversation_id".to_string(),
            Some(Value::from(conversation_id)),
        ),
    }

    Ok(learning_material::find_by(db, query_filter_map).await?)
}

/// A material owned by someone else is reported as missing.
pub async fn find_by_id_and_user(
    db: &DatabaseConnection,
    id: Id,
    user_id: Id,
) -> Result<Model, Error> {
    learning_material::find_by_id_and_user(db, id, user_id)
        .await
        .map_err(|e| Error::from(e).with_not_found_message(NOT_FOUND))
}

/// A presigned GET URL for the material's file.
pub fn public_url(config: &Config, material: &Model) -> Result<String, Error> {
    R2Client::from_config(config)?
        .presigned_get_url(&material.file_path, config.signed_url_expiry_secs)
}

pub async fn update(
    db: &DatabaseConnection,
    id: Id,
    user_id: Id,
    params: MaterialUpdate,
) -> Result<Model, Error> {
    let mut update_map = UpdateMap::new();
    if let Some(course_name) = params.course_name {
        update_map.insert("course_name".to_string(), Some(Value::from(course_name)));
    }
    if let Some(material_type) = params.material_type {
        let material_type = parse_material_type(&material_type)?;
        update_map.insert("material_type".to_string(), Some(material_type.into()));
    }
    if let Some(description) = params.description {
        update_map.insert("description".to_string(), Some(Value::from(description)));
    }

    if update_map.is_empty() {
        return Err(Error::input("No fields to update"));
    }

    find_by_id_and_user(db, id, user_id).await?;
    Ok(learning_material::update(db, id, update_map).await?)
}

/// Removes the stored file, best effort, then the record.
pub async fn delete(
    db: &DatabaseConnection,
    config: &Config,
    id: Id,
    user_id: Id,
) -> Result<(), Error> {
    let material = find_by_id_and_user(db, id, user_id).await?;

    match R2Client::from_config(config) {
        Ok(storage) => {
            if let Err(e) = storage.delete_object(&material.file_path).await {
                warn!("Failed to delete stored file {}: {e}", material.file_path);
            }
        }
        Err(e) => warn!("Skipping stored file removal for material {id}: {e}"),
    }

    Ok(learning_material::delete_by_id(db, id).await?)
}
