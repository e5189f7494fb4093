use super::{caller, graphql_error};
use async_graphql::{Context, Object, ID};
use domain::learning_material::{self as LearningMaterialApi, ConversationFilter};
use domain::{conversations, learning_materials, message as MessageApi, messages};

pub(crate) struct Conversation(pub conversations::Model);

#[Object]
impl Conversation {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn user_id(&self) -> ID {
        ID(self.0.user_id.to_string())
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn created_at(&self) -> String {
        self.0.created_at.to_rfc3339()
    }

    async fn updated_at(&self) -> String {
        self.0.updated_at.to_rfc3339()
    }

    async fn messages(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Message>> {
        let (app_state, user) = caller(ctx)?;
        let messages =
            MessageApi::find_by_conversation(app_state.db_conn_ref(), self.0.id, user.id)
                .await
                .map_err(graphql_error)?;
        Ok(messages.into_iter().map(Message).collect())
    }

    /// Newest first, like `GET /api/materials`
    async fn materials(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Material>> {
        let (app_state, user) = caller(ctx)?;
        let materials = LearningMaterialApi::find_by_user(
            app_state.db_conn_ref(),
            user.id,
            ConversationFilter::Conversation(self.0.id),
        )
        .await
        .map_err(graphql_error)?;
        Ok(materials.into_iter().map(Material).collect())
    }
}

pub(crate) struct Message(pub messages::Model);

#[Object]
impl Message {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn conversation_id(&self) -> ID {
        ID(self.0.conversation_id.to_string())
    }

    async fn role(&self) -> String {
        self.0.role.to_string()
    }

    async fn content(&self) -> &str {
        &self.0.content
    }

    async fn created_at(&self) -> String {
        self.0.created_at.to_rfc3339()
    }
}

pub(crate) struct Material(pub learning_materials::Model);

#[Object]
impl Material {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn user_id(&self) -> ID {
        ID(self.0.user_id.to_string())
    }

    async fn conversation_id(&self) -> Option<ID> {
        self.0.conversation_id.map(|id| ID(id.to_string()))
    }

    async fn course_name(&self) -> &str {
        &self.0.course_name
    }

    async fn material_type(&self) -> String {
        self.0.material_type.to_string()
    }

    async fn description(&self) -> &str {
        &self.0.description
    }

    async fn file_path(&self) -> &str {
        &self.0.file_path
    }

    /// Size in bytes
    async fn file_size(&self) -> i64 {
        self.0.file_size
    }

    async fn original_filename(&self) -> &str {
        &self.0.original_filename
    }

    async fn processing_status(&self) -> String {
        self.0.processing_status.to_string()
    }

    async fn created_at(&self) -> String {
        self.0.created_at.to_rfc3339()
    }

    async fn updated_at(&self) -> String {
        self.0.updated_at.to_rfc3339()
    }
}
