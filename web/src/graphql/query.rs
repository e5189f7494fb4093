use super::types::{Conversation, Material, Message};
use super::{caller, graphql_error, parse_id};
use async_graphql::{Context, Object, ID};
use domain::learning_material::{self as LearningMaterialApi, ConversationFilter};
use domain::{conversation as ConversationApi, message as MessageApi};

pub(crate) struct Query;

#[Object]
impl Query {
    /// The caller's conversations, most recently active first
    async fn conversations(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Conversation>> {
        let (app_state, user) = caller(ctx)?;
        let conversations = ConversationApi::find_by_user(app_state.db_conn_ref(), user.id)
            .await
            .map_err(|e| graphql_error(e.into()))?;
        Ok(conversations.into_iter().map(Conversation).collect())
    }

    async fn conversation(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<Conversation>> {
        let (app_state, user) = caller(ctx)?;
        let id = parse_id(&id, "Invalid conversation ID")?;

        match ConversationApi::find_by_id_and_user(app_state.db_conn_ref(), id, user.id).await {
            Ok(conversation) => Ok(Some(Conversation(conversation))),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(graphql_error(e)),
        }
    }

    /// All of the caller's materials, or only those of one conversation
    async fn materials(
        &self,
        ctx: &Context<'_>,
        conversation_id: Option<ID>,
    ) -> async_graphql::Result<Vec<Material>> {
        let (app_state, user) = caller(ctx)?;
        let filter = match conversation_id {
            Some(id) => ConversationFilter::Conversation(parse_id(&id, "Invalid conversation ID")?),
            None => ConversationFilter::All,
        };

        let materials = LearningMaterialApi::find_by_user(app_state.db_conn_ref(), user.id, filter)
            .await
            .map_err(graphql_error)?;
        Ok(materials.into_iter().map(Material).collect())
    }

    async fn material(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<Material>> {
        let (app_state, user) = caller(ctx)?;
        let id = parse_id(&id, "Invalid material ID")?;

        match LearningMaterialApi::find_by_id_and_user(app_state.db_conn_ref(), id, user.id).await
        {
            Ok(material) => Ok(Some(Material(material))),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(graphql_error(e)),
        }
    }

    async fn messages(
        &self,
        ctx: &Context<'_>,
        conversation_id: ID,
    ) -> async_graphql::Result<Vec<Message>> {
        let (app_state, user) = caller(ctx)?;
        let conversation_id = parse_id(&conversation_id, "Invalid conversation ID")?;

        let messages =
            MessageApi::find_by_conversation(app_state.db_conn_ref(), conversation_id, user.id)
                .await
                .map_err(graphql_error)?;
        Ok(messages.into_iter().map(Message).collect())
    }
}
