use super::types::Conversation;
use super::{caller, graphql_error, parse_id};
use async_graphql::{Context, Object, ID};
use domain::conversation as ConversationApi;

pub(crate) struct Mutation;

#[Object]
impl Mutation {
    async fn create_conversation(
        &self,
        ctx: &Context<'_>,
        title: String,
    ) -> async_graphql::Result<Conversation> {
        let (app_state, user) = caller(ctx)?;
        let conversation = ConversationApi::create(app_state.db_conn_ref(), user.id, Some(&title))
            .await
            .map_err(graphql_error)?;
        Ok(Conversation(conversation))
    }

    async fn update_conversation(
        &self,
        ctx: &Context<'_>,
        id: ID,
        title: String,
    ) -> async_graphql::Result<Conversation> {
        let (app_state, user) = caller(ctx)?;
        let id = parse_id(&id, "Invalid conversation ID")?;

        let conversation =
            ConversationApi::update_title(app_state.db_conn_ref(), id, user.id, Some(&title))
                .await
                .map_err(graphql_error)?;
        Ok(Conversation(conversation))
    }

    /// False when there was no such conversation
    async fn delete_conversation(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let (app_state, user) = caller(ctx)?;
        let id = parse_id(&id, "Invalid conversation ID")?;

        match ConversationApi::delete(app_state.db_conn_ref(), id, user.id).await {
            Ok(()) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(graphql_error(e)),
        }
    }
}
