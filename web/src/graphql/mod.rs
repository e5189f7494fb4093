//! GraphQL facade over conversations, messages and learning materials.
//!
//! Every resolver reads the authenticated user from the request data, so results are
//! always scoped to the caller just like the REST routes.

use crate::AppState;
use async_graphql::{Context, EmptySubscription, Schema};
use domain::error::Error as DomainError;
use domain::{users, Id};

mod mutation;
mod query;
mod types;

pub(crate) use mutation::Mutation;
pub(crate) use query::Query;

pub(crate) type AppSchema = Schema<Query, Mutation, EmptySubscription>;

pub(crate) fn build_schema(app_state: AppState) -> AppSchema {
    Schema::build(Query, Mutation, EmptySubscription)
        .data(app_state)
        .finish()
}

/// Resolvers only run for requests that passed `require_auth`, which adds the user.
fn caller<'a>(ctx: &Context<'a>) -> async_graphql::Result<(&'a AppState, &'a users::Model)> {
    Ok((ctx.data::<AppState>()?, ctx.data::<users::Model>()?))
}

fn parse_id(id: &str, message: &str) -> async_graphql::Result<Id> {
    Id::parse_str(id).map_err(|_| async_graphql::Error::new(message))
}

fn graphql_error(e: DomainError) -> async_graphql::Error {
    async_graphql::Error::new(e.message())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_reports_the_given_message() {
        let err = parse_id("not-a-uuid", "Invalid conversation ID").unwrap_err();
        assert_eq!(err.message, "Invalid conversation ID");

        let id = Id::new_v4();
        assert_eq!(parse_id(&id.to_string(), "Invalid conversation ID").unwrap(), id);
    }

    #[test]
    fn schema_exposes_expected_root_fields() {
        let sdl = Schema::build(Query, Mutation, EmptySubscription)
            .finish()
            .sdl();

        for field in [
            "conversations:",
            "conversation(id: ID!)",
            "materials(conversationId: ID)",
            "material(id: ID!)",
            "messages(conversationId: ID!)",
            "createConversation(title: String!)",
            "updateConversation(id: ID!, title: String!)",
            "deleteConversation(id: ID!): Boolean!",
        ] {
            assert!(sdl.contains(field), "missing {field} in:\n{sdl}");
        }
    }
}
