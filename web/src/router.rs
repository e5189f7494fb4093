use crate::{
    controller::health_check_controller, graphql, middleware::auth::require_auth, params, protect,
    response, AppState,
};
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Extension, Router,
};

use crate::controller::{
    agent_controller, auth_controller, conversation_controller, graphql_controller,
    material_controller, message_controller, practice_quiz_controller, question_controller,
    rag_controller, upload_controller,
};

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

/// Multipart framing and the text fields ride on top of the file itself.
const UPLOAD_FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Learning Assistant API"
        ),
        paths(
            agent_controller::chat,
            auth_controller::google,
            auth_controller::google_callback,
            auth_controller::me,
            auth_controller::logout,
            conversation_controller::index,
            conversation_controller::create,
            conversation_controller::update,
            conversation_controller::delete,
            graphql_controller::execute,
            graphql_controller::graphiql,
            health_check_controller::health_check,
            material_controller::index,
            material_controller::create,
            material_controller::read,
            material_controller::update,
            material_controller::delete,
            message_controller::index,
            message_controller::create,
            practice_quiz_controller::create,
            practice_quiz_controller::index,
            practice_quiz_controller::read,
            practice_quiz_controller::submit,
            question_controller::index,
            question_controller::create,
            question_controller::read,
            question_controller::update,
            question_controller::delete,
            question_controller::evaluate,
            rag_controller::process,
            rag_controller::query,
            upload_controller::upload,
        ),
        components(
            schemas(
                domain::conversations::Model,
                domain::learning_materials::Model,
                domain::messages::Model,
                domain::questions::Model,
                domain::users::Model,
                params::agent::ChatParams,
                params::conversation::CreateParams,
                params::conversation::UpdateParams,
                params::material::RegisterParams,
                params::material::UpdateParams,
                params::message::CreateParams,
                params::practice_quiz::GenerateParams,
                params::practice_quiz::SubmitParams,
                params::question::GenerateParams,
                params::question::UpdateParams,
                params::question::EvaluateParams,
                params::rag::ProcessParams,
                params::rag::QueryParams,
                response::auth::MeResponse,
                response::material::MaterialWithUrl,
                response::practice_quiz::PracticeQuizView,
                response::practice_quiz::SubmitResponse,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "learning_assistant", description = "Learning Assistant API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines our bearer token authentication requirement for gaining access to our
// API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Session token handed to the frontend after Google sign in",
                        ))
                        .build(),
                ),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn api_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(agent_routes(app_state.clone()))
        .merge(auth_routes(app_state.clone()))
        .merge(conversation_routes(app_state.clone()))
        .merge(graphql_routes(app_state.clone()))
        .merge(health_routes(app_state.clone()))
        .merge(material_routes(app_state.clone()))
        .merge(message_routes(app_state.clone()))
        .merge(practice_quiz_routes(app_state.clone()))
        .merge(question_routes(app_state.clone()))
        .merge(rag_routes(app_state.clone()))
        .merge(upload_routes(app_state))
}

fn agent_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/agent/chat", post(agent_controller::chat))
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn auth_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/me", get(auth_controller::me))
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        // The sign in flow and logout don't need a valid token
        .route("/auth/google", get(auth_controller::google))
        .route(
            "/auth/google/callback",
            get(auth_controller::google_callback),
        )
        .route("/auth/logout", post(auth_controller::logout))
        .with_state(app_state)
}

fn conversation_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/conversations", get(conversation_controller::index))
        .route("/conversations", post(conversation_controller::create))
        .merge(
            // PUT/DELETE /conversations/:id
            Router::new()
                .route("/conversations/:id", put(conversation_controller::update))
                .route(
                    "/conversations/:id",
                    delete(conversation_controller::delete),
                )
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::conversations::owner,
                )),
        )
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn graphql_routes(app_state: AppState) -> Router {
    let explorer = if app_state.config.is_production() {
        Router::new()
    } else {
        Router::new().route("/graphql", get(graphql_controller::graphiql))
    };

    Router::new()
        .route(
            "/graphql",
            post(graphql_controller::execute)
                .layer(Extension(graphql::build_schema(app_state.clone()))),
        )
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .merge(explorer)
        .with_state(app_state)
}

fn health_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check_controller::health_check))
        .with_state(app_state)
}

fn material_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/materials", get(material_controller::index))
        .route("/materials", post(material_controller::create))
        .route("/materials/:id", get(material_controller::read))
        .route("/materials/:id", put(material_controller::update))
        .route("/materials/:id", delete(material_controller::delete))
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn message_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/messages", post(message_controller::create))
        .merge(
            // GET /messages/:conversationId
            Router::new()
                .route(
                    "/messages/:conversationId",
                    get(message_controller::index),
                )
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::conversations::owner,
                )),
        )
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn practice_quiz_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/practice-quizz", post(practice_quiz_controller::create))
        .route("/practice-quizz", get(practice_quiz_controller::index))
        .route("/practice-quizz/:id", get(practice_quiz_controller::read))
        .route(
            "/practice-quizz/:id/submit",
            post(practice_quiz_controller::submit),
        )
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn question_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/questions", get(question_controller::index))
        .route("/questions", post(question_controller::create))
        .route("/questions/:id", get(question_controller::read))
        .route("/questions/:id", put(question_controller::update))
        .route("/questions/:id", delete(question_controller::delete))
        .route(
            "/questions/:id/evaluate",
            post(question_controller::evaluate),
        )
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn rag_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/rag/process", post(rag_controller::process))
        .route("/rag/query", post(rag_controller::query))
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn upload_routes(app_state: AppState) -> Router {
    let body_limit = app_state.config.max_upload_bytes + UPLOAD_FORM_OVERHEAD_BYTES;

    Router::new()
        .route(
            "/upload",
            post(upload_controller::upload).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use chrono::Utc;
    use clap::Parser;
    use domain::{conversations, jwt, questions, users, Id};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockDatabaseTrait};
    use service::config::Config;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_config() -> Config {
        Config::parse_from(["learning_assistant", "--jwt-secret", "test-secret"])
    }

    fn app(db: MockDatabase) -> Router {
        let db = Arc::new(db.into_connection());
        define_routes(AppState::new(test_config(), &db))
    }

    fn app_with(config: Config, db: &Arc<DatabaseConnection>) -> Router {
        define_routes(AppState::new(config, db))
    }

    fn statements_debug(db: &DatabaseConnection) -> String {
        let log = db
            .as_mock_connection()
            .get_mocker_mutex()
            .lock()
            .unwrap()
            .drain_transaction_log();
        format!("{log:?}")
    }

    fn test_user() -> users::Model {
        let now = Utc::now();
        users::Model {
            id: Id::new_v4(),
            google_id: "google-123".to_string(),
            email: "test@domain.com".to_string(),
            name: "Test User".to_string(),
            avatar: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn bearer(user: &users::Model) -> String {
        let token = jwt::generate_token(&test_config(), user.id, &user.email).unwrap();
        format!("Bearer {token}")
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_check_does_not_require_a_token() {
        let app = app(MockDatabase::new(DatabaseBackend::Postgres));

        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await.get("timestamp").is_some());
    }

    #[tokio::test]
    async fn logout_does_not_require_a_token() {
        let app = app(MockDatabase::new(DatabaseBackend::Postgres));

        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/logout")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"success": true, "message": "Logged out successfully"})
        );
    }

    #[tokio::test]
    async fn protected_routes_reject_requests_without_a_token() {
        let app = app(MockDatabase::new(DatabaseBackend::Postgres));

        let request = Request::builder()
            .uri("/api/conversations")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"statusCode": 401, "message": "Unauthorized - No token provided"})
        );
    }

    #[tokio::test]
    async fn lists_the_callers_conversations_in_the_envelope() {
        let user = test_user();
        let now = Utc::now();
        let conversation = conversations::Model {
            id: Id::new_v4(),
            user_id: user.id,
            title: "Biology".to_string(),
            created_at: now.into(),
            updated_at: now.into(),
        };
        let app = app(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .append_query_results([[conversation.clone()]]),
        );

        let request = Request::builder()
            .uri("/api/conversations")
            .header("authorization", bearer(&user))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"][0]["title"], "Biology");
    }

    #[tokio::test]
    async fn another_users_conversation_is_reported_as_missing() {
        let user = test_user();
        let app = app(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .append_query_results([Vec::<conversations::Model>::new()]),
        );

        let request = Request::builder()
            .method("PUT")
            .uri(format!("/api/conversations/{}", Id::new_v4()))
            .header("authorization", bearer(&user))
            .header("content-type", "application/json")
            .body(Body::from(r#"{"title":"Renamed"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "Conversation not found");
    }

    #[tokio::test]
    async fn agent_chat_validates_before_streaming() {
        let user = test_user();
        let app = app(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[user.clone()]]),
        );

        let request = Request::builder()
            .method("POST")
            .uri("/api/agent/chat")
            .header("authorization", bearer(&user))
            .header("content-type", "application/json")
            .body(Body::from(r#"{"message":"hello"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "conversationId is required"
        );
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected_with_the_size_message() {
        const BOUNDARY: &str = "learning-assistant-boundary";
        let user = test_user();
        let config = Config::parse_from([
            "learning_assistant",
            "--jwt-secret",
            "test-secret",
            "--max-upload-bytes",
            "1048576",
        ]);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        // Past both the upload limit and the form overhead allowance
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"courseName\"\r\n\r\nBiology\r\n\
             --{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"notes.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n"
        )
        .into_bytes();
        body.extend(std::iter::repeat(b'a').take(3 * 1024 * 1024));
        body.extend(format!("\r\n--{BOUNDARY}--\r\n").into_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header("authorization", bearer(&user))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        let response = app_with(config, &db).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "File size must be less than 1MB"
        );
    }

    #[tokio::test]
    async fn materials_reject_a_malformed_conversation_filter() {
        let user = test_user();
        let app = app(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[user.clone()]]),
        );

        let request = Request::builder()
            .uri("/api/materials?conversationId=bad")
            .header("authorization", bearer(&user))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Invalid conversationId");
    }

    #[tokio::test]
    async fn question_listing_caps_the_requested_limit() {
        let user = test_user();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .append_query_results([Vec::<questions::Model>::new()])
                .into_connection(),
        );

        let request = Request::builder()
            .uri("/api/questions?limit=500")
            .header("authorization", bearer(&user))
            .body(Body::empty())
            .unwrap();
        let response = app_with(test_config(), &db).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"], serde_json::json!([]));

        let statements = statements_debug(&db);
        assert!(statements.contains("BigUnsigned(Some(100))"), "{statements}");
        assert!(!statements.contains("BigUnsigned(Some(500))"), "{statements}");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = app(MockDatabase::new(DatabaseBackend::Postgres));

        let request = Request::builder()
            .uri("/api-docs/openapi.json")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["paths"].get("/api/practice-quizz/{id}/submit").is_some());
        assert!(body["components"]["securitySchemes"]
            .get("bearer_auth")
            .is_some());
    }
}
