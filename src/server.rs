use axum::{Router, extract::State, http::StatusCode, response::Json, routing::post};
use metrics::counter;
use std::sync::Arc;

use crate::classifier::Classifier;
use crate::types::{ClassifyRequest, ClassifyResponse};

#[derive(Clone)]
pub struct AppState {
    classifier: Arc<Classifier>,
    default_categories: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(classifier: Arc<Classifier>, default_categories: Vec<String>) -> Self {
        Self {
            classifier,
            default_categories: Arc::new(default_categories),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/classify", post(classify_handler))
        .with_state(state)
}

#[tracing::instrument(skip(state, request), fields(destination = %request.destination_name, kind = %request.kind))]
async fn classify_handler(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, StatusCode> {
    counter!("classification_requests_total").increment(1);

    let categories = request
        .categories
        .as_deref()
        .unwrap_or(state.default_categories.as_slice());

    let result = state
        .classifier
        .classify(
            categories,
            &request.destination_name,
            &request.description,
            &request.kind,
        )
        .await
        .map_err(|e| {
            counter!("classification_outcomes_total", "outcome" => "error").increment(1);
            tracing::error!(error = %e, "Classification failed");
            StatusCode::BAD_GATEWAY
        })?;

    let outcome = if result.is_some() { "matched" } else { "unmatched" };
    counter!("classification_outcomes_total", "outcome" => outcome).increment(1);

    Ok(Json(ClassifyResponse {
        id: format!("classify-{}", uuid::Uuid::new_v4().simple()),
        created: chrono::Utc::now().timestamp(),
        model: state.classifier.model().to_string(),
        result,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionClient;
    use crate::error::CompletionError;
    use crate::types::{CompletionChoice, CompletionRequest, CompletionResponse};
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct EchoCategory;

    // Answers with the first category listed in the prompt.
    #[async_trait]
    impl CompletionClient for EchoCategory {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, CompletionError> {
            let listed = request.prompt.trim_end().rsplit('\n').next().unwrap_or("");
            let first = listed.split(", ").next().unwrap_or("").to_string();
            Ok(CompletionResponse {
                choices: vec![CompletionChoice {
                    text: format!("\n{first}"),
                }],
            })
        }
    }

    struct Failing;

    #[async_trait]
    impl CompletionClient for Failing {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, CompletionError> {
            Err(CompletionError::Transport("ECONNRESET".to_string()))
        }
    }

    fn app(client: Arc<dyn CompletionClient>, defaults: &[&str]) -> Router {
        let classifier = Arc::new(Classifier::new(client, "test-model"));
        router(AppState::new(
            classifier,
            defaults.iter().map(|c| c.to_string()).collect(),
        ))
    }

    async fn post_classify(app: Router, body: Value) -> (StatusCode, Option<Value>) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/classify")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).ok())
    }

    #[tokio::test]
    async fn classifies_with_request_categories() {
        let (status, body) = post_classify(
            app(Arc::new(EchoCategory), &["Rent"]),
            json!({
                "categories": ["Groceries", "Transport"],
                "destination_name": "OXXO",
                "description": "compra",
                "type": "debit"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let body = body.expect("json body");
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["result"]["category"], "Groceries");
        assert_eq!(body["result"]["response"], "\nGroceries");
        assert!(body["id"].as_str().unwrap().starts_with("classify-"));
    }

    #[tokio::test]
    async fn falls_back_to_default_categories() {
        let (status, body) = post_classify(
            app(Arc::new(EchoCategory), &["Rent", "Groceries"]),
            json!({
                "destination_name": "Inmobiliaria",
                "description": "renta",
                "type": "transfer"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.expect("json body")["result"]["category"], "Rent");
    }

    #[tokio::test]
    async fn unmatched_guess_yields_null_result() {
        let (status, body) = post_classify(
            app(Arc::new(EchoCategory), &[]),
            json!({
                "destination_name": "OXXO",
                "description": "compra",
                "type": "debit"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.expect("json body")["result"], Value::Null);
    }

    #[tokio::test]
    async fn service_failure_maps_to_bad_gateway() {
        let (status, _) = post_classify(
            app(Arc::new(Failing), &["Rent"]),
            json!({
                "destination_name": "OXXO",
                "description": "compra",
                "type": "debit"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
