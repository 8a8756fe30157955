//! Axum router configuration.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::web::handlers;

/// Build the form router with tracing middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::show_form))
        .route("/ask", post(handlers::submit_form))
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::StatusCode;
    use tokio::net::TcpListener;

    use super::*;
    use crate::backend::MockBackend;
    use crate::credentials::CredentialSource;
    use crate::dispatcher::Dispatcher;
    use crate::error::Error;

    /// Serve the router on an ephemeral port and return its base URL
    async fn spawn_app(backend: Arc<MockBackend>, credential: Option<CredentialSource>) -> String {
        let state = AppState::new(Arc::new(Dispatcher::new(backend, "gpt-4o-mini")), credential);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn post_form(base: &str, persona: &str, text: &str) -> (StatusCode, String) {
        let response = reqwest::Client::new()
            .post(format!("{}/ask", base))
            .form(&[("persona", persona), ("text", text)])
            .send()
            .await
            .unwrap();
        let status = response.status();
        (status, response.text().await.unwrap())
    }

    #[tokio::test]
    async fn test_form_page_lists_personas() {
        let base = spawn_app(Arc::new(MockBackend::replying("x")), None).await;

        let body = reqwest::get(format!("{}/", base)).await.unwrap().text().await.unwrap();
        assert!(body.contains("転職支援アプリ"));
        assert!(body.contains("キャリアコーチ（IT転職）"));
        assert!(body.contains("面接官（採用人事・辛口）"));
        assert!(body.contains("<textarea"));
        assert!(body.contains("送信"));
    }

    #[tokio::test]
    async fn test_career_coach_answer_is_rendered() {
        let backend = Arc::new(MockBackend::replying("要約案：..."));
        let base = spawn_app(backend.clone(), Some(CredentialSource::Environment)).await;

        let (status, body) = post_form(&base, "キャリアコーチ（IT転職）", "職務経歴を要約して").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h2>回答</h2>"));
        assert!(body.contains("要約案：..."));

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].messages[0].content,
            crate::persona::Persona::CareerCoach.system_prompt()
        );
        assert_eq!(requests[0].messages[1].content, "職務経歴を要約して");
    }

    #[tokio::test]
    async fn test_missing_credential_is_shown() {
        let backend = Arc::new(MockBackend::replying("unused"));
        let base = spawn_app(backend.clone(), None).await;

        let (status, body) = post_form(&base, "面接官（採用人事・辛口）", "自己PRを見て").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains(&Error::MissingCredential.to_string()));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_input_is_shown() {
        let backend = Arc::new(MockBackend::replying("unused"));
        let base = spawn_app(backend.clone(), Some(CredentialSource::SecretsFile)).await;

        let (status, body) = post_form(&base, "キャリアコーチ（IT転職）", "   ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("入力テキストを入れてください。"));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_boundary_failure_is_shown_verbatim() {
        let backend = Arc::new(MockBackend::failing("Rate limit reached for gpt-4o-mini"));
        let base = spawn_app(backend.clone(), Some(CredentialSource::Environment)).await;

        let (status, body) = post_form(&base, "interviewer", "hello").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("エラーが発生しました：Rate limit reached for gpt-4o-mini"));
        assert!(!body.contains("class=\"answer\""));
    }

    #[tokio::test]
    async fn test_health_reports_credential() {
        let base = spawn_app(Arc::new(MockBackend::replying("x")), None).await;

        let health: serde_json::Value = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health["status"], "ok");
        assert_eq!(health["credential"], false);
    }
}
