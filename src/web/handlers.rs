//! Request handlers for the form routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::json;

use crate::error::Error;
use crate::state::AppState;
use crate::web::page::{Outcome, PageView};

/// Fields posted by the form.
#[derive(Debug, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub persona: String,
    #[serde(default)]
    pub text: String,
}

/// GET / - empty form with the first persona selected.
pub async fn show_form(State(state): State<AppState>) -> Html<String> {
    let default = state.dispatcher.registry().default_persona();
    Html(PageView::new(default.label(), "").render())
}

/// POST /ask - run one submission and render the page with its outcome.
pub async fn submit_form(
    State(state): State<AppState>,
    Form(form): Form<AskForm>,
) -> impl IntoResponse {
    let view = PageView::new(&form.persona, &form.text);

    match state.submit(&form.text, &form.persona).await {
        Ok(answer) => (
            StatusCode::OK,
            Html(view.with_outcome(Outcome::Answer(answer.text)).render()),
        ),
        Err(e) => (
            status_for(&e),
            Html(view.with_outcome(Outcome::Failure(e.user_message())).render()),
        ),
    }
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.dispatcher.model(),
        "credential": state.has_credential(),
    }))
}

fn status_for(error: &Error) -> StatusCode {
    if error.is_rejected_submission() {
        StatusCode::BAD_REQUEST
    } else if error.is_boundary_failure() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
