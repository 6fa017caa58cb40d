//! "Ask the AI" page
//!
//! GET renders an empty form. POST submits `user_input` to the `AiService`
//! and renders the answer, or the error, below the form with the prompt
//! kept in the text area.

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;

use crate::web::render::{self, escape_html};
use crate::web::SharedState;

const TITLE: &str = "Ask the AI";

#[derive(Debug, Default, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub user_input: String,
}

pub fn routes() -> Router<SharedState> {
    Router::new().route("/ai", get(ask_form).post(ask_submit))
}

async fn ask_form(State(state): State<SharedState>) -> Html<String> {
    render::page(TITLE, "/ai", &[], &ask_body(&state, "", None, None))
}

async fn ask_submit(State(state): State<SharedState>, Form(form): Form<AskForm>) -> Html<String> {
    let (answer, error) = match state.ai.ask(&form.user_input).await {
        Ok(answer) => (Some(answer), None),
        Err(e) => (None, Some(e.to_string())),
    };

    render::page(
        TITLE,
        "/ai",
        &[],
        &ask_body(&state, &form.user_input, answer.as_deref(), error.as_deref()),
    )
}

fn ask_body(state: &SharedState, user_input: &str, answer: Option<&str>, error: Option<&str>) -> String {
    let mut body = String::new();

    match state.ai.model() {
        Some(model) => body.push_str(&format!(
            "<p class=\"muted\">Answers are generated by <code>{}</code> and may contain mistakes.</p>\n",
            escape_html(model)
        )),
        None => body.push_str(
            "<p class=\"muted\">The AI model is not configured on this server.</p>\n",
        ),
    }

    body.push_str(&format!(
        r#"<form class="card" method="post" action="/ai">
  <label for="user_input">Your question</label>
  <textarea id="user_input" name="user_input">{}</textarea>
  <button type="submit">Ask</button>
</form>
"#,
        escape_html(user_input)
    ));

    if let Some(error) = error {
        body.push_str(&format!(
            "<div class=\"alert alert-danger\" role=\"alert\">{}</div>\n",
            escape_html(error)
        ));
    }

    if let Some(answer) = answer {
        body.push_str(&format!(
            "<section class=\"card\">\n  <h2>Answer</h2>\n  <div class=\"answer\">{}</div>\n</section>\n",
            escape_html(answer)
        ));
    }

    body
}
