//! Glossary listing and the add / update / delete form handlers
//!
//! Every mutation runs one `TermStore::modify` cycle on the blocking pool,
//! then redirects back to the listing with the outcome as a flash message
//! carried in the query string (`/dictionary?level=..&message=..`).

use axum::extract::{Query, State};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::{Form, Router};
use reqwest::Url;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::core::types::{Flash, FlashLevel, Term, TermCollection};
use crate::core::{add_term, delete_term, update_term, MutationOutcome, ValidationError};
use crate::web::render::{self, escape_html};
use crate::web::SharedState;

/// Path of the listing page; every mutation redirects here.
pub const LIST_PATH: &str = "/dictionary";

const TITLE: &str = "Glossary";

// ─── Request types ───────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive filter on term and definition
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddForm {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub definition: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateForm {
    #[serde(default)]
    pub original_term: String,
    #[serde(default)]
    pub new_term: String,
    #[serde(default)]
    pub new_definition: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub term: String,
}

// ─── Routes ──────────────────────────────────────────────────

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route(LIST_PATH, get(list))
        .route("/dictionary/add", post(add))
        .route("/dictionary/update", post(update))
        .route("/dictionary/delete", post(delete))
}

// ─── Flash transport ─────────────────────────────────────────

/// Listing URL carrying `flash` in its query string
pub fn flash_location(flash: &Flash) -> String {
    let url = Url::parse("http://localhost").and_then(|base| base.join(LIST_PATH));

    match url {
        Ok(mut url) => {
            url.query_pairs_mut()
                .append_pair("level", &flash.level.to_string())
                .append_pair("message", &flash.message);
            match url.query() {
                Some(query) => format!("{}?{}", url.path(), query),
                None => url.path().to_string(),
            }
        }
        Err(_) => LIST_PATH.to_string(),
    }
}

/// Flash carried by a listing request, if any
///
/// An unknown level is shown as a warning rather than rejected.
pub fn flash_from_query(query: &ListQuery) -> Option<Flash> {
    let message = query.message.as_deref()?.trim();
    if message.is_empty() {
        return None;
    }

    let level = query
        .level
        .as_deref()
        .and_then(|l| l.parse::<FlashLevel>().ok())
        .unwrap_or(FlashLevel::Warning);

    Some(Flash {
        level,
        message: message.to_string(),
    })
}

// ─── Handlers ────────────────────────────────────────────────

async fn list(State(state): State<SharedState>, Query(query): Query<ListQuery>) -> Html<String> {
    let mut flashes: Vec<Flash> = flash_from_query(&query).into_iter().collect();

    let store = Arc::clone(&state.store);
    let terms = match tokio::task::spawn_blocking(move || store.try_load()).await {
        Ok(Ok(report)) => report.terms,
        Ok(Err(e)) => {
            error!("failed to load glossary for listing: {}", e);
            flashes.push(Flash::danger(format!("The glossary could not be read: {}", e)));
            TermCollection::new()
        }
        Err(e) => {
            error!("glossary load task failed: {}", e);
            flashes.push(Flash::danger("The glossary could not be read."));
            TermCollection::new()
        }
    };

    let q = query.q.as_deref().unwrap_or("").trim();
    render::page(TITLE, LIST_PATH, &flashes, &listing_body(&terms, q))
}

async fn add(State(state): State<SharedState>, Form(form): Form<AddForm>) -> Redirect {
    apply(&state, move |terms| add_term(terms, &form.term, &form.definition)).await
}

async fn update(State(state): State<SharedState>, Form(form): Form<UpdateForm>) -> Redirect {
    apply(&state, move |terms| {
        update_term(terms, &form.original_term, &form.new_term, &form.new_definition)
    })
    .await
}

async fn delete(State(state): State<SharedState>, Form(form): Form<DeleteForm>) -> Redirect {
    apply(&state, move |terms| delete_term(terms, &form.term)).await
}

/// Runs `op` in one store cycle and redirects with its outcome.
async fn apply<F>(state: &SharedState, op: F) -> Redirect
where
    F: FnOnce(&mut TermCollection) -> Result<MutationOutcome, ValidationError> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    let result = tokio::task::spawn_blocking(move || store.modify(op)).await;

    let flash = match result {
        Ok(Ok(Ok(outcome))) => {
            info!("glossary updated: {}", outcome);
            Flash::success(outcome.to_string())
        }
        Ok(Ok(Err(rejected))) => {
            info!("glossary change rejected: {}", rejected);
            Flash {
                level: rejected.level(),
                message: rejected.to_string(),
            }
        }
        Ok(Err(e)) => {
            error!("glossary change failed: {}", e);
            Flash::danger(format!("The glossary could not be saved: {}", e))
        }
        Err(e) => {
            error!("glossary task failed: {}", e);
            Flash::danger("The glossary could not be saved.")
        }
    };

    Redirect::to(&flash_location(&flash))
}

// ─── Rendering ───────────────────────────────────────────────

fn listing_body(terms: &TermCollection, query: &str) -> String {
    let shown = terms.search(query);
    let mut body = String::new();

    body.push_str(
        r#"<form class="card" method="post" action="/dictionary/add">
  <h2>Add a term</h2>
  <label for="term">Term</label>
  <input type="text" id="term" name="term">
  <label for="definition">Definition</label>
  <textarea id="definition" name="definition"></textarea>
  <button type="submit">Add</button>
</form>
"#,
    );

    body.push_str(&format!(
        r#"<form method="get" action="{}">
  <label for="q">Search</label>
  <input type="text" id="q" name="q" value="{}">
  <button type="submit">Search</button>
</form>
"#,
        LIST_PATH,
        escape_html(query)
    ));

    let summary = if query.is_empty() {
        format!("{} term(s)", terms.len())
    } else {
        format!(
            "{} of {} term(s) match '{}'",
            shown.len(),
            terms.len(),
            escape_html(query)
        )
    };
    body.push_str(&format!("<p class=\"muted\">{}</p>\n", summary));

    if shown.is_empty() {
        body.push_str("<p>No terms to show.</p>\n");
        return body;
    }

    body.push_str(
        "<table class=\"glossary\">\n<thead><tr><th>Term</th><th>Definition</th><th></th></tr></thead>\n<tbody>\n",
    );
    for term in &shown {
        body.push_str(&term_row(term));
    }
    body.push_str("</tbody>\n</table>\n");

    body
}

fn term_row(term: &Term) -> String {
    let name = escape_html(&term.term);
    let definition = escape_html(&term.definition);

    format!(
        r#"<tr>
  <td><strong>{name}</strong></td>
  <td>{definition}</td>
  <td>
    <details>
      <summary>Edit</summary>
      <form method="post" action="/dictionary/update">
        <input type="hidden" name="original_term" value="{name}">
        <label>New term</label>
        <input type="text" name="new_term" value="{name}">
        <label>New definition</label>
        <textarea name="new_definition">{definition}</textarea>
        <button type="submit">Save</button>
      </form>
    </details>
    <form class="inline" method="post" action="/dictionary/delete">
      <input type="hidden" name="term" value="{name}">
      <button class="danger" type="submit">Delete</button>
    </form>
  </td>
</tr>
"#,
        name = name,
        definition = definition
    )
}
