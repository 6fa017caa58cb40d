//! Team page and roster loading

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::web::render::{self, escape_html};
use crate::web::SharedState;

/// One person shown on the team page
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TeamMember {
    pub name: String,
    /// External profile link (e.g. GitHub)
    #[serde(default)]
    pub profile_url: String,
    /// Image path or URL
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub bio: String,
}

#[derive(Debug, Error)]
pub enum TeamError {
    #[error("Cannot read team file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid team file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Roster used when no team file is configured
pub fn default_roster() -> Vec<TeamMember> {
    vec![TeamMember {
        name: "Luana Patrícia Gomes da Silva".to_string(),
        profile_url: "https://github.com/luanapatriciasilva".to_string(),
        photo: "/assets/images/luana.jpg".to_string(),
        bio: "Internet Systems student at Uniesp (PB). Passionate about technology and programming."
            .to_string(),
    }]
}

/// Reads a JSON array of team members.
///
/// # Errors
///
/// Returns `TeamError` if the file cannot be read or is not a valid roster.
pub fn load_roster(path: &Path) -> Result<Vec<TeamMember>, TeamError> {
    let content = fs::read_to_string(path).map_err(|source| TeamError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| TeamError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn routes() -> Router<SharedState> {
    Router::new().route("/team", get(team_page))
}

async fn team_page(State(state): State<SharedState>) -> Html<String> {
    let body = if state.team.is_empty() {
        "<p class=\"muted\">No team members listed yet.</p>".to_string()
    } else {
        let cards: String = state.team.iter().map(member_card).collect();
        format!("<section class=\"team\">\n{}</section>", cards)
    };

    render::page("Our Team", "/team", &[], &body)
}

fn member_card(member: &TeamMember) -> String {
    let mut card = String::from("<article class=\"card\">\n");

    if !member.photo.is_empty() {
        card.push_str(&format!(
            "  <img src=\"{}\" alt=\"{}\">\n",
            escape_html(&member.photo),
            escape_html(&member.name)
        ));
    }
    card.push_str(&format!("  <h2>{}</h2>\n", escape_html(&member.name)));
    if !member.bio.is_empty() {
        card.push_str(&format!("  <p>{}</p>\n", escape_html(&member.bio)));
    }
    if !member.profile_url.is_empty() {
        card.push_str(&format!(
            "  <p><a href=\"{}\" rel=\"noopener\" target=\"_blank\">Profile</a></p>\n",
            escape_html(&member.profile_url)
        ));
    }

    card.push_str("</article>\n");
    card
}
