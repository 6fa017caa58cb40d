//! Home page and the static lesson pages

use axum::response::Html;
use axum::routing::get;
use axum::Router;

use crate::web::render;
use crate::web::SharedState;

/// A page whose body is fixed at build time
#[derive(Clone, Copy, Debug)]
pub struct StaticPage {
    pub path: &'static str,
    pub title: &'static str,
    pub body: &'static str,
}

pub const HOME: StaticPage = StaticPage {
    path: "/",
    title: "Home",
    body: include_str!("../../static/pages/home.html"),
};

/// Lesson pages, in menu order
pub const LESSONS: &[StaticPage] = &[
    StaticPage {
        path: "/fundamentals",
        title: "Programming Fundamentals",
        body: include_str!("../../static/pages/fundamentals.html"),
    },
    StaticPage {
        path: "/selection",
        title: "Selection Structures",
        body: include_str!("../../static/pages/selection.html"),
    },
    StaticPage {
        path: "/repetition",
        title: "Repetition Structures",
        body: include_str!("../../static/pages/repetition.html"),
    },
    StaticPage {
        path: "/arrays-matrices",
        title: "Arrays and Matrices",
        body: include_str!("../../static/pages/arrays-matrices.html"),
    },
    StaticPage {
        path: "/functions",
        title: "Functions and Procedures",
        body: include_str!("../../static/pages/functions.html"),
    },
    StaticPage {
        path: "/exceptions",
        title: "Exception Handling",
        body: include_str!("../../static/pages/exceptions.html"),
    },
];

pub fn routes() -> Router<SharedState> {
    std::iter::once(&HOME)
        .chain(LESSONS)
        .fold(Router::new(), |router, page| {
            router.route(page.path, get(move || serve_page(page)))
        })
}

async fn serve_page(page: &'static StaticPage) -> Html<String> {
    // Lessons live under "Fundamentals" in the nav bar
    let active = if page.path == "/" { "/" } else { "/fundamentals" };
    render::page(page.title, active, &[], page.body)
}
