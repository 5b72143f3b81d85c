//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::RawQuery,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use recipe_finder_core::landing::{ABOUT_URL, LandingEffect, LandingEvent, LandingState, LandingView};

use super::query_pairs;
use crate::middleware::OptionalSession;

/// Message shown to signed-in visitors who open the landing page.
pub const INACCESSIBLE_PAGE: &str = "Inaccessible Page";

/// A header navigation entry.
#[derive(Clone)]
pub struct NavLink {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct LandingTemplate {
    pub view: &'static str,
    pub menu_open: bool,
    pub navigation: Vec<NavLink>,
    pub menu_href: String,
    pub close_menu_href: String,
    pub about_url: &'static str,
}

/// Generic error page.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub message: String,
}

/// Translate landing query parameters into navigation events.
///
/// `view` selects a section and `menu=open` opens the mobile menu; the last
/// value of a repeated key wins.
#[must_use]
pub fn landing_events(pairs: &[(String, String)]) -> Vec<LandingEvent> {
    let last = |key: &str| {
        pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };

    let mut events = Vec::new();
    if let Some(view) = last("view") {
        events.push(LandingEvent::Select(LandingView::from_key(view)));
    }
    if last("menu") == Some("open") {
        events.push(LandingEvent::OpenMenu);
    }
    events
}

fn view_href(view: LandingView, menu_open: bool) -> String {
    let mut href = match view {
        LandingView::Default => "/".to_string(),
        other => format!("/?view={}", other.key()),
    };
    if menu_open {
        href.push(if view == LandingView::Default { '?' } else { '&' });
        href.push_str("menu=open");
    }
    href
}

impl LandingTemplate {
    fn from_state(state: LandingState) -> Self {
        let navigation = LandingView::NAVIGATION
            .iter()
            .map(|&view| NavLink {
                label: view.label(),
                href: view_href(view, false),
                active: view == state.view,
            })
            .collect();

        Self {
            view: state.view.key(),
            menu_open: state.menu_open,
            navigation,
            menu_href: view_href(state.view, true),
            close_menu_href: view_href(state.view, false),
            about_url: ABOUT_URL,
        }
    }
}

/// Display the landing page.
///
/// Signed-in visitors get the "Inaccessible Page" view. Choosing "About"
/// sends the browser to the project page.
#[instrument(skip_all)]
pub async fn landing(OptionalSession(session): OptionalSession, RawQuery(query): RawQuery) -> Response {
    if session.is_some() {
        return ErrorTemplate {
            message: INACCESSIBLE_PAGE.to_string(),
        }
        .into_response();
    }

    let pairs = query_pairs(query.as_deref());
    let (state, effects) = LandingState::default().replay(landing_events(&pairs));

    if let Some(LandingEffect::OpenExternal(url)) = effects.first() {
        return Redirect::to(url).into_response();
    }

    LandingTemplate::from_state(state).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &str) -> Vec<(String, String)> {
        query_pairs(Some(raw))
    }

    #[test]
    fn test_landing_events() {
        assert_eq!(
            landing_events(&pairs("view=features&menu=open")),
            vec![
                LandingEvent::Select(LandingView::Features),
                LandingEvent::OpenMenu
            ]
        );
        assert!(landing_events(&pairs("")).is_empty());
        assert_eq!(
            landing_events(&pairs("view=product&view=about")),
            vec![LandingEvent::Select(LandingView::About)]
        );
    }

    #[test]
    fn test_view_href() {
        assert_eq!(view_href(LandingView::Default, false), "/");
        assert_eq!(view_href(LandingView::Default, true), "/?menu=open");
        assert_eq!(view_href(LandingView::Product, true), "/?view=product&menu=open");
    }

    #[test]
    fn test_template_marks_active_section() {
        let (state, _) = LandingState::default().replay(landing_events(&pairs("view=product")));
        let template = LandingTemplate::from_state(state);

        assert_eq!(template.view, "product");
        let active: Vec<_> = template
            .navigation
            .iter()
            .filter(|link| link.active)
            .map(|link| link.label)
            .collect();
        assert_eq!(active, vec!["Product"]);
    }

    #[tokio::test]
    async fn test_about_redirects_to_project_page() {
        let response = landing(OptionalSession(None), RawQuery(Some("view=about".to_string()))).await;
        assert_eq!(response.status(), axum::http::StatusCode::SEE_OTHER);
        assert_eq!(
            response
                .headers()
                .get(axum::http::header::LOCATION)
                .and_then(|v| v.to_str().ok()),
            Some(ABOUT_URL)
        );
    }
}
