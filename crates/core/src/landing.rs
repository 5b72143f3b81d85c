//! Landing page navigation state.
//!
//! The landing page shows one of a fixed set of sections and a mobile menu
//! that can be open or closed. Navigation is modelled as events applied to a
//! [`LandingState`]; selecting a section that lives off-site yields a
//! [`LandingEffect`] for the caller to perform and leaves the page on the
//! default section.

use serde::{Deserialize, Serialize};

/// Where the "About" entry points.
pub const ABOUT_URL: &str = "https://github.com/Sanjukktha";

/// A landing page section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandingView {
    Product,
    Features,
    About,
    #[default]
    Default,
}

impl LandingView {
    /// Sections listed in the header navigation, in display order.
    pub const NAVIGATION: [Self; 3] = [Self::Product, Self::Features, Self::About];

    /// Resolve a navigation key; anything unrecognised is the default view.
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        match key {
            "product" => Self::Product,
            "features" => Self::Features,
            "about" => Self::About,
            _ => Self::Default,
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Features => "features",
            Self::About => "about",
            Self::Default => "default",
        }
    }

    /// Header label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::Features => "Features",
            Self::About => "About",
            Self::Default => "Home",
        }
    }
}

/// Something that happened on the landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingEvent {
    /// A navigation entry was chosen (desktop header or mobile menu).
    Select(LandingView),
    /// A section asked to go back to the default view.
    Reset,
    OpenMenu,
    CloseMenu,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingEffect {
    /// Open an external page (in a new tab for browsers).
    OpenExternal(&'static str),
}

/// Current landing page state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LandingState {
    pub view: LandingView,
    pub menu_open: bool,
}

impl LandingState {
    /// Apply an event, returning the next state and any effect to perform.
    ///
    /// Choosing a section always closes the mobile menu. Choosing
    /// [`LandingView::About`] never stays selected: it opens [`ABOUT_URL`]
    /// and the page shows the default view.
    #[must_use]
    pub const fn apply(self, event: LandingEvent) -> (Self, Option<LandingEffect>) {
        match event {
            LandingEvent::Select(LandingView::About) => (
                Self {
                    view: LandingView::Default,
                    menu_open: false,
                },
                Some(LandingEffect::OpenExternal(ABOUT_URL)),
            ),
            LandingEvent::Select(view) => (
                Self {
                    view,
                    menu_open: false,
                },
                None,
            ),
            LandingEvent::Reset => (
                Self {
                    view: LandingView::Default,
                    menu_open: self.menu_open,
                },
                None,
            ),
            LandingEvent::OpenMenu => (
                Self {
                    view: self.view,
                    menu_open: true,
                },
                None,
            ),
            LandingEvent::CloseMenu => (
                Self {
                    view: self.view,
                    menu_open: false,
                },
                None,
            ),
        }
    }

    /// Fold a sequence of events, collecting effects in order.
    #[must_use]
    pub fn replay(self, events: impl IntoIterator<Item = LandingEvent>) -> (Self, Vec<LandingEffect>) {
        let mut state = self;
        let mut effects = Vec::new();
        for event in events {
            let (next, effect) = state.apply(event);
            state = next;
            effects.extend(effect);
        }
        (state, effects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_roundtrip() {
        for view in LandingView::NAVIGATION {
            assert_eq!(LandingView::from_key(view.key()), view);
        }
        assert_eq!(LandingView::from_key("pricing"), LandingView::Default);
        assert_eq!(LandingView::from_key(""), LandingView::Default);
    }

    #[test]
    fn test_select_section_closes_menu() {
        let state = LandingState {
            view: LandingView::Default,
            menu_open: true,
        };
        let (next, effect) = state.apply(LandingEvent::Select(LandingView::Features));
        assert_eq!(next.view, LandingView::Features);
        assert!(!next.menu_open);
        assert_eq!(effect, None);
    }

    #[test]
    fn test_about_opens_external_and_resets() {
        let state = LandingState {
            view: LandingView::Product,
            menu_open: false,
        };
        let (next, effect) = state.apply(LandingEvent::Select(LandingView::About));
        assert_eq!(next.view, LandingView::Default);
        assert_eq!(effect, Some(LandingEffect::OpenExternal(ABOUT_URL)));
    }

    #[test]
    fn test_reset_returns_to_default() {
        let state = LandingState {
            view: LandingView::Product,
            menu_open: false,
        };
        let (next, _) = state.apply(LandingEvent::Reset);
        assert_eq!(next, LandingState::default());
    }

    #[test]
    fn test_menu_toggle_keeps_view() {
        let (state, effects) = LandingState::default().replay([
            LandingEvent::Select(LandingView::Product),
            LandingEvent::OpenMenu,
        ]);
        assert_eq!(state.view, LandingView::Product);
        assert!(state.menu_open);
        assert!(effects.is_empty());

        let (state, _) = state.apply(LandingEvent::CloseMenu);
        assert!(!state.menu_open);
        assert_eq!(state.view, LandingView::Product);
    }

    #[test]
    fn test_replay_collects_effects() {
        let (state, effects) = LandingState::default().replay([
            LandingEvent::OpenMenu,
            LandingEvent::Select(LandingView::About),
            LandingEvent::Select(LandingView::About),
        ]);
        assert_eq!(state, LandingState::default());
        assert_eq!(effects.len(), 2);
    }
}
