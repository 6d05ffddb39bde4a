//! Hash router.
//!
//! [`HashRouter`] owns the current route and view and reacts to fragment
//! changes one at a time: recompute the [`Route`] from scratch, select the
//! [`View`], ask the [`ViewHost`] to render it, then scroll to the top as a
//! post-render effect. Everything is synchronous; nothing here waits on I/O.

use serde::Serialize;
use tracing::debug;

use crate::route::Route;
use crate::view::View;

/// Fragment the site shell substitutes for an empty or bare `#/` entry.
pub const ENTRY_FRAGMENT: &str = "#/marketing";

/// Whether a shell landing on `fragment` should replace it with
/// [`ENTRY_FRAGMENT`]. Only an empty hash and `#/` qualify.
#[must_use]
pub fn needs_entry_redirect(fragment: &str) -> bool {
    matches!(fragment, "" | "#" | "#/")
}

/// Parse a fragment and select its view.
#[must_use]
pub fn resolve(fragment: &str) -> (Route, View) {
    let route = Route::parse(fragment);
    let view = View::select(&route);
    (route, view)
}

/// How the viewport moves back to the top after a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// The surface a router drives: whatever actually draws pages.
pub trait ViewHost {
    /// Draw `view` for `route`.
    fn render(&mut self, route: &Route, view: &View);

    /// Move the viewport to the top of the document.
    fn scroll_to_top(&mut self, behavior: ScrollBehavior);

    /// Scroll behavior to request. Hosts without smooth scrolling override
    /// this to [`ScrollBehavior::Instant`].
    fn scroll_behavior(&self) -> ScrollBehavior {
        ScrollBehavior::Smooth
    }
}

/// Client-side router over URL fragments.
#[derive(Debug)]
pub struct HashRouter<H> {
    host: H,
    fragment: String,
    route: Route,
    view: View,
    navigations: u64,
}

impl<H: ViewHost> HashRouter<H> {
    /// Start routing at `initial_fragment`. The first view is rendered
    /// before this returns; the initial load does not scroll.
    pub fn new(initial_fragment: &str, mut host: H) -> Self {
        let (route, view) = resolve(initial_fragment);
        host.render(&route, &view);
        debug!(fragment = initial_fragment, view = view.id(), "router started");
        Self {
            host,
            fragment: initial_fragment.to_owned(),
            route,
            view,
            navigations: 0,
        }
    }

    /// Handle a fragment-change event from the host.
    ///
    /// Re-renders and scrolls even when the selected view is unchanged
    /// (e.g. only the query differs), because the fragment itself changed.
    pub fn handle_hash_change(&mut self, fragment: &str) {
        let (route, view) = resolve(fragment);
        self.host.render(&route, &view);
        let behavior = self.host.scroll_behavior();
        self.host.scroll_to_top(behavior);

        debug!(fragment, view = view.id(), "navigated");
        fragment.clone_into(&mut self.fragment);
        self.route = route;
        self.view = view;
        self.navigations = self.navigations.saturating_add(1);
    }

    /// In-app navigation. Setting the fragment to its current value fires no
    /// change event, so this returns `false` and does nothing in that case.
    pub fn navigate(&mut self, fragment: &str) -> bool {
        if fragment == self.fragment {
            return false;
        }
        self.handle_hash_change(fragment);
        true
    }

    #[must_use]
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    #[must_use]
    pub fn route(&self) -> &Route {
        &self.route
    }

    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Navigations handled since start, not counting the initial render.
    #[must_use]
    pub fn navigations(&self) -> u64 {
        self.navigations
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }
}
