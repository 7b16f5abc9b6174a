use crate::session::Session;
use crate::state::ViewName;

/// Receives the data loads the router issues on navigation.
pub trait LoadRequester {
    fn request_load(&mut self, view: ViewName, generation: u64);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    Unauthenticated,
    Viewing(ViewName),
}

/// Navigation state machine over `ViewName ∪ {unauthenticated}`.
///
/// Every issued load is stamped with a per-view generation; only the newest
/// generation of the current view is accepted when results come back.
#[derive(Debug, Clone)]
pub struct ViewRouter {
    state: RouterState,
    generations: [u64; ViewName::COUNT],
}

impl Default for ViewRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewRouter {
    pub fn new() -> Self {
        Self {
            state: RouterState::Unauthenticated,
            generations: [0; ViewName::COUNT],
        }
    }

    pub fn state(&self) -> RouterState {
        self.state
    }

    pub fn current(&self) -> Option<ViewName> {
        match self.state {
            RouterState::Viewing(view) => Some(view),
            RouterState::Unauthenticated => None,
        }
    }

    pub fn is_active(&self, view: ViewName) -> bool {
        self.current() == Some(view)
    }

    /// Navigation surface: every view with its active mark.
    pub fn nav_items(&self) -> [(ViewName, bool); ViewName::COUNT] {
        ViewName::ALL.map(|view| (view, self.is_active(view)))
    }

    /// Leaves the unauthenticated state once the gate reports a session,
    /// landing on the marked view (dashboard if none).
    pub fn enter(
        &mut self,
        _session: &Session,
        marked: Option<&str>,
        loader: &mut impl LoadRequester,
    ) -> ViewName {
        let view = marked.map(ViewName::parse).unwrap_or(ViewName::Dashboard);
        self.state = RouterState::Viewing(view);
        tracing::info!(view = view.as_str(), "router entered");
        self.issue(view, loader);
        view
    }

    pub fn sign_out(&mut self) {
        self.state = RouterState::Unauthenticated;
    }

    /// Gated navigation. Unknown names land on the dashboard; re-navigating
    /// to the current view still reloads it. Returns the view now current, or
    /// `None` when unauthenticated.
    pub fn navigate(&mut self, requested: &str, loader: &mut impl LoadRequester) -> Option<ViewName> {
        if self.state == RouterState::Unauthenticated {
            tracing::debug!(requested, "navigation ignored while signed out");
            return None;
        }
        let view = ViewName::parse(requested);
        self.state = RouterState::Viewing(view);
        self.issue(view, loader);
        Some(view)
    }

    pub fn navigate_to(&mut self, view: ViewName, loader: &mut impl LoadRequester) -> Option<ViewName> {
        self.navigate(view.as_str(), loader)
    }

    /// Reloads the current view.
    pub fn refresh(&mut self, loader: &mut impl LoadRequester) -> Option<ViewName> {
        let view = self.current()?;
        self.navigate_to(view, loader)
    }

    pub fn latest_generation(&self, view: ViewName) -> u64 {
        self.generations[view.index()]
    }

    /// Whether a load result is still wanted: current view, newest request.
    pub fn accepts(&self, view: ViewName, generation: u64) -> bool {
        self.is_active(view) && self.latest_generation(view) == generation
    }

    fn issue(&mut self, view: ViewName, loader: &mut impl LoadRequester) {
        let slot = &mut self.generations[view.index()];
        *slot = slot.wrapping_add(1);
        loader.request_load(view, *slot);
    }
}
