use gridiron_terminal::datasets::Datasets;
use gridiron_terminal::provider::DataProvider;
use gridiron_terminal::router::{LoadRequester, RouterState, ViewRouter};
use gridiron_terminal::scoreboard::OfflineClient;
use gridiron_terminal::session::{Session, SessionGate};
use gridiron_terminal::state::{
    AppState, Delta, FetchResult, FetchStatus, Screen, ViewName, apply_delta,
};
use gridiron_terminal::storage::MemoryStore;

/// Runs every requested load straight through a provider and queues the
/// results, the way the worker thread would.
struct InlineLoader {
    provider: DataProvider<OfflineClient>,
    loads: Vec<(ViewName, u64)>,
    pending: Vec<Delta>,
}

impl InlineLoader {
    fn new() -> Self {
        Self {
            provider: DataProvider::new(Datasets::bundled(), OfflineClient).with_seed(11),
            loads: Vec::new(),
            pending: Vec::new(),
        }
    }

    fn deliver(&mut self, state: &mut AppState) {
        for delta in self.pending.drain(..) {
            apply_delta(state, delta);
        }
    }
}

impl LoadRequester for InlineLoader {
    fn request_load(&mut self, view: ViewName, generation: u64) {
        self.loads.push((view, generation));
        let result = self.provider.load(view);
        self.pending.push(Delta::ViewLoaded {
            view,
            generation,
            result,
        });
    }
}

fn signed_in() -> (SessionGate<MemoryStore>, Session) {
    let mut gate = SessionGate::new(MemoryStore::new());
    let session = gate.login("coach@football.com", "coach2024").expect("accepted");
    (gate, session)
}

fn active_views(router: &ViewRouter) -> Vec<ViewName> {
    router
        .nav_items()
        .into_iter()
        .filter(|(_, active)| *active)
        .map(|(view, _)| view)
        .collect()
}

#[test]
fn bogus_view_lands_on_dashboard() {
    let (_, session) = signed_in();
    let mut loader = InlineLoader::new();
    let mut router = ViewRouter::new();
    router.enter(&session, None, &mut loader);
    assert_eq!(router.navigate("bogus-view", &mut loader), Some(ViewName::Dashboard));
    assert_eq!(router.state(), RouterState::Viewing(ViewName::Dashboard));
    assert_eq!(active_views(&router), vec![ViewName::Dashboard]);
}

#[test]
fn navigating_twice_reloads_once_per_call() {
    let (_, session) = signed_in();
    let mut loader = InlineLoader::new();
    let mut router = ViewRouter::new();
    router.enter(&session, None, &mut loader);
    loader.loads.clear();

    router.navigate("players", &mut loader);
    router.navigate("players", &mut loader);

    assert_eq!(active_views(&router), vec![ViewName::Players]);
    assert_eq!(loader.loads.len(), 2);
    assert!(loader.loads.iter().all(|(view, _)| *view == ViewName::Players));
}

#[test]
fn exactly_one_view_is_active_after_any_sequence() {
    let (_, session) = signed_in();
    let mut loader = InlineLoader::new();
    let mut router = ViewRouter::new();
    router.enter(&session, Some("teams"), &mut loader);
    let sequence = [
        "players",
        "statistics",
        "nope",
        "live-games",
        "predictions",
        "teams",
        "",
        "dashboard",
    ];
    for name in sequence {
        let landed = router.navigate(name, &mut loader).expect("signed in");
        assert_eq!(active_views(&router), vec![landed]);
        assert_eq!(landed, ViewName::parse(name));
    }
}

#[test]
fn signed_out_navigation_issues_no_loads() {
    let mut loader = InlineLoader::new();
    let mut router = ViewRouter::new();
    assert_eq!(router.navigate("teams", &mut loader), None);
    assert!(loader.loads.is_empty());
    assert!(active_views(&router).is_empty());
}

#[test]
fn stale_results_are_discarded() {
    let (_, session) = signed_in();
    let mut state = AppState::new();
    let mut loader = InlineLoader::new();
    state.sign_in(session.clone());
    state.router.enter(&session, None, &mut loader);

    // A slow dashboard result arrives after the user moved to teams.
    state.router.navigate("teams", &mut loader);
    loader.deliver(&mut state);

    let data = state.view_data.as_ref().expect("teams result applied");
    assert_eq!(data.view, ViewName::Teams);
    assert_eq!(state.current_result().map(FetchResult::status), Some(FetchStatus::Success));
    assert!(state.logs.iter().any(|line| line.contains("Discarded stale dashboard")));
}

#[test]
fn superseded_load_of_the_same_view_is_discarded() {
    let (_, session) = signed_in();
    let mut state = AppState::new();
    let mut loader = InlineLoader::new();
    state.sign_in(session.clone());
    state.router.enter(&session, Some("players"), &mut loader);
    state.router.refresh(&mut loader);

    let (_, first) = loader.loads[0];
    let (_, second) = loader.loads[1];
    let mut pending = std::mem::take(&mut loader.pending);
    let newest = pending.pop().expect("second load");
    let oldest = pending.pop().expect("first load");

    apply_delta(&mut state, newest);
    apply_delta(&mut state, oldest);

    let data = state.view_data.as_ref().expect("result applied");
    assert_eq!(data.generation, second);
    assert_ne!(first, second);
}

#[test]
fn marked_view_survives_restart_and_clears_on_logout() {
    let (mut gate, session) = signed_in();
    gate.remember_view(ViewName::Statistics);

    let mut loader = InlineLoader::new();
    let mut router = ViewRouter::new();
    let marked = gate.marked_view().map(ViewName::as_str);
    assert_eq!(router.enter(&session, marked, &mut loader), ViewName::Statistics);

    gate.logout();
    assert_eq!(gate.marked_view(), None);
    assert_eq!(gate.check_auth(), None);
}

#[test]
fn sign_out_returns_to_login_screen() {
    let (_, session) = signed_in();
    let mut state = AppState::new();
    let mut loader = InlineLoader::new();
    state.sign_in(session.clone());
    state.router.enter(&session, None, &mut loader);
    loader.deliver(&mut state);
    assert_eq!(state.screen, Screen::Main);

    state.sign_out();
    assert_eq!(state.screen, Screen::Login);
    assert_eq!(state.current_view(), None);
    assert!(state.view_data.is_none());
    assert!(state.session.is_none());
}

#[test]
fn entering_a_session_lands_on_the_marked_view() {
    let (mut gate, session) = signed_in();
    gate.remember_view(ViewName::Players);
    let mut state = AppState::new();
    let mut loader = InlineLoader::new();

    let view = state.enter_session(&mut gate, session, &mut loader);
    assert_eq!(view, ViewName::Players);
    assert_eq!(state.screen, Screen::Main);
    assert!(state.loading);
    assert_eq!(loader.loads, vec![(ViewName::Players, 1)]);

    loader.deliver(&mut state);
    assert!(!state.loading);
    assert_eq!(state.current_view(), Some(ViewName::Players));
}

#[test]
fn switching_views_resets_filters_and_remembers_the_view() {
    let (mut gate, session) = signed_in();
    let mut state = AppState::new();
    let mut loader = InlineLoader::new();
    state.enter_session(&mut gate, session, &mut loader);
    state.navigate(&mut gate, "teams", &mut loader);
    loader.deliver(&mut state);
    state.filters.set("conference", "AFC");
    state.scroll_down();

    assert_eq!(
        state.navigate(&mut gate, "statistics", &mut loader),
        Some(ViewName::Statistics)
    );
    assert!(state.filters.is_empty());
    assert_eq!(state.scroll, 0);
    assert!(state.view_data.is_none());
    assert!(state.loading);
    assert_eq!(gate.marked_view(), Some(ViewName::Statistics));
}

#[test]
fn reloading_keeps_filters_and_current_data() {
    let (mut gate, session) = signed_in();
    let mut state = AppState::new();
    let mut loader = InlineLoader::new();
    state.enter_session(&mut gate, session, &mut loader);
    state.navigate(&mut gate, "teams", &mut loader);
    loader.deliver(&mut state);
    state.filters.set("conference", "AFC");
    let before = state.view_data.as_ref().map(|data| data.generation);

    assert_eq!(state.navigate(&mut gate, "teams", &mut loader), Some(ViewName::Teams));
    assert_eq!(state.filters.get("conference"), Some("AFC"));
    assert_eq!(state.view_data.as_ref().map(|data| data.generation), before);
    assert!(state.loading);

    loader.deliver(&mut state);
    assert!(!state.loading);
    assert_ne!(state.view_data.as_ref().map(|data| data.generation), before);
}

#[test]
fn navigating_while_signed_out_returns_to_login() {
    let (mut gate, _) = signed_in();
    let mut state = AppState::new();
    state.screen = Screen::Main;
    let mut loader = InlineLoader::new();
    assert_eq!(state.navigate(&mut gate, "teams", &mut loader), None);
    assert_eq!(state.screen, Screen::Login);
    assert!(loader.loads.is_empty());
}

#[test]
fn logout_clears_gate_and_state() {
    let (mut gate, session) = signed_in();
    let mut state = AppState::new();
    let mut loader = InlineLoader::new();
    state.enter_session(&mut gate, session, &mut loader);
    state.logout(&mut gate);
    assert_eq!(state.screen, Screen::Login);
    assert_eq!(gate.check_auth(), None);
    assert_eq!(gate.marked_view(), None);
    assert!(state.logs.iter().any(|line| line == "[INFO] Signed out"));
}
