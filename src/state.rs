use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::filter::{self, FilterState};
use crate::router::{LoadRequester, ViewRouter};
use crate::session::{Session, SessionGate};
use crate::storage::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewName {
    Dashboard,
    Teams,
    Players,
    LiveGames,
    Statistics,
    Predictions,
}

impl ViewName {
    pub const COUNT: usize = 6;
    pub const ALL: [ViewName; Self::COUNT] = [
        ViewName::Dashboard,
        ViewName::Teams,
        ViewName::Players,
        ViewName::LiveGames,
        ViewName::Statistics,
        ViewName::Predictions,
    ];

    /// Unknown names normalize to the dashboard.
    pub fn parse(raw: &str) -> ViewName {
        Self::from_name(raw).unwrap_or(ViewName::Dashboard)
    }

    pub fn from_name(raw: &str) -> Option<ViewName> {
        let raw = raw.trim();
        Self::ALL.into_iter().find(|view| view.as_str() == raw)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewName::Dashboard => "dashboard",
            ViewName::Teams => "teams",
            ViewName::Players => "players",
            ViewName::LiveGames => "live-games",
            ViewName::Statistics => "statistics",
            ViewName::Predictions => "predictions",
        }
    }

    pub fn index(self) -> usize {
        match self {
            ViewName::Dashboard => 0,
            ViewName::Teams => 1,
            ViewName::Players => 2,
            ViewName::LiveGames => 3,
            ViewName::Statistics => 4,
            ViewName::Predictions => 5,
        }
    }

    pub fn next(self) -> ViewName {
        Self::ALL[(self.index() + 1) % Self::COUNT]
    }

    pub fn prev(self) -> ViewName {
        Self::ALL[(self.index() + Self::COUNT - 1) % Self::COUNT]
    }
}

pub fn view_label(view: ViewName) -> &'static str {
    match view {
        ViewName::Dashboard => "Dashboard",
        ViewName::Teams => "Teams",
        ViewName::Players => "Players",
        ViewName::LiveGames => "Live Games",
        ViewName::Statistics => "Statistics",
        ViewName::Predictions => "Predictions",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub city: String,
    pub conference: String,
    pub division: String,
    pub coach: String,
    pub wins: u32,
    pub losses: u32,
    pub stadium: String,
    pub founded: u16,
    #[serde(default)]
    pub colors: Vec<String>,
}

impl Team {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.city, self.name)
    }

    pub fn win_pct(&self) -> f32 {
        let games = self.wins + self.losses;
        if games == 0 {
            return 0.0;
        }
        self.wins as f32 / games as f32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub position: String,
    pub team: String,
    pub jersey_number: u8,
    pub age: u8,
    pub height: String,
    pub weight: u16,
    pub college: String,
    pub experience: u8,
    pub season_stats: SeasonStats,
}

/// Season line for a player, keyed by role archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SeasonStats {
    Passing(PassingStats),
    Rushing(RushingStats),
    Receiving(ReceivingStats),
    Defense(DefenseStats),
    Kicking(KickingStats),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassingStats {
    pub yards: u32,
    pub touchdowns: u32,
    pub interceptions: u32,
    pub completion_pct: f32,
    pub rating: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RushingStats {
    pub attempts: u32,
    pub yards: u32,
    pub touchdowns: u32,
    pub yards_per_carry: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivingStats {
    pub targets: u32,
    pub receptions: u32,
    pub yards: u32,
    pub touchdowns: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefenseStats {
    pub tackles: u32,
    pub sacks: f32,
    pub interceptions: u32,
    pub forced_fumbles: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KickingStats {
    pub field_goals_made: u32,
    pub field_goals_attempted: u32,
    pub long: u32,
    pub extra_points: u32,
}

impl SeasonStats {
    pub fn archetype(&self) -> &'static str {
        match self {
            SeasonStats::Passing(_) => "passing",
            SeasonStats::Rushing(_) => "rushing",
            SeasonStats::Receiving(_) => "receiving",
            SeasonStats::Defense(_) => "defense",
            SeasonStats::Kicking(_) => "kicking",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub game_type: String,
    pub date: String,
    pub time: String,
    pub home_team: String,
    pub away_team: String,
    pub stadium: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leader {
    pub player: String,
    pub team: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderCategory {
    pub category: String,
    pub unit: String,
    pub leaders: Vec<Leader>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayoffSeed {
    pub seed: u8,
    pub team: String,
    pub record: String,
    #[serde(default)]
    pub clinched: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConferenceSeeds {
    pub conference: String,
    pub seeds: Vec<PlayoffSeed>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub leaders: Vec<LeaderCategory>,
    pub playoff_picture: Vec<ConferenceSeeds>,
}

/// One event from the scoreboard feed (or the demo set standing in for it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveGame {
    pub id: String,
    pub name: String,
    pub date: String,
    pub venue: String,
    pub status: GameStatus,
    pub home: Competitor,
    pub away: Competitor,
    pub broadcast: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStatus {
    /// Feed phase: `pre`, `in` or `post`.
    pub state: String,
    pub detail: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub team: String,
    pub abbreviation: String,
    pub score: u32,
    pub record: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub game_id: String,
    pub game_type: String,
    pub date: String,
    pub home_team: String,
    pub away_team: String,
    pub predicted_winner: String,
    /// Illustrative confidence in percent, generated before projection.
    pub confidence: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Success,
    Fallback,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Network,
    Bundled,
    Demo,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    Scoreboard(Vec<LiveGame>),
    Teams(Vec<Team>),
    Players(Vec<Player>),
    Schedule(Vec<Game>),
    Statistics(Statistics),
    Predictions(Vec<Prediction>),
}

impl Payload {
    pub fn len(&self) -> usize {
        match self {
            Payload::Empty => 0,
            Payload::Scoreboard(games) => games.len(),
            Payload::Teams(teams) => teams.len(),
            Payload::Players(players) => players.len(),
            Payload::Schedule(games) => games.len(),
            Payload::Statistics(stats) => stats.leaders.len() + stats.playoff_picture.len(),
            Payload::Predictions(preds) => preds.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distinct values of `field` across the payload's records, in first-seen order.
    pub fn distinct_values(&self, field: &str) -> Vec<String> {
        match self {
            Payload::Scoreboard(games) => filter::distinct_values(games, field),
            Payload::Teams(teams) => filter::distinct_values(teams, field),
            Payload::Players(players) => filter::distinct_values(players, field),
            Payload::Schedule(games) => filter::distinct_values(games, field),
            Payload::Predictions(preds) => filter::distinct_values(preds, field),
            Payload::Empty | Payload::Statistics(_) => Vec::new(),
        }
    }
}

/// Normalized outcome of acquiring a view's dataset.
///
/// Built only through the constructors so that `unavailable` is always empty
/// and `fallback` always carries a non-empty demo payload.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    status: FetchStatus,
    source: DataSource,
    payload: Payload,
}

impl FetchResult {
    pub fn success(source: DataSource, payload: Payload) -> Self {
        Self {
            status: FetchStatus::Success,
            source,
            payload,
        }
    }

    /// The fixed demo scoreboard, marked as a fallback.
    pub fn fallback() -> Self {
        Self {
            status: FetchStatus::Fallback,
            source: DataSource::Demo,
            payload: Payload::Scoreboard(crate::demo::demo_games()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            status: FetchStatus::Unavailable,
            source: DataSource::Bundled,
            payload: Payload::Empty,
        }
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            focus: LoginField::Email,
            error: None,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    pub fn push_char(&mut self, ch: char) {
        match self.focus {
            LoginField::Email => self.email.push(ch),
            LoginField::Password => self.password.push(ch),
        }
    }

    pub fn pop_char(&mut self) {
        match self.focus {
            LoginField::Email => self.email.pop(),
            LoginField::Password => self.password.pop(),
        };
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Data shown for the current view, tagged with the request that produced it.
#[derive(Debug, Clone)]
pub struct ViewData {
    pub view: ViewName,
    pub generation: u64,
    pub result: FetchResult,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub session: Option<Session>,
    pub router: ViewRouter,
    pub view_data: Option<ViewData>,
    pub loading: bool,
    pub filters: FilterState,
    pub filter_field: usize,
    pub scroll: u16,
    pub login: LoginForm,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Login,
            session: None,
            router: ViewRouter::new(),
            view_data: None,
            loading: false,
            filters: FilterState::default(),
            filter_field: 0,
            scroll: 0,
            login: LoginForm::new(),
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
        }
    }

    pub fn current_view(&self) -> Option<ViewName> {
        self.router.current()
    }

    /// Result for the current view, if one has arrived since the last navigation.
    pub fn current_result(&self) -> Option<&FetchResult> {
        let view = self.current_view()?;
        self.view_data
            .as_ref()
            .filter(|data| data.view == view)
            .map(|data| &data.result)
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// Resets per-view UI state after the router moved to a different view.
    pub fn reset_view_state(&mut self) {
        self.view_data = None;
        self.filters.clear();
        self.filter_field = 0;
        self.scroll = 0;
    }

    pub fn sign_in(&mut self, session: Session) {
        self.session = Some(session);
        self.screen = Screen::Main;
        self.login = LoginForm::new();
    }

    pub fn sign_out(&mut self) {
        self.session = None;
        self.screen = Screen::Login;
        self.router.sign_out();
        self.reset_view_state();
        self.loading = false;
        self.help_overlay = false;
    }

    /// Enters the main screen for a new or restored session, landing on the
    /// view the gate last marked active.
    pub fn enter_session<S: SessionStore>(
        &mut self,
        gate: &mut SessionGate<S>,
        session: Session,
        loader: &mut impl LoadRequester,
    ) -> ViewName {
        let marked = gate.marked_view();
        self.sign_in(session.clone());
        self.reset_view_state();
        let view = self
            .router
            .enter(&session, marked.map(ViewName::as_str), loader);
        self.loading = true;
        gate.remember_view(view);
        view
    }

    /// Gated navigation. Moving to another view drops the old view's data and
    /// filters; reloading the current view keeps them until the new result
    /// lands. Signed out, this sends the user back to the login screen.
    pub fn navigate<S: SessionStore>(
        &mut self,
        gate: &mut SessionGate<S>,
        requested: &str,
        loader: &mut impl LoadRequester,
    ) -> Option<ViewName> {
        let before = self.current_view();
        let Some(view) = self.router.navigate(requested, loader) else {
            self.screen = Screen::Login;
            return None;
        };
        if before != Some(view) {
            self.reset_view_state();
        }
        self.loading = true;
        gate.remember_view(view);
        Some(view)
    }

    pub fn logout<S: SessionStore>(&mut self, gate: &mut SessionGate<S>) {
        gate.logout();
        self.sign_out();
        self.push_log("[INFO] Signed out");
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    /// Name of the field the `f` key currently cycles.
    pub fn active_filter_field(&self) -> Option<&'static str> {
        let fields = filter::filter_fields(self.current_view()?);
        if fields.is_empty() {
            return None;
        }
        fields.get(self.filter_field % fields.len()).copied()
    }

    pub fn cycle_filter_field(&mut self) {
        let Some(view) = self.current_view() else {
            return;
        };
        let count = filter::filter_fields(view).len();
        if count == 0 {
            return;
        }
        self.filter_field = (self.filter_field + 1) % count;
    }

    /// Steps the active filter through "all" followed by every distinct value
    /// in the current payload.
    pub fn cycle_filter_value(&mut self) {
        let Some(field) = self.active_filter_field() else {
            return;
        };
        let Some(result) = self.current_result() else {
            return;
        };
        let mut options = vec![String::new()];
        options.extend(result.payload().distinct_values(field));
        let current = self.filters.get(field).unwrap_or("");
        let pos = options.iter().position(|opt| opt == current).unwrap_or(0);
        let next = options[(pos + 1) % options.len()].clone();
        self.filters.set(field, next);
        self.scroll = 0;
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.scroll = 0;
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    ViewLoaded {
        view: ViewName,
        generation: u64,
        result: FetchResult,
    },
    Log(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCommand {
    Load { view: ViewName, generation: u64 },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::ViewLoaded {
            view,
            generation,
            result,
        } => {
            if !state.router.accepts(view, generation) {
                tracing::debug!(view = view.as_str(), generation, "discarding stale load");
                state.push_log(format!("[INFO] Discarded stale {} load", view.as_str()));
                return;
            }
            match result.status() {
                FetchStatus::Success => {}
                FetchStatus::Fallback => state.push_log(
                    "[WARN] Live scoreboard unavailable, showing demo games".to_string(),
                ),
                FetchStatus::Unavailable => state.push_log(format!(
                    "[WARN] No data available for {}",
                    view_label(view)
                )),
            }
            state.loading = false;
            state.view_data = Some(ViewData {
                view,
                generation,
                result,
            });
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
