use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::datasets::Datasets;
use crate::error::{DataMissingError, NetworkFailure};
use crate::scoreboard::{ScoreboardClient, parse_scoreboard_json};
use crate::state::{
    DataSource, Delta, FetchResult, FetchStatus, Game, LiveGame, Payload, Prediction,
    ProviderCommand, Team, ViewName, view_label,
};

const CONFIDENCE_MIN: u8 = 55;
const CONFIDENCE_MAX: u8 = 95;

/// Acquires one view's dataset per call: bundled data for most views, a
/// single scoreboard request with demo fallback for the dashboard.
pub struct DataProvider<C: ScoreboardClient> {
    bundled: BundledViews,
    client: C,
}

impl<C: ScoreboardClient> DataProvider<C> {
    pub fn new(datasets: Datasets, client: C) -> Self {
        Self {
            bundled: BundledViews::new(datasets),
            client,
        }
    }

    /// Makes generated confidence scores reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.bundled = self.bundled.with_seed(seed);
        self
    }

    pub fn datasets(&self) -> &Datasets {
        self.bundled.datasets()
    }

    pub fn load(&mut self, view: ViewName) -> FetchResult {
        match view {
            ViewName::Dashboard => load_scoreboard(&self.client),
            _ => self.bundled.load(view),
        }
    }
}

/// Views served straight from the bundled datasets. Loads never touch the
/// network.
pub struct BundledViews {
    datasets: Datasets,
    rng: StdRng,
}

impl BundledViews {
    pub fn new(datasets: Datasets) -> Self {
        Self {
            datasets,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn datasets(&self) -> &Datasets {
        &self.datasets
    }

    /// The dashboard has no bundled dataset and always reports unavailable here.
    pub fn load(&mut self, view: ViewName) -> FetchResult {
        let result = match view {
            ViewName::Dashboard => Err(DataMissingError {
                dataset: "scoreboard",
            }),
            ViewName::Teams => bundled("teams", self.datasets.teams.as_ref())
                .map(|teams| Payload::Teams(teams.clone())),
            ViewName::Players => bundled("players", self.datasets.players.as_ref())
                .map(|players| Payload::Players(players.clone())),
            ViewName::LiveGames => bundled("schedule", self.datasets.schedule.as_ref())
                .map(|games| Payload::Schedule(games.clone())),
            ViewName::Statistics => bundled("statistics", self.datasets.statistics.as_ref())
                .map(|stats| Payload::Statistics(stats.clone())),
            ViewName::Predictions => self.predictions().map(Payload::Predictions),
        };

        match result {
            Ok(payload) => FetchResult::success(DataSource::Bundled, payload),
            Err(err) => {
                tracing::warn!(view = view.as_str(), "{err}");
                FetchResult::unavailable()
            }
        }
    }

    /// One prediction per scheduled game. The pick is the team with the
    /// better bundled record (home on ties); confidence is drawn here so the
    /// projection stays pure.
    fn predictions(&mut self) -> Result<Vec<Prediction>, DataMissingError> {
        let schedule = bundled("schedule", self.datasets.schedule.as_ref())?;
        let teams = bundled("teams", self.datasets.teams.as_ref())?;

        let mut out = Vec::with_capacity(schedule.len());
        for game in schedule {
            let confidence = self.rng.gen_range(CONFIDENCE_MIN..=CONFIDENCE_MAX);
            out.push(predict(game, teams, confidence));
        }
        Ok(out)
    }
}

/// One scoreboard request. Every failure, including an empty scoreboard,
/// becomes the demo fallback.
pub fn load_scoreboard<C: ScoreboardClient + ?Sized>(client: &C) -> FetchResult {
    match fetch_live_games(client) {
        Ok(games) => {
            tracing::info!(games = games.len(), "scoreboard loaded");
            FetchResult::success(DataSource::Network, Payload::Scoreboard(games))
        }
        Err(err) => {
            tracing::warn!("scoreboard fallback: {err}");
            FetchResult::fallback()
        }
    }
}

fn fetch_live_games<C: ScoreboardClient + ?Sized>(
    client: &C,
) -> Result<Vec<LiveGame>, NetworkFailure> {
    let body = client.fetch_scoreboard()?;
    let games = parse_scoreboard_json(&body)?;
    if games.is_empty() {
        return Err(NetworkFailure::Empty);
    }
    Ok(games)
}

fn bundled<'a, T>(name: &'static str, data: Option<&'a T>) -> Result<&'a T, DataMissingError> {
    data.ok_or(DataMissingError { dataset: name })
}

fn predict(game: &Game, teams: &[Team], confidence: u8) -> Prediction {
    let pct = |name: &str| {
        teams
            .iter()
            .find(|t| t.name == name)
            .map(Team::win_pct)
            .unwrap_or(0.0)
    };
    let winner = if pct(&game.away_team) > pct(&game.home_team) {
        &game.away_team
    } else {
        &game.home_team
    };
    Prediction {
        game_id: game.id.clone(),
        game_type: game.game_type.clone(),
        date: game.date.clone(),
        home_team: game.home_team.clone(),
        away_team: game.away_team.clone(),
        predicted_winner: winner.clone(),
        confidence,
    }
}

/// Runs loads off the UI thread, reporting each result back as a `Delta`.
///
/// Bundled views are answered by the command thread as soon as they arrive.
/// Dashboard loads go to a separate scoreboard thread so a slow request never
/// holds up other views.
pub fn spawn_provider<C>(
    provider: DataProvider<C>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) where
    C: ScoreboardClient + Send + 'static,
{
    let DataProvider {
        mut bundled,
        client,
    } = provider;
    let (net_tx, net_rx) = mpsc::channel();
    spawn_scoreboard_worker(client, tx.clone(), net_rx);

    thread::spawn(move || {
        let missing = bundled.datasets().missing();
        if !missing.is_empty() {
            let _ = tx.send(Delta::Log(format!(
                "[WARN] Bundled datasets missing: {}",
                missing.join(", ")
            )));
        }

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::Load {
                    view: ViewName::Dashboard,
                    generation,
                } => {
                    if net_tx.send(generation).is_err() {
                        break;
                    }
                }
                ProviderCommand::Load { view, generation } => {
                    let result = bundled.load(view);
                    if !send_loaded(&tx, view, generation, result) {
                        break;
                    }
                }
            }
        }
    });
}

fn spawn_scoreboard_worker<C>(client: C, tx: Sender<Delta>, rx: Receiver<u64>)
where
    C: ScoreboardClient + Send + 'static,
{
    thread::spawn(move || {
        while let Ok(mut generation) = rx.recv() {
            // Requests queued behind a slow fetch collapse into the newest one.
            while let Ok(newer) = rx.try_recv() {
                generation = newer;
            }
            let result = load_scoreboard(&client);
            if !send_loaded(&tx, ViewName::Dashboard, generation, result) {
                break;
            }
        }
    });
}

fn send_loaded(tx: &Sender<Delta>, view: ViewName, generation: u64, result: FetchResult) -> bool {
    if result.status() == FetchStatus::Success {
        let _ = tx.send(Delta::Log(format!(
            "[INFO] {} loaded ({} records)",
            view_label(view),
            result.payload().len()
        )));
    }
    tx.send(Delta::ViewLoaded {
        view,
        generation,
        result,
    })
    .is_ok()
}
