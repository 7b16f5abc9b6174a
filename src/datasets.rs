use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::state::{Game, Player, Statistics, Team};

const TEAMS_JSON: &str = include_str!("../data/teams.json");
const PLAYERS_JSON: &str = include_str!("../data/players.json");
const SCHEDULE_JSON: &str = include_str!("../data/schedule.json");
const STATISTICS_JSON: &str = include_str!("../data/statistics.json");

/// Bundled datasets held in process state. A `None` slot means the dataset
/// never loaded; views backed by it report `unavailable`.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub teams: Option<Vec<Team>>,
    pub players: Option<Vec<Player>>,
    pub schedule: Option<Vec<Game>>,
    pub statistics: Option<Statistics>,
}

impl Datasets {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses the datasets compiled into the binary. A dataset that fails to
    /// parse is logged and left out.
    pub fn bundled() -> Self {
        Self {
            teams: load_or_warn("teams", TEAMS_JSON),
            players: load_or_warn("players", PLAYERS_JSON),
            schedule: load_or_warn("schedule", SCHEDULE_JSON),
            statistics: load_or_warn("statistics", STATISTICS_JSON),
        }
    }

    pub fn missing(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.teams.is_none() {
            out.push("teams");
        }
        if self.players.is_none() {
            out.push("players");
        }
        if self.schedule.is_none() {
            out.push("schedule");
        }
        if self.statistics.is_none() {
            out.push("statistics");
        }
        out
    }
}

pub fn parse_dataset<T: DeserializeOwned>(name: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw.trim()).with_context(|| format!("invalid {name} dataset"))
}

fn load_or_warn<T: DeserializeOwned>(name: &'static str, raw: &str) -> Option<T> {
    match parse_dataset(name, raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!("bundled dataset skipped: {err:#}");
            None
        }
    }
}
