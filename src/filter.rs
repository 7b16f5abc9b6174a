use std::borrow::Cow;

use crate::state::{Game, LiveGame, Player, Prediction, Team, ViewName};

/// Field lookup by wire name, used by the filter predicate.
pub trait Filterable {
    fn field(&self, name: &str) -> Option<Cow<'_, str>>;
}

/// Keeps records whose `field` equals `value` exactly, in original order.
/// An empty `value` keeps everything.
pub fn filter<'a, T: Filterable>(records: &'a [T], field: &str, value: &str) -> Vec<&'a T> {
    records
        .iter()
        .filter(|record| matches(*record, field, value))
        .collect()
}

fn matches<T: Filterable>(record: &T, field: &str, value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    record.field(field).is_some_and(|v| v == value)
}

pub fn distinct_values<T: Filterable>(records: &[T], field: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for record in records {
        let Some(value) = record.field(field) else {
            continue;
        };
        if value.is_empty() || out.iter().any(|seen| seen.as_str() == value) {
            continue;
        }
        out.push(value.into_owned());
    }
    out
}

/// Fields the navigation surface offers as filters for each view.
pub fn filter_fields(view: ViewName) -> &'static [&'static str] {
    match view {
        ViewName::Dashboard => &["status"],
        ViewName::Teams => &["conference", "division"],
        ViewName::Players => &["position", "team"],
        ViewName::LiveGames => &["gameType"],
        ViewName::Statistics => &[],
        ViewName::Predictions => &["gameType", "predictedWinner"],
    }
}

/// Active field/value criteria, applied one after another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    criteria: Vec<(String, String)>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: &str) -> Self {
        self.set(field, value);
        self
    }

    /// Setting an empty value removes the criterion.
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        let value = value.into();
        self.criteria.retain(|(f, _)| f != field);
        if !value.is_empty() {
            self.criteria.push((field.to_string(), value));
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.criteria
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn clear(&mut self) {
        self.criteria.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn criteria(&self) -> impl Iterator<Item = (&str, &str)> {
        self.criteria.iter().map(|(f, v)| (f.as_str(), v.as_str()))
    }

    pub fn apply<'a, T: Filterable>(&self, records: &'a [T]) -> Vec<&'a T> {
        records
            .iter()
            .filter(|record| self.criteria().all(|(field, value)| matches(*record, field, value)))
            .collect()
    }
}

impl Filterable for Team {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = match name {
            "id" => Cow::Owned(self.id.to_string()),
            "name" => Cow::Borrowed(self.name.as_str()),
            "city" => Cow::Borrowed(self.city.as_str()),
            "conference" => Cow::Borrowed(self.conference.as_str()),
            "division" => Cow::Borrowed(self.division.as_str()),
            "coach" => Cow::Borrowed(self.coach.as_str()),
            "wins" => Cow::Owned(self.wins.to_string()),
            "losses" => Cow::Owned(self.losses.to_string()),
            "stadium" => Cow::Borrowed(self.stadium.as_str()),
            "founded" => Cow::Owned(self.founded.to_string()),
            _ => return None,
        };
        Some(value)
    }
}

impl Filterable for Player {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = match name {
            "id" => Cow::Owned(self.id.to_string()),
            "name" => Cow::Borrowed(self.name.as_str()),
            "position" => Cow::Borrowed(self.position.as_str()),
            "team" => Cow::Borrowed(self.team.as_str()),
            "jerseyNumber" => Cow::Owned(self.jersey_number.to_string()),
            "age" => Cow::Owned(self.age.to_string()),
            "height" => Cow::Borrowed(self.height.as_str()),
            "weight" => Cow::Owned(self.weight.to_string()),
            "college" => Cow::Borrowed(self.college.as_str()),
            "experience" => Cow::Owned(self.experience.to_string()),
            "archetype" => Cow::Borrowed(self.season_stats.archetype()),
            _ => return None,
        };
        Some(value)
    }
}

impl Filterable for Game {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = match name {
            "id" => self.id.as_str(),
            "gameType" => self.game_type.as_str(),
            "date" => self.date.as_str(),
            "time" => self.time.as_str(),
            "homeTeam" => self.home_team.as_str(),
            "awayTeam" => self.away_team.as_str(),
            "stadium" => self.stadium.as_str(),
            "city" => self.city.as_str(),
            _ => return None,
        };
        Some(Cow::Borrowed(value))
    }
}

impl Filterable for LiveGame {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = match name {
            "id" => self.id.as_str(),
            "name" => self.name.as_str(),
            "status" => self.status.state.as_str(),
            "venue" => self.venue.as_str(),
            "homeTeam" => self.home.team.as_str(),
            "awayTeam" => self.away.team.as_str(),
            "broadcast" => self.broadcast.as_deref()?,
            _ => return None,
        };
        Some(Cow::Borrowed(value))
    }
}

impl Filterable for Prediction {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = match name {
            "gameId" => self.game_id.as_str(),
            "gameType" => self.game_type.as_str(),
            "date" => self.date.as_str(),
            "homeTeam" => self.home_team.as_str(),
            "awayTeam" => self.away_team.as_str(),
            "predictedWinner" => self.predicted_winner.as_str(),
            "confidence" => return Some(Cow::Owned(self.confidence.to_string())),
            _ => return None,
        };
        Some(Cow::Borrowed(value))
    }
}
