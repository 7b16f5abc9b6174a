use std::time::Duration;

use anyhow::Context;
use reqwest::header::ACCEPT;
use serde_json::Value;

use crate::error::NetworkFailure;
use crate::http_client::http_client;
use crate::state::{Competitor, GameStatus, LiveGame};

pub const DEFAULT_SCOREBOARD_URL: &str =
    "https://site.api.espn.com/apis/site/v2/sports/football/nfl/scoreboard";

/// The one network dependency: a read-only scoreboard endpoint.
pub trait ScoreboardClient {
    /// Raw response body of a single GET.
    fn fetch_scoreboard(&self) -> Result<String, NetworkFailure>;
}

impl<T: ScoreboardClient + ?Sized> ScoreboardClient for &T {
    fn fetch_scoreboard(&self) -> Result<String, NetworkFailure> {
        (**self).fetch_scoreboard()
    }
}

#[derive(Debug, Clone)]
pub struct HttpScoreboardClient {
    url: String,
    timeout: Duration,
}

impl HttpScoreboardClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

impl ScoreboardClient for HttpScoreboardClient {
    fn fetch_scoreboard(&self) -> Result<String, NetworkFailure> {
        let client = http_client(self.timeout)
            .map_err(|err| NetworkFailure::Unavailable(format!("{err:#}")))?;
        let resp = client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .context("scoreboard request failed")?;
        let status = resp.status();
        if !status.is_success() {
            return Err(NetworkFailure::Status(status.as_u16()));
        }
        let body = resp.text().context("failed reading scoreboard body")?;
        Ok(body)
    }
}

/// Client used when the network is switched off by configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineClient;

impl ScoreboardClient for OfflineClient {
    fn fetch_scoreboard(&self) -> Result<String, NetworkFailure> {
        Err(NetworkFailure::Unavailable("offline mode".to_string()))
    }
}

/// Parses a scoreboard body into games. Empty bodies and `null` yield no
/// games; anything that is not a JSON object with an `events` array is
/// malformed. Events missing a home/away pair are skipped.
pub fn parse_scoreboard_json(raw: &str) -> Result<Vec<LiveGame>, NetworkFailure> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }

    let root: Value = serde_json::from_str(trimmed)
        .map_err(|err| NetworkFailure::Malformed(format!("invalid scoreboard json: {err}")))?;
    let Some(events) = root.get("events") else {
        return Err(NetworkFailure::Malformed("missing events".to_string()));
    };
    let Some(events) = events.as_array() else {
        return Err(NetworkFailure::Malformed("events is not a list".to_string()));
    };

    Ok(events.iter().filter_map(parse_event).collect())
}

fn parse_event(event: &Value) -> Option<LiveGame> {
    let competition = event
        .get("competitions")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())?;
    let competitors = competition.get("competitors").and_then(|c| c.as_array())?;

    let mut home = None;
    let mut away = None;
    for entry in competitors {
        match entry.get("homeAway").and_then(|v| v.as_str()) {
            Some("home") => home = parse_competitor(entry),
            Some("away") => away = parse_competitor(entry),
            _ => {}
        }
    }
    let (home, away) = (home?, away?);

    let id = pick_string(event, &["id"]).unwrap_or_default();
    let name = pick_string(event, &["name", "shortName"])
        .unwrap_or_else(|| format!("{} at {}", away.team, home.team));
    let date = pick_string(event, &["date"])
        .or_else(|| pick_string(competition, &["date"]))
        .unwrap_or_default();
    let venue = competition
        .get("venue")
        .or_else(|| event.get("venue"))
        .and_then(|v| pick_string(v, &["fullName", "name"]))
        .unwrap_or_default();

    let status_type = event
        .get("status")
        .or_else(|| competition.get("status"))
        .and_then(|s| s.get("type"))
        .unwrap_or(&Value::Null);
    let status = GameStatus {
        state: pick_string(status_type, &["state"]).unwrap_or_else(|| "pre".to_string()),
        detail: pick_string(status_type, &["shortDetail", "detail", "description"])
            .unwrap_or_default(),
        completed: status_type
            .get("completed")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
    };

    let broadcast =
        parse_broadcast(competition).or_else(|| competitors.iter().find_map(parse_broadcast));

    Some(LiveGame {
        id,
        name,
        date,
        venue,
        status,
        home,
        away,
        broadcast,
    })
}

fn parse_competitor(entry: &Value) -> Option<Competitor> {
    let team = entry.get("team")?;
    let name = pick_string(team, &["displayName", "name", "location"])?;
    let abbreviation = pick_string(team, &["abbreviation"]).unwrap_or_else(|| {
        name.chars()
            .filter(|c| c.is_ascii_alphabetic())
            .take(3)
            .collect::<String>()
            .to_uppercase()
    });
    let score = match entry.get("score") {
        Some(Value::String(s)) => s.trim().parse::<u32>().unwrap_or(0),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0),
        _ => 0,
    };
    let record = entry
        .get("records")
        .and_then(|r| r.as_array())
        .and_then(|r| r.first())
        .and_then(|r| pick_string(r, &["summary"]));

    Some(Competitor {
        team: name,
        abbreviation,
        score,
        record,
    })
}

fn parse_broadcast(value: &Value) -> Option<String> {
    if let Some(list) = value.get("broadcasts").and_then(|b| b.as_array()) {
        for item in list {
            if let Some(name) = item
                .get("names")
                .and_then(|n| n.as_array())
                .and_then(|n| n.first())
                .and_then(|n| n.as_str())
            {
                return Some(name.to_string());
            }
            if let Some(name) = pick_string(item, &["name", "shortName"]) {
                return Some(name);
            }
        }
    }
    value
        .get("broadcast")
        .and_then(|b| b.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_string())
}

fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(s) = value.get(*key).and_then(|v| v.as_str()) {
            let s = s.trim();
            if !s.is_empty() {
                return Some(s.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_blank_bodies_are_empty() {
        assert!(parse_scoreboard_json("null").expect("null parses").is_empty());
        assert!(parse_scoreboard_json("  ").expect("blank parses").is_empty());
    }

    #[test]
    fn non_object_bodies_are_malformed() {
        assert!(matches!(
            parse_scoreboard_json("<html>down</html>"),
            Err(NetworkFailure::Malformed(_))
        ));
        assert!(matches!(
            parse_scoreboard_json(r#"{"leagues":[]}"#),
            Err(NetworkFailure::Malformed(_))
        ));
        assert!(matches!(
            parse_scoreboard_json(r#"{"events":{}}"#),
            Err(NetworkFailure::Malformed(_))
        ));
    }

    #[test]
    fn numeric_scores_and_missing_abbreviations() {
        let raw = r#"{"events":[{"id":"9","competitions":[{"competitors":[
            {"homeAway":"home","score":17,"team":{"displayName":"Green Bay Packers"}},
            {"homeAway":"away","score":"10","team":{"displayName":"Chicago Bears","abbreviation":"CHI"}}
        ]}]}]}"#;
        let games = parse_scoreboard_json(raw).expect("parses");
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].home.score, 17);
        assert_eq!(games[0].home.abbreviation, "GRE");
        assert_eq!(games[0].away.score, 10);
        assert_eq!(games[0].name, "Chicago Bears at Green Bay Packers");
        assert_eq!(games[0].status.state, "pre");
    }

    #[test]
    fn out_of_range_scores_read_as_zero() {
        let raw = r#"{"events":[{"id":"9","competitions":[{"competitors":[
            {"homeAway":"home","score":4294967300,"team":{"displayName":"Home","abbreviation":"HOM"}},
            {"homeAway":"away","score":4294967295,"team":{"displayName":"Away","abbreviation":"AWY"}}
        ]}]}]}"#;
        let games = parse_scoreboard_json(raw).expect("parses");
        assert_eq!(games[0].home.score, 0);
        assert_eq!(games[0].away.score, u32::MAX);
    }

    #[test]
    fn events_without_both_sides_are_skipped() {
        let raw = r#"{"events":[{"id":"1","competitions":[{"competitors":[
            {"homeAway":"home","score":"3","team":{"displayName":"Home"}}
        ]}]}]}"#;
        assert!(parse_scoreboard_json(raw).expect("parses").is_empty());
    }

    #[test]
    fn offline_client_always_fails() {
        assert!(matches!(
            OfflineClient.fetch_scoreboard(),
            Err(NetworkFailure::Unavailable(_))
        ));
    }
}
