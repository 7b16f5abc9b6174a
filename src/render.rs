//! Projection from a view's fetch result to a markup-free display model.
//!
//! `project` is pure: the same inputs always give the same model. Terminal
//! drawing lives in the binary and only consumes `DisplayModel`.

use chrono::NaiveDateTime;

use crate::filter::FilterState;
use crate::state::{
    DataSource, FetchResult, FetchStatus, Game, LiveGame, Payload, Player, Prediction,
    SeasonStats, Statistics, Team, ViewName, view_label,
};

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayModel {
    pub view: ViewName,
    pub title: String,
    pub source: Option<DataSource>,
    pub notice: Option<Notice>,
    pub filters: Vec<FilterChip>,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterChip {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    Cards(Vec<Card>),
    List(Vec<ListItem>),
    Empty(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: String,
    pub subtitle: String,
    pub badge: Option<String>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub rank: Option<u32>,
    pub label: String,
    pub detail: String,
    pub value: String,
    pub highlight: bool,
}

impl Card {
    fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            badge: None,
            fields: Vec::new(),
        }
    }

    fn badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    fn field(mut self, label: &str, value: impl Into<String>) -> Self {
        self.fields.push(Field {
            label: label.to_string(),
            value: value.into(),
        });
        self
    }
}

pub fn project(view: ViewName, result: &FetchResult, filters: &FilterState) -> DisplayModel {
    let mut model = DisplayModel {
        view,
        title: view_label(view).to_string(),
        source: Some(result.source()),
        notice: None,
        filters: filters
            .criteria()
            .map(|(field, value)| FilterChip {
                field: field.to_string(),
                value: value.to_string(),
            })
            .collect(),
        sections: Vec::new(),
    };

    match result.status() {
        FetchStatus::Success => {}
        FetchStatus::Fallback => {
            model.notice = Some(Notice {
                level: NoticeLevel::Warning,
                message: "Live scoreboard unavailable. Showing demo games.".to_string(),
            });
        }
        FetchStatus::Unavailable => {
            model.source = None;
            model.notice = Some(Notice {
                level: NoticeLevel::Error,
                message: format!("{} data could not be loaded.", view_label(view)),
            });
            model.sections.push(Section {
                title: view_label(view).to_string(),
                body: SectionBody::Empty("No data available".to_string()),
            });
            return model;
        }
    }

    model.sections = match (view, result.payload()) {
        (ViewName::Dashboard, Payload::Scoreboard(games)) => {
            scoreboard_sections(&filters.apply(games), result.status())
        }
        (ViewName::Teams, Payload::Teams(teams)) => team_sections(&filters.apply(teams)),
        (ViewName::Players, Payload::Players(players)) => {
            player_sections(&filters.apply(players))
        }
        (ViewName::LiveGames, Payload::Schedule(games)) => {
            schedule_sections(&filters.apply(games))
        }
        (ViewName::Statistics, Payload::Statistics(stats)) => statistics_sections(stats),
        (ViewName::Predictions, Payload::Predictions(preds)) => {
            prediction_sections(&filters.apply(preds))
        }
        _ => vec![Section {
            title: view_label(view).to_string(),
            body: SectionBody::Empty("No data available".to_string()),
        }],
    };
    model
}

/// Projection for a view whose data is still in flight.
pub fn loading_model(view: ViewName) -> DisplayModel {
    DisplayModel {
        view,
        title: view_label(view).to_string(),
        source: None,
        notice: Some(Notice {
            level: NoticeLevel::Info,
            message: "Loading...".to_string(),
        }),
        filters: Vec::new(),
        sections: Vec::new(),
    }
}

fn empty_or(title: String, body: SectionBody, what: &str) -> Section {
    let is_empty = match &body {
        SectionBody::Cards(cards) => cards.is_empty(),
        SectionBody::List(items) => items.is_empty(),
        SectionBody::Empty(_) => false,
    };
    if is_empty {
        return Section {
            title,
            body: SectionBody::Empty(format!("No {what} match the current filters")),
        };
    }
    Section { title, body }
}

fn scoreboard_sections(games: &[&LiveGame], status: FetchStatus) -> Vec<Section> {
    let demo = status == FetchStatus::Fallback;
    let cards = games
        .iter()
        .map(|game| {
            let badge = if demo {
                "DEMO"
            } else {
                match game.status.state.as_str() {
                    "in" => "LIVE",
                    "post" => "FINAL",
                    _ => "UPCOMING",
                }
            };
            let mut card = Card::new(
                format!("{} @ {}", game.away.abbreviation, game.home.abbreviation),
                game.status.detail.clone(),
            )
            .badge(badge)
            .field(
                "Score",
                format!(
                    "{} {} - {} {}",
                    game.away.team, game.away.score, game.home.score, game.home.team
                ),
            )
            .field("Venue", or_dash(&game.venue))
            .field("Kickoff", format_kickoff(&game.date));
            if let Some(broadcast) = &game.broadcast {
                card = card.field("Broadcast", broadcast.clone());
            }
            if let (Some(away), Some(home)) = (&game.away.record, &game.home.record) {
                card = card.field("Records", format!("{away} / {home}"));
            }
            card
        })
        .collect();
    let title = if demo {
        "Scoreboard (demo)".to_string()
    } else {
        "Scoreboard".to_string()
    };
    vec![empty_or(title, SectionBody::Cards(cards), "games")]
}

fn team_sections(teams: &[&Team]) -> Vec<Section> {
    let cards = teams
        .iter()
        .map(|team| {
            Card::new(
                team.full_name(),
                format!("{} {}", team.conference, team.division),
            )
            .field(
                "Record",
                format!("{}-{} ({:.3})", team.wins, team.losses, team.win_pct()),
            )
            .field("Coach", team.coach.clone())
            .field("Stadium", team.stadium.clone())
            .field("Founded", team.founded.to_string())
            .field("Colors", or_dash(&team.colors.join(", ")))
        })
        .collect();
    vec![empty_or(
        format!("Teams ({})", teams.len()),
        SectionBody::Cards(cards),
        "teams",
    )]
}

fn player_sections(players: &[&Player]) -> Vec<Section> {
    let cards = players
        .iter()
        .map(|player| {
            let card = Card::new(
                format!("#{} {}", player.jersey_number, player.name),
                format!("{} | {}", player.position, player.team),
            )
            .badge(player.season_stats.archetype().to_uppercase())
            .field("Age", player.age.to_string())
            .field("Height", player.height.clone())
            .field("Weight", format!("{} lbs", player.weight))
            .field("College", player.college.clone())
            .field("Experience", format!("{} yrs", player.experience));
            season_fields(card, &player.season_stats)
        })
        .collect();
    vec![empty_or(
        format!("Players ({})", players.len()),
        SectionBody::Cards(cards),
        "players",
    )]
}

fn season_fields(card: Card, stats: &SeasonStats) -> Card {
    match stats {
        SeasonStats::Passing(s) => card
            .field("Pass Yds", s.yards.to_string())
            .field("TD/INT", format!("{}/{}", s.touchdowns, s.interceptions))
            .field("Comp%", format!("{:.1}", s.completion_pct))
            .field("Rating", format!("{:.1}", s.rating)),
        SeasonStats::Rushing(s) => card
            .field("Rush Yds", s.yards.to_string())
            .field("Att", s.attempts.to_string())
            .field("YPC", format!("{:.1}", s.yards_per_carry))
            .field("TD", s.touchdowns.to_string()),
        SeasonStats::Receiving(s) => card
            .field("Rec", format!("{}/{}", s.receptions, s.targets))
            .field("Rec Yds", s.yards.to_string())
            .field("TD", s.touchdowns.to_string()),
        SeasonStats::Defense(s) => card
            .field("Tackles", s.tackles.to_string())
            .field("Sacks", format!("{:.1}", s.sacks))
            .field("INT", s.interceptions.to_string())
            .field("FF", s.forced_fumbles.to_string()),
        SeasonStats::Kicking(s) => card
            .field("FG", format!("{}/{}", s.field_goals_made, s.field_goals_attempted))
            .field("Long", s.long.to_string())
            .field("XP", s.extra_points.to_string()),
    }
}

/// One section per game type, in schedule order.
fn schedule_sections(games: &[&Game]) -> Vec<Section> {
    if games.is_empty() {
        return vec![empty_or(
            "Schedule".to_string(),
            SectionBody::Cards(Vec::new()),
            "games",
        )];
    }
    let mut groups: Vec<(&str, Vec<Card>)> = Vec::new();
    for game in games {
        let card = Card::new(
            format!("{} @ {}", game.away_team, game.home_team),
            format!("{} {}", game.date, game.time),
        )
        .field("Stadium", game.stadium.clone())
        .field("City", game.city.clone());
        match groups.iter_mut().find(|(kind, _)| *kind == game.game_type) {
            Some((_, cards)) => cards.push(card),
            None => groups.push((game.game_type.as_str(), vec![card])),
        }
    }
    groups
        .into_iter()
        .map(|(kind, cards)| Section {
            title: kind.to_string(),
            body: SectionBody::Cards(cards),
        })
        .collect()
}

fn statistics_sections(stats: &Statistics) -> Vec<Section> {
    let mut sections = Vec::new();
    for category in &stats.leaders {
        let items = category
            .leaders
            .iter()
            .enumerate()
            .map(|(idx, leader)| ListItem {
                rank: Some(idx as u32 + 1),
                label: leader.player.clone(),
                detail: leader.team.clone(),
                value: format!("{} {}", format_stat(leader.value), category.unit),
                highlight: idx == 0,
            })
            .collect();
        sections.push(Section {
            title: format!("{} Leaders", category.category),
            body: SectionBody::List(items),
        });
    }
    for conference in &stats.playoff_picture {
        let items = conference
            .seeds
            .iter()
            .map(|seed| ListItem {
                rank: Some(u32::from(seed.seed)),
                label: seed.team.clone(),
                detail: if seed.clinched {
                    "clinched".to_string()
                } else {
                    "in the hunt".to_string()
                },
                value: seed.record.clone(),
                highlight: seed.clinched,
            })
            .collect();
        sections.push(Section {
            title: format!("{} Playoff Picture", conference.conference),
            body: SectionBody::List(items),
        });
    }
    if sections.is_empty() {
        sections.push(Section {
            title: "Statistics".to_string(),
            body: SectionBody::Empty("No statistics available".to_string()),
        });
    }
    sections
}

fn prediction_sections(preds: &[&Prediction]) -> Vec<Section> {
    let cards = preds
        .iter()
        .map(|pred| {
            Card::new(
                format!("{} @ {}", pred.away_team, pred.home_team),
                format!("{} | {}", pred.game_type, pred.date),
            )
            .badge(format!("{}%", pred.confidence))
            .field("Pick", pred.predicted_winner.clone())
            .field("Confidence", confidence_label(pred.confidence))
        })
        .collect();
    vec![empty_or(
        "Predictions".to_string(),
        SectionBody::Cards(cards),
        "predictions",
    )]
}

fn confidence_label(confidence: u8) -> String {
    let tier = match confidence {
        80.. => "high",
        65..=79 => "medium",
        _ => "low",
    };
    format!("{confidence}% ({tier})")
}

fn format_stat(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

fn format_kickoff(raw: &str) -> String {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return "TBD".to_string();
    }
    match parse_kickoff(cleaned) {
        Some(dt) => format!("{} UTC", dt.format("%a %d %b %H:%M")),
        None => cleaned.replace('T', " "),
    }
}

fn parse_kickoff(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%MZ",
        "%Y-%m-%dT%H:%M:%SZ",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kickoff_formats() {
        assert_eq!(format_kickoff("2025-02-09T23:30Z"), "Sun 09 Feb 23:30 UTC");
        assert_eq!(format_kickoff(""), "TBD");
        assert_eq!(format_kickoff("soon"), "soon");
    }

    #[test]
    fn confidence_tiers() {
        assert_eq!(confidence_label(91), "91% (high)");
        assert_eq!(confidence_label(70), "70% (medium)");
        assert_eq!(confidence_label(55), "55% (low)");
    }

    #[test]
    fn stat_values_drop_needless_decimals() {
        assert_eq!(format_stat(2005.0), "2005");
        assert_eq!(format_stat(17.5), "17.5");
    }
}
