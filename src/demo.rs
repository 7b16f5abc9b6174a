use crate::state::{Competitor, GameStatus, LiveGame};

pub const DEMO_GAME_COUNT: usize = 4;

/// Fixed scoreboard shown when the live feed fails or comes back empty.
pub fn demo_games() -> Vec<LiveGame> {
    let games = vec![
        demo_game(
            "demo-1",
            ("Kansas City Chiefs", "KC", 24, "15-2"),
            ("Philadelphia Eagles", "PHI", 21, "14-3"),
            ("in", "Q4 - 2:14", false),
            "Caesars Superdome",
            "2025-02-09T23:30Z",
            Some("FOX"),
        ),
        demo_game(
            "demo-2",
            ("Buffalo Bills", "BUF", 31, "13-4"),
            ("Baltimore Ravens", "BAL", 27, "12-5"),
            ("post", "Final", true),
            "Highmark Stadium",
            "2025-01-19T23:30Z",
            Some("CBS"),
        ),
        demo_game(
            "demo-3",
            ("Detroit Lions", "DET", 14, "15-2"),
            ("Washington Commanders", "WSH", 17, "12-5"),
            ("in", "Halftime", false),
            "Ford Field",
            "2025-01-19T01:00Z",
            Some("FOX"),
        ),
        demo_game(
            "demo-4",
            ("Houston Texans", "HOU", 0, "10-7"),
            ("Los Angeles Chargers", "LAC", 0, "11-6"),
            ("pre", "Sat, January 11th at 4:30 PM EST", false),
            "NRG Stadium",
            "2025-01-11T21:30Z",
            Some("CBS"),
        ),
    ];
    debug_assert_eq!(games.len(), DEMO_GAME_COUNT);
    games
}

fn demo_game(
    id: &str,
    home: (&str, &str, u32, &str),
    away: (&str, &str, u32, &str),
    status: (&str, &str, bool),
    venue: &str,
    date: &str,
    broadcast: Option<&str>,
) -> LiveGame {
    LiveGame {
        id: id.to_string(),
        name: format!("{} at {}", away.0, home.0),
        date: date.to_string(),
        venue: venue.to_string(),
        status: GameStatus {
            state: status.0.to_string(),
            detail: status.1.to_string(),
            completed: status.2,
        },
        home: competitor(home),
        away: competitor(away),
        broadcast: broadcast.map(str::to_string),
    }
}

fn competitor((team, abbreviation, score, record): (&str, &str, u32, &str)) -> Competitor {
    Competitor {
        team: team.to_string(),
        abbreviation: abbreviation.to_string(),
        score,
        record: Some(record.to_string()),
    }
}
