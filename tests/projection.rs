use gridiron_terminal::datasets::Datasets;
use gridiron_terminal::demo::DEMO_GAME_COUNT;
use gridiron_terminal::filter::{FilterState, filter};
use gridiron_terminal::provider::DataProvider;
use gridiron_terminal::render::{NoticeLevel, SectionBody, loading_model, project};
use gridiron_terminal::scoreboard::OfflineClient;
use gridiron_terminal::state::{DataSource, FetchResult, Payload, ViewName};

fn load(view: ViewName) -> FetchResult {
    DataProvider::new(Datasets::bundled(), OfflineClient)
        .with_seed(3)
        .load(view)
}

fn card_titles(body: &SectionBody) -> Vec<String> {
    match body {
        SectionBody::Cards(cards) => cards.iter().map(|c| c.title.clone()).collect(),
        other => panic!("expected cards, got {other:?}"),
    }
}

#[test]
fn projection_is_deterministic() {
    let filters = FilterState::new().with("conference", "NFC");
    for view in ViewName::ALL {
        let result = load(view);
        assert_eq!(
            project(view, &result, &filters),
            project(view, &result, &filters),
            "{view:?}"
        );
    }
}

#[test]
fn conference_filter_keeps_bundled_order() {
    let teams = Datasets::bundled().teams.expect("teams bundled");
    let afc: Vec<&str> = filter(&teams, "conference", "AFC")
        .into_iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(
        afc,
        vec!["Chiefs", "Bills", "Ravens", "Texans", "Steelers", "Chargers", "Broncos"]
    );
    assert_eq!(filter(&teams, "conference", "").len(), teams.len());
    assert!(filter(&teams, "conference", "afc").is_empty());
    assert!(filter(&teams, "nickname", "AFC").is_empty());
}

#[test]
fn filtered_teams_view_counts_matches() {
    let result = load(ViewName::Teams);
    let model = project(
        ViewName::Teams,
        &result,
        &FilterState::new().with("conference", "NFC").with("division", "North"),
    );
    assert_eq!(model.filters.len(), 2);
    assert_eq!(model.sections.len(), 1);
    assert_eq!(model.sections[0].title, "Teams (3)");
    assert_eq!(
        card_titles(&model.sections[0].body),
        vec!["Detroit Lions", "Minnesota Vikings", "Green Bay Packers"]
    );
}

#[test]
fn filter_with_no_matches_shows_empty_message() {
    let result = load(ViewName::Players);
    let model = project(ViewName::Players, &result, &FilterState::new().with("position", "P"));
    assert_eq!(
        model.sections[0].body,
        SectionBody::Empty("No players match the current filters".to_string())
    );
}

#[test]
fn demo_fallback_is_flagged() {
    let result = FetchResult::fallback();
    let model = project(ViewName::Dashboard, &result, &FilterState::new());
    let notice = model.notice.expect("fallback carries a notice");
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert_eq!(model.source, Some(DataSource::Demo));
    assert_eq!(model.sections[0].title, "Scoreboard (demo)");
    let SectionBody::Cards(cards) = &model.sections[0].body else {
        panic!("expected cards");
    };
    assert_eq!(cards.len(), DEMO_GAME_COUNT);
    assert!(cards.iter().all(|c| c.badge.as_deref() == Some("DEMO")));
}

#[test]
fn unavailable_view_shows_error_and_no_records() {
    let result = FetchResult::unavailable();
    let model = project(ViewName::Statistics, &result, &FilterState::new());
    assert_eq!(model.source, None);
    assert_eq!(model.notice.map(|n| n.level), Some(NoticeLevel::Error));
    assert_eq!(model.sections.len(), 1);
    assert!(matches!(model.sections[0].body, SectionBody::Empty(_)));
}

#[test]
fn schedule_groups_by_round() {
    let result = load(ViewName::LiveGames);
    let model = project(ViewName::LiveGames, &result, &FilterState::new());
    let rounds: Vec<&str> = model.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(rounds, vec!["Wild Card", "Divisional", "Conference", "Super Bowl"]);
}

#[test]
fn statistics_lists_leaders_and_seeds() {
    let result = load(ViewName::Statistics);
    let model = project(ViewName::Statistics, &result, &FilterState::new());
    assert!(model.sections.iter().any(|s| s.title == "AFC Playoff Picture"));
    let nfc = model
        .sections
        .iter()
        .find(|s| s.title == "NFC Playoff Picture")
        .expect("nfc seeds");
    let SectionBody::List(items) = &nfc.body else {
        panic!("expected list");
    };
    let seventh = items.iter().find(|i| i.rank == Some(7)).expect("seven seeds");
    assert!(!seventh.highlight);
    assert_eq!(seventh.detail, "in the hunt");
}

#[test]
fn predictions_pick_one_of_the_two_teams() {
    let result = load(ViewName::Predictions);
    let Payload::Predictions(preds) = result.payload() else {
        panic!("expected predictions");
    };
    for pred in preds {
        assert!(
            pred.predicted_winner == pred.home_team || pred.predicted_winner == pred.away_team,
            "{pred:?}"
        );
    }
    let model = project(ViewName::Predictions, &result, &FilterState::new());
    assert_eq!(card_titles(&model.sections[0].body).len(), preds.len());
}

#[test]
fn loading_model_has_no_records() {
    let model = loading_model(ViewName::Teams);
    assert!(model.sections.is_empty());
    assert_eq!(model.notice.map(|n| n.level), Some(NoticeLevel::Info));
}
