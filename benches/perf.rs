use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use gridiron_terminal::datasets::Datasets;
use gridiron_terminal::filter::{FilterState, filter};
use gridiron_terminal::provider::DataProvider;
use gridiron_terminal::render::project;
use gridiron_terminal::scoreboard::{OfflineClient, parse_scoreboard_json};
use gridiron_terminal::state::{FetchResult, Team, ViewName};

fn many_teams(copies: usize) -> Vec<Team> {
    let teams = Datasets::bundled().teams.unwrap_or_default();
    let mut out = Vec::with_capacity(teams.len() * copies);
    for i in 0..copies {
        for team in &teams {
            let mut team = team.clone();
            team.id += (i * 100) as u32;
            out.push(team);
        }
    }
    out
}

fn bench_datasets_load(c: &mut Criterion) {
    c.bench_function("datasets_bundled", |b| {
        b.iter(|| {
            let data = Datasets::bundled();
            black_box(data.missing().len());
        })
    });
}

fn bench_scoreboard_parse(c: &mut Criterion) {
    c.bench_function("scoreboard_parse", |b| {
        b.iter(|| {
            let games = parse_scoreboard_json(black_box(SCOREBOARD_JSON)).unwrap();
            black_box(games.len());
        })
    });
}

fn bench_filter_teams(c: &mut Criterion) {
    let teams = many_teams(200);
    c.bench_function("filter_teams_conference", |b| {
        b.iter(|| {
            let afc = filter(black_box(&teams), "conference", "AFC");
            black_box(afc.len());
        })
    });
}

fn bench_project_views(c: &mut Criterion) {
    let mut provider = DataProvider::new(Datasets::bundled(), OfflineClient).with_seed(1);
    let results: Vec<(ViewName, FetchResult)> = ViewName::ALL
        .into_iter()
        .map(|view| (view, provider.load(view)))
        .collect();
    let filters = FilterState::new().with("conference", "NFC");

    c.bench_function("project_all_views", |b| {
        b.iter(|| {
            for (view, result) in &results {
                let model = project(*view, black_box(result), &filters);
                black_box(model.sections.len());
            }
        })
    });
}

criterion_group!(
    perf,
    bench_datasets_load,
    bench_scoreboard_parse,
    bench_filter_teams,
    bench_project_views
);
criterion_main!(perf);

static SCOREBOARD_JSON: &str = include_str!("../tests/fixtures/scoreboard.json");
