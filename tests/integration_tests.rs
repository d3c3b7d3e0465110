use covid_map::config::{ColorMap, Sources};
use covid_map::error::PipelineError;
use covid_map::fetch::{BasicClient, fetch_bytes};
use covid_map::figure::{Figure, FigureOptions};
use covid_map::pipeline::{build_sequence, enrich, run};
use covid_map::loader::{parse_cases, parse_continents};
use covid_map::server::{bind, render_page, serve};

const CASES: &[u8] = include_bytes!("fixtures/cases_sample.csv");
const CONTINENTS: &[u8] = include_bytes!("fixtures/continents_sample.csv");

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn test_full_pipeline() {
    let cases = parse_cases(CASES, "cases_sample.csv").expect("Failed to parse cases");
    let continents =
        parse_continents(CONTINENTS, "continents_sample.csv").expect("Failed to parse continents");
    let input_rows = cases.len();

    let records = enrich(cases, continents);
    let world_days = records.iter().filter(|r| r.record.is_world()).count();
    assert_eq!(records.len(), input_rows + world_days);

    // Lemuria appears twice in the lookup; the first row (Asia) wins.
    assert!(records
        .iter()
        .filter(|r| r.record.entity == "Lemuria")
        .all(|r| r.continent.as_deref() == Some("Asia")));

    let world_jan_2 = records
        .iter()
        .find(|r| r.record.is_world() && r.record.date.to_string() == "2020-01-02")
        .unwrap();
    assert_eq!(world_jan_2.record.daily_cases, 2 + 20 + 7);

    let sequence = build_sequence(&records, &ColorMap::default());
    let labels: Vec<&str> = sequence.frames.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(labels, vec!["01 Jan", "02 Jan", "03 Jan"]);

    let last = sequence.frames.last().unwrap();
    let continents: Vec<&str> = last.layers.iter().map(|l| l.continent.as_str()).collect();
    assert_eq!(continents, vec!["Europe", "Oceania"]);
    assert_eq!(last.layers[0].text, vec!["Atlantis: Total Cases: 8"]);
    assert_eq!(last.layers[1].sizes, vec![3.0]);
    assert_eq!(sequence.initial, last.layers);
}

#[tokio::test]
async fn test_run_from_local_files() {
    let sources = Sources {
        cases: fixture_path("cases_sample.csv"),
        continents: fixture_path("continents_sample.csv"),
    };

    let dashboard = run(&BasicClient::new(), &sources, &ColorMap::default())
        .await
        .expect("pipeline should succeed on fixtures");

    assert_eq!(dashboard.sequence.frames.len(), 3);
    assert_eq!(dashboard.sequence.steps.len(), 3);
}

#[tokio::test]
async fn test_run_missing_source_fails() {
    let sources = Sources {
        cases: fixture_path("does_not_exist.csv"),
        continents: fixture_path("continents_sample.csv"),
    };

    let err = run(&BasicClient::new(), &sources, &ColorMap::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::DataUnavailable { .. }));
}

#[tokio::test]
async fn test_run_wrong_schema_fails() {
    let sources = Sources {
        cases: fixture_path("continents_sample.csv"),
        continents: fixture_path("continents_sample.csv"),
    };

    let err = run(&BasicClient::new(), &sources, &ColorMap::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::SchemaMismatch { .. }));
}

#[tokio::test]
async fn test_serves_single_page() {
    let cases = parse_cases(CASES, "cases_sample.csv").unwrap();
    let continents = parse_continents(CONTINENTS, "continents_sample.csv").unwrap();
    let sequence = build_sequence(&enrich(cases, continents), &ColorMap::default());
    let figure = Figure::from_sequence(&sequence, &FigureOptions::default());
    let page = render_page(&figure, "COVID-19 Total Cases").unwrap();

    let listener = bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, page));

    let resp = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert!(resp.status().is_success());
    let body = resp.text().await.unwrap();
    assert!(body.contains("scattergeo"));
    assert!(body.contains("\"03 Jan\""));

    let missing = reqwest::get(format!("http://{addr}/frames.json")).await.unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

    // A 404 from a live server surfaces as DataUnavailable in the loader.
    let err = fetch_bytes(&BasicClient::new(), &format!("http://{addr}/nope.csv"))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::DataUnavailable { .. }));
}
