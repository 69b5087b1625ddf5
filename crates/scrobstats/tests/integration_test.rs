//! End-to-end command tests against a mock backend.

use mockito::{Matcher, Server};
use scrobstats::{App, AppError, Command};
use scrobstats_common::test_utils::create_temp_dir;
use scrobstats_config::Config;
use tempfile::TempDir;

fn config_for(server_url: &str, dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.backend.url = server_url.to_string();
    config.lastfm.url = server_url.to_string();
    config.discogs.url = server_url.to_string();
    config.dashboard.initial_years = vec![2024];
    config.dashboard.default_year = 2024;
    config.storage.path = dir.path().join("storage.json");
    config
}

#[tokio::test]
async fn test_profile_years_become_the_tabs() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/load_user_details")
        .match_query(Matcher::UrlEncoded("user".into(), "rj".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name": "rj", "discoguser": "digger", "years": "[2024,2022,2023]"}"#)
        .create_async()
        .await;

    let dir = create_temp_dir();
    let app = App::new(config_for(&server.url(), &dir)).unwrap();

    let before = app.run(Command::Years).await.unwrap();
    assert_eq!(before, "[2024]");

    let output = app
        .run(Command::Profile { user: "rj".into() })
        .await
        .unwrap();
    let details: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(details["discoguser"], "digger");
    mock.assert_async().await;

    let after = app.run(Command::Years).await.unwrap();
    assert_eq!(after, "[2024,2022,2023]");
}

#[tokio::test]
async fn test_add_year_persists_remotely_and_locally() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/update_user")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("user".into(), "rj".into()),
            Matcher::UrlEncoded("years".into(), "[2024,2023]".into()),
        ]))
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;

    let dir = create_temp_dir();
    let app = App::new(config_for(&server.url(), &dir)).unwrap();

    let output = app
        .run(Command::AddYear { user: "rj".into() })
        .await
        .unwrap();
    assert_eq!(output, "[2024,2023]");
    mock.assert_async().await;

    let reopened = App::new(config_for(&server.url(), &dir)).unwrap();
    assert_eq!(reopened.stored_years().unwrap(), vec![2024, 2023]);
}

#[tokio::test]
async fn test_single_year_dashboard_renders_charts() {
    let mut server = Server::new_async().await;
    let decades = server
        .mock("GET", "/load_decade_statistics")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"[{"_id": "1990s", "count": 12}, {"_id": "1980s", "count": 3}]"#)
        .create_async()
        .await;
    let _origin = server
        .mock("GET", "/load_artist_origin_statistics")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("down")
        .create_async()
        .await;
    let _tags = server
        .mock("GET", "/load_tags_statistics")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"[{"_id": "rock", "count": 7}]"#)
        .create_async()
        .await;
    let general = server
        .mock("GET", "/general_statistics")
        .match_query(Matcher::UrlEncoded("year".into(), "2023".into()))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let dir = create_temp_dir();
    let app = App::new(config_for(&server.url(), &dir)).unwrap();
    let output = app
        .run(Command::Dashboard {
            user: "rj".into(),
            year: Some(2023),
        })
        .await
        .unwrap();

    decades.assert_async().await;
    general.assert_async().await;

    let state: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(
        state["decadesChart"]["chartOptions"]["xaxis"]["categories"],
        serde_json::json!(["1990s", "1980s"])
    );
    assert_eq!(state["decadesChart"]["series"][0]["data"], serde_json::json!([12, 3]));
    assert_eq!(
        state["originChart"]["chartOptions"]["xaxis"]["categories"],
        serde_json::json!([])
    );
    assert_eq!(
        state["tagChart"]["series"][0]["data"],
        serde_json::json!([{"x": "rock", "y": 7}])
    );
    assert!(state["listTop5"].is_object());
    assert!(state["topArtists"].is_null());
    assert_eq!(state["years"], serde_json::json!([2024]));
    assert_eq!(state["selectedYear"], 2023);
    assert_eq!(state["loading"], false);
}

#[tokio::test]
async fn test_collection_requires_credentials() {
    let dir = create_temp_dir();
    let app = App::new(config_for("http://127.0.0.1:9", &dir)).unwrap();

    let err = app
        .run(Command::Collection {
            user: "digger".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::MissingCredentials(_)));
}
