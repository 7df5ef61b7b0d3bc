use crate::harness::TestContext;
use crate::harness::gitlab_mock::{
    FETCHER_ID, IMPORTER_ID, JSON_DATA_ID, SOURCE_DATA_ID, mock_current_user, mock_list,
    mock_project,
};
use mockito::Matcher;
use predicates::prelude::*;
use serde_json::json;

#[test]
fn configure_creates_trigger_variable_and_webhooks() {
    let ctx = TestContext::new();
    let mut server = mockito::Server::new();
    let api = format!("{}/api/v4", server.url());

    mock_current_user(&mut server);
    mock_project(&mut server, FETCHER_ID, "dbnomics-fetchers/boe-fetcher");
    mock_project(&mut server, SOURCE_DATA_ID, "dbnomics-source-data/boe-source-data");
    mock_project(&mut server, JSON_DATA_ID, "dbnomics-json-data/boe-json-data");
    mock_project(&mut server, IMPORTER_ID, "dbnomics/dbnomics-importer");
    mock_list(
        &mut server,
        "/api/v4/projects/10/triggers",
        r#"[{"id": 1, "description": "importer", "token": "importer-token"}]"#,
    );
    mock_list(&mut server, "/api/v4/projects/7/triggers", "[]");
    mock_list(&mut server, "/api/v4/projects/7/variables", "[]");
    mock_list(&mut server, "/api/v4/projects/8/hooks", "[]");
    mock_list(&mut server, "/api/v4/projects/9/hooks", "[]");
    mock_list(&mut server, "/api/v4/projects/8/deploy_keys", "[]");
    mock_list(&mut server, "/api/v4/projects/7/pipeline_schedules", "[]");

    let create_trigger = server
        .mock("POST", "/api/v4/projects/7/triggers")
        .match_body(Matcher::Json(json!({"description": "boe"})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 5, "description": "boe", "token": "fetcher-token"}"#)
        .create();
    let create_variable = server
        .mock("POST", "/api/v4/projects/7/variables")
        .match_body(Matcher::Json(json!({"key": "PROVIDER_SLUG", "value": "boe"})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"key": "PROVIDER_SLUG", "value": "boe"}"#)
        .create();
    let convert_hook = format!(
        "{}/projects/7/ref/master/trigger/pipeline?token=fetcher-token&variables[JOB]=convert",
        api
    );
    let create_convert_hook = server
        .mock("POST", "/api/v4/projects/8/hooks")
        .match_body(Matcher::Json(json!({"url": convert_hook, "push_events": true})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!({"id": 11, "url": convert_hook, "push_events": true}).to_string())
        .create();
    let index_hook = format!(
        "{}/projects/10/ref/master/trigger/pipeline?token=importer-token&variables[PROVIDER_SLUG]=boe",
        api
    );
    let create_index_hook = server
        .mock("POST", "/api/v4/projects/9/hooks")
        .match_body(Matcher::Json(json!({"url": index_hook, "push_events": true})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!({"id": 12, "url": index_hook, "push_events": true}).to_string())
        .create();

    ctx.cli_against(&server)
        .args(["configure", "boe", "--no-schedule"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied 4 change(s) to boe"))
        .stdout(predicate::str::contains("fetcher-token").not())
        .stdout(predicate::str::contains("importer-token").not());

    create_trigger.assert();
    create_variable.assert();
    create_convert_hook.assert();
    create_index_hook.assert();
}
