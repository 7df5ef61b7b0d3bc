use crate::harness::TestContext;
use crate::harness::gitlab_mock::{SOURCE_DATA_ID, mock_current_user, mock_list, mock_project};
use mockito::Matcher;
use predicates::prelude::*;

const DEV_SOURCE_ID: u64 = 18;
const DEV_JSON_ID: u64 = 19;
const PUBLIC_KEY: &str = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAA boe";

#[test]
fn configure_dev_data_copies_deploy_key() {
    let ctx = TestContext::new();
    let mut server = mockito::Server::new();

    mock_current_user(&mut server);
    mock_project(&mut server, SOURCE_DATA_ID, "dbnomics-source-data/boe-source-data");
    mock_project(&mut server, DEV_SOURCE_ID, "dbnomics-data-dev/boe-source-data");
    mock_project(&mut server, DEV_JSON_ID, "dbnomics-data-dev/boe-json-data");
    mock_list(
        &mut server,
        "/api/v4/projects/8/deploy_keys",
        &format!(r#"[{{"id": 40, "title": "boe CI jobs", "key": "{}", "can_push": true}}]"#, PUBLIC_KEY),
    );
    mock_list(&mut server, "/api/v4/projects/18/deploy_keys", "[]");
    mock_list(&mut server, "/api/v4/projects/19/deploy_keys", "[]");
    let create = server
        .mock("POST", "/api/v4/projects/18/deploy_keys")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "title": "boe CI jobs",
            "key": PUBLIC_KEY,
            "can_push": true,
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"id": 41, "title": "boe CI jobs", "key": "{}", "can_push": true}}"#,
            PUBLIC_KEY
        ))
        .create();
    let enable = server
        .mock("POST", "/api/v4/projects/19/deploy_keys/41/enable")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"id": 41, "title": "boe CI jobs", "key": "{}", "can_push": false}}"#,
            PUBLIC_KEY
        ))
        .create();
    let grant = server
        .mock("PUT", "/api/v4/projects/19/deploy_keys/41")
        .match_body(Matcher::Json(serde_json::json!({"can_push": true})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"id": 41, "title": "boe CI jobs", "key": "{}", "can_push": true}}"#,
            PUBLIC_KEY
        ))
        .create();

    ctx.cli_against(&server)
        .args(["configure-dev-data", "boe"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "created deploy key 'boe CI jobs' on dbnomics-data-dev/boe-source-data",
        ))
        .stdout(predicate::str::contains("Applied 3 change(s)"));

    create.assert();
    enable.assert();
    grant.assert();
}

#[test]
fn configure_dev_data_rejects_invalid_slug() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["configure-dev-data", "BOE"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: "));
}
