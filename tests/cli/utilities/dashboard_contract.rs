use crate::harness::TestContext;
use crate::harness::gitlab_mock::{IMPORTER_ID, forbid_writes, mock_list, mock_project};
use predicates::prelude::*;

fn mock_fetchers(server: &mut mockito::Server) {
    mock_list(
        server,
        "/api/v4/groups/dbnomics-fetchers/projects",
        &format!(
            r#"[{{"id": 1, "name": "boe-fetcher", "path_with_namespace": "dbnomics-fetchers/boe-fetcher",
                  "web_url": "{}/dbnomics-fetchers/boe-fetcher"}}]"#,
            server.url()
        ),
    );
}

#[test]
fn dashboard_prints_markdown_overview() {
    let ctx = TestContext::new();
    let mut server = mockito::Server::new();
    let writes = forbid_writes(&mut server);

    mock_fetchers(&mut server);
    mock_project(&mut server, IMPORTER_ID, "dbnomics/dbnomics-importer");
    mock_list(
        &mut server,
        "/api/v4/projects/1/pipeline_schedules",
        r#"[{"id": 3, "description": "boe CI jobs", "ref": "master", "cron": "0 1 * * *",
             "active": true, "next_run_at": "2024-03-02T01:00:00.000Z"}]"#,
    );
    server
        .mock("GET", "/api/v4/projects/1/jobs")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"id": 12, "name": "download", "stage": "download", "status": "success",
                 "web_url": "https://h/dbnomics-fetchers/boe-fetcher/-/jobs/12", "duration": 61.0,
                 "created_at": "2024-03-01T01:00:00Z", "started_at": "2024-03-01T01:00:02Z",
                 "finished_at": "2024-03-01T01:01:03Z"}]"#,
        )
        .create();
    server
        .mock("GET", "/api/v4/projects/10/jobs")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"id": 40, "name": "index", "stage": "index", "status": "failed",
                 "web_url": "https://h/dbnomics/dbnomics-importer/-/jobs/40", "duration": 5.0,
                 "created_at": "2024-03-01T02:00:00Z", "started_at": null, "finished_at": null}]"#,
        )
        .create();
    server
        .mock("GET", "/api/v4/projects/10/jobs/40/trace")
        .with_status(200)
        .with_body("Importing provider boe...\n")
        .create();

    ctx.cli_against(&server)
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# boe\n- scheduler\n"))
        .stdout(predicate::str::contains("  - next run at: 2024-03-02 01:00:00 UTC\n"))
        .stdout(predicate::str::contains("- downloads\n  - 12\n"))
        .stdout(predicate::str::contains("    - duration: 1 minute and 1 second\n"))
        .stdout(predicate::str::contains("- indexations\n  - 40\n"));

    for mock in writes {
        mock.assert();
    }
}

#[test]
fn dashboard_rejects_unknown_format() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["dashboard", "--format", "html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("html"));
}
