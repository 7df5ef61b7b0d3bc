use crate::harness::TestContext;
use crate::harness::gitlab_mock::{forbid_writes, mock_current_user, mock_missing_project};
use predicates::prelude::*;

#[test]
fn configure_unknown_slug_fails_without_writing() {
    let ctx = TestContext::new();
    let mut server = mockito::Server::new();

    let user = mock_current_user(&mut server);
    let missing = mock_missing_project(&mut server, "dbnomics-fetchers/unknown-slug-fetcher");
    let writes = forbid_writes(&mut server);

    ctx.cli_against(&server)
        .args(["configure", "unknown-slug"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Not found"))
        .stderr(predicate::str::contains("unknown-slug-fetcher"));

    user.assert();
    missing.assert();
    for mock in writes {
        mock.assert();
    }
}

#[test]
fn configure_reports_rejected_token() {
    let ctx = TestContext::new();
    let mut server = mockito::Server::new();
    server.mock("GET", "/api/v4/user").with_status(401).create();

    ctx.cli_against(&server)
        .args(["configure", "boe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Authorization failed"));
}
