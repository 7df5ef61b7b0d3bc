use crate::harness::TestContext;
use predicates::prelude::*;

#[test]
fn trigger_rejects_unknown_job_kind_before_any_request() {
    let ctx = TestContext::new();

    // No token and an unreachable instance: only argument validation can run.
    ctx.cli_without_token()
        .args(["--gitlab-url", "http://127.0.0.1:1", "trigger", "validate", "boe"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unknown job kind 'validate'"));
}
