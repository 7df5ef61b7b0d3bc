use crate::harness::TestContext;
use mockito::Matcher;
use predicates::prelude::*;

#[test]
fn ls_providers_prints_fetcher_slugs() {
    let ctx = TestContext::new();
    let mut server = mockito::Server::new();
    let group = server
        .mock("GET", "/api/v4/groups/dbnomics-fetchers/projects")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("order_by".into(), "name".into()),
            Matcher::UrlEncoded("per_page".into(), "100".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"id": 1, "name": "boe-fetcher", "path_with_namespace": "dbnomics-fetchers/boe-fetcher", "web_url": "u"},
                {"id": 2, "name": "dummy-fetcher", "path_with_namespace": "dbnomics-fetchers/dummy-fetcher", "web_url": "u"},
                {"id": 3, "name": "management", "path_with_namespace": "dbnomics-fetchers/management", "web_url": "u"}
            ]"#,
        )
        .create();

    ctx.cli_against(&server)
        .arg("ls-providers")
        .assert()
        .success()
        .stdout(predicate::eq("boe\n"));

    group.assert();
}
