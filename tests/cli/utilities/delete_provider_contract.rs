use crate::harness::TestContext;
use mockito::Matcher;
use serde_json::json;

#[test]
fn delete_provider_deletes_by_query_and_commits() {
    let ctx = TestContext::new();
    let mut server = mockito::Server::new();
    ctx.write_config(&format!("[search]\nsolr_url = \"{}/solr/dbnomics\"\n", server.url()));

    let delete = server
        .mock("POST", "/solr/dbnomics/update")
        .match_query(Matcher::UrlEncoded("commit".into(), "true".into()))
        .match_body(Matcher::Json(json!({"delete": {"query": "provider_code:\"boe\""}})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"responseHeader": {"status": 0}}"#)
        .create();

    ctx.cli_without_token().args(["delete-provider", "boe", "--yes"]).assert().success();

    delete.assert();
}
