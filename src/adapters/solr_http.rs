//! Solr search index client implementation using reqwest.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Serialize;
use url::Url;

use crate::domain::{AppError, ProviderSlug, SearchConfig};
use crate::ports::SearchIndex;

/// HTTP client for a Solr core.
#[derive(Debug, Clone)]
pub struct HttpSolrIndex {
    update_url: Url,
    provider_field: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct DeleteCommand {
    delete: DeleteQuery,
}

#[derive(Debug, Serialize)]
struct DeleteQuery {
    query: String,
}

impl HttpSolrIndex {
    pub fn new(config: &SearchConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        let mut update_url = config.solr_url.clone();
        update_url
            .path_segments_mut()
            .map_err(|_| AppError::Configuration(format!("Invalid Solr URL: {}", config.solr_url)))?
            .pop_if_empty()
            .push("update");
        update_url.query_pairs_mut().append_pair("commit", "true");

        Ok(Self { update_url, provider_field: config.provider_field.clone(), client })
    }

    /// Delete-by-query matching every document of a provider.
    pub fn delete_query(&self, slug: &ProviderSlug) -> String {
        format!("{}:\"{}\"", self.provider_field, slug)
    }
}

impl SearchIndex for HttpSolrIndex {
    fn delete_provider(&self, slug: &ProviderSlug) -> Result<(), AppError> {
        let command = DeleteCommand { delete: DeleteQuery { query: self.delete_query(slug) } };
        tracing::debug!(target: "dbnomics_ci::http", query = %command.delete.query, "POST {}", self.update_url);

        let response = self
            .client
            .post(self.update_url.clone())
            .json(&command)
            .send()
            .map_err(|e| AppError::Network(format!("{}: {}", self.update_url, e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = response.text().unwrap_or_else(|_| "Unknown error".to_string());
        Err(AppError::Api {
            status: status.as_u16(),
            endpoint: self.update_url.path().to_string(),
            message,
        })
    }
}
