pub mod browser_command;
pub mod ci_template;
pub mod config_file;
pub mod dashboard_template;
pub mod gitlab_http;
pub mod solr_http;
