pub mod cancel_pipelines;
pub mod configure;
pub mod configure_dev_data;
pub mod create_repositories;
pub mod dashboard;
pub mod delete_provider;
pub mod generate_ci_yml;
pub mod ls_providers;
pub mod open_urls;
pub mod trigger;
