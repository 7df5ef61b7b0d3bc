pub mod ci_config;
pub mod parse;
pub mod paths;

pub use ci_config::{CiConfig, GitLabConfig, NamespaceConfig, ScheduleConfig, SearchConfig};
pub use parse::parse_config_content;
