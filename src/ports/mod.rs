mod browser;
mod gitlab_api;
mod search_index;

pub use browser::Browser;
pub use gitlab_api::GitLabApi;
pub use search_index::SearchIndex;
