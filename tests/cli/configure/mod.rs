mod configures_empty_projects_contract;
mod unknown_slug_makes_no_write_contract;
