mod configure_dev_data_contract;
mod dashboard_contract;
mod delete_provider_contract;
mod ls_providers_contract;
