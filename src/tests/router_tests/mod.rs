mod auth_tests;
mod export_tests;
mod status_tests;
