pub mod analytics;
pub mod cli;
pub mod database;
pub mod database_factory;
pub mod date_provider;
pub mod error;
pub mod history;
pub mod planner;
pub mod records;
pub mod report;
pub mod row_factories;
pub mod source;
pub mod time_format;
