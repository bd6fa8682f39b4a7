pub mod config;
pub mod di;
pub mod domain;
pub mod infrastructure;
pub mod metrics;
pub mod usecases;
pub mod workers;
