// Library for tests to access modules

pub mod aggregator;
pub mod alerts;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod queries;
pub mod routes;
pub mod service_health;
pub mod store;
pub mod sysinfo_repo;
pub mod version;
pub mod worker;
