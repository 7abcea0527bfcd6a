// Library for tests to access modules

pub mod aggregator;
pub mod classification;
pub mod config;
pub mod decoder;
pub mod listener;
pub mod metrics;
pub mod models;
pub mod reporter;
pub mod routes;
pub mod trend;
pub mod version;
pub mod window;
