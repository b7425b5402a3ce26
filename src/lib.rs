// Library for tests to access modules

pub mod assembler;
pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod rate_tracker;
pub mod routes;
pub mod sampler;
pub mod session;
pub mod version;
pub mod worker;
