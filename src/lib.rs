// Library for tests to access modules

pub mod cache;
pub mod cadvisor_repo;
pub mod config;
pub mod errors;
pub mod models;
pub mod oid;
pub mod protocol;
pub mod report;
pub mod table;
pub mod version;
