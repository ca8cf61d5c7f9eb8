pub mod config;
pub mod db;
pub mod http;
pub mod ingest;
pub mod queries;
pub mod roster;
