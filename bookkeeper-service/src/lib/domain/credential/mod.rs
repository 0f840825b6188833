pub mod errors;
pub mod models;
pub mod ports;
pub mod refresh_store;
pub mod service;
