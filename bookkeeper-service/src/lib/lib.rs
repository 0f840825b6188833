//! FoleyBookkeeper backend: account registration, login, token renewal and
//! logout over HTTP, with every other account route behind the bearer gate.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::credential;
pub use domain::user;
pub use outbound::repositories;
