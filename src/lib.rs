pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod schema;

pub use router::router;

#[cfg(test)]
pub mod testing;
