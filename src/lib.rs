pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod schema;

#[cfg(test)]
pub mod testing;
