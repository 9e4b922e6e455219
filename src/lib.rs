//! Standings, fixtures and roster services for a football league, each a
//! stateless verb-to-statement handler over a shared SQLite database.

pub mod config;
pub mod db;
pub mod envelope;
pub mod error;
pub mod models;
pub mod routes;
