//! # Todo Shared Library
//!
//! Types, persistence and database plumbing used by the todo API server.
//!
//! ## Module Organization
//!
//! - `db`: PostgreSQL connection pool and migrations
//! - `models`: Database models and data structures
//! - `store`: The `TodoStore` persistence trait and its implementations

pub mod db;
pub mod models;
pub mod store;
