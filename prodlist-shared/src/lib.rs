//! # ProdList Shared Library
//!
//! This crate contains the data layer and integrations shared by the ProdList
//! API server and the offline sync tool.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool and migrations
//! - `models`: Database models and their queries
//! - `auth`: Password hashing, API tokens and the request gates
//! - `catalog`: Client for the external product catalog
//! - `pagination`: Page-number pagination shared by list endpoints
//! - `sync`: Catalog-to-database product refresh

pub mod auth;
pub mod catalog;
pub mod db;
pub mod models;
pub mod pagination;
pub mod sync;

