//! # ProdList API Server Library
//!
//! HTTP surface of ProdList: user accounts with favorite products, proxied
//! from an external catalog.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration from the environment
//! - `error`: Error type and HTTP response mapping
//! - `extract`: Extractors turning bad input into 422 responses
//! - `middleware`: Response security headers
//! - `routes`: Route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
