//! # TableTab server
//! This module hosts the HTTP server for TableTab. It is responsible for:
//! * Accepting order submissions from table-side devices and folding them into open orders.
//! * Letting kitchen staff confirm or reject individual order items.
//! * Completing orders into the immutable archive.
//! * Pushing every order mutation to connected dashboards over a server-sent-events stream.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! See [routes](routes/index.html) for the full list of endpoints.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod push;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
