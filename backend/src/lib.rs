//! # MediFind Backend
//!
//! Hospital directory and bed booking service.
//!
//! This crate exposes hospital records with a live crowd indicator and lets
//! callers create and list bed bookings. Storage is abstracted behind the
//! repository pattern so the same HTTP surface runs against an in-memory store
//! or PostgreSQL.
//!
//! ## Features
//!
//! - **Hospital Directory**: list hospitals, filter by location, fetch by id
//! - **Crowd Level**: derived congestion label recomputed from bookings on every read
//! - **Bookings**: schemaless booking documents stamped with a `BK` code and timestamp
//! - **HTTP API**: JSON endpoints served by Axum
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Identifier types shared across layers
//! - [`models`]: Stored documents and their public representations
//! - [`services`]: Crowd classification and booking code generation
//! - [`db`]: Repository traits, backends, and the data access layer
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
