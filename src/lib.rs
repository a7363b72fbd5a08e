//! Clearview - photo restoration server
//!
//! Upload page, PNG API and CLI around the `photo-restore` pipeline.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
