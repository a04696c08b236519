//! Common test utilities for integration tests.
//!
//! This module provides:
//!
//! - [`app_builder::TestAppBuilder`] - Build test Axum apps that mirror main.rs wiring
//!
//! # App Builder Usage
//!
//! ```ignore
//! use crate::common::app_builder::TestAppBuilder;
//!
//! #[tokio::test]
//! async fn test_with_app() {
//!     let app = TestAppBuilder::full().build();
//!     // Use app.oneshot(...) to send requests
//! }
//! ```
//!
//! See [`app_builder`] module for preset builders and configuration options.

pub mod app_builder;
