//! Test helpers module
//!
//! This module provides utilities and helpers for testing the CampusConnect application.
//! It includes an in-process test app, a mock media service, database helpers,
//! and builders for request payloads.

#![allow(dead_code)]

pub mod database_helper;
pub mod media_mock;
pub mod test_context;
pub mod test_data;
