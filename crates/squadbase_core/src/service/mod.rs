//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and provider calls into use-case level APIs.
//! - Keep boundary layers decoupled from storage and transport details.

pub mod ingest_service;
