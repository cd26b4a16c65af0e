//! Core use-case services.
//!
//! # Responsibility
//! - Compose attachment-directory resolution with mirror
//!   synchronization into one documented entry point.
//! - Keep host integrations decoupled from the reconciliation internals.
//!
//! # See also
//! - docs/architecture/mirror-sync.md

pub mod mirror_service;
