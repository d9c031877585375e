//! # Lectern Core
//!
//! The domain layer of the Lectern live-Q&A backend.
//! This crate contains pure business logic with zero infrastructure
//! dependencies: the session and question state machines, the write gates,
//! and the coordination services every mutation flows through.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
