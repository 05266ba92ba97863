//! Shared utilities for the Écrire chat application.
//!
//! Everything here is independent of the chat domain itself: time
//! handling with a clock abstraction, and tracing setup.

pub mod logger;
pub mod time;
