//! Écrire chat server library.
//!
//! Real-time text chat grouped by named rooms: incoming messages fan
//! out to every other participant immediately, while storage happens
//! asynchronously behind a bounded queue so a slow store never slows
//! down delivery.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
