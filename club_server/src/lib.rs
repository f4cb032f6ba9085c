//! HTTP server for the club bracket tracker.
//!
//! Exposes participant registration, tournament creation and result
//! recording from [`club_bracket`] as a JSON API.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
