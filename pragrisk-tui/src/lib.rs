//! PragRisk TUI library exports.

pub mod api_client;
pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod keys;
pub mod logging;
pub mod nav;
pub mod notifications;
pub mod persistence;
pub mod routes;
pub mod state;
pub mod theme;
pub mod views;
pub mod widgets;
