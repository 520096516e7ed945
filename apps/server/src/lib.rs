//! Trading Desk read API.
//!
//! A thin HTTP facade over the desk services: one GET route per asset
//! class, each answering with normalized values plus display strings. No
//! route can fail with an upstream error - the services always yield
//! data, live or degraded.

pub mod api;
pub mod main_lib;

pub use main_lib::{build_state, init_tracing, AppState};
