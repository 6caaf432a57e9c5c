//! HTTP adapter over the statistics engine
//!
//! Thin layer: parse and validate the wire payload, call into
//! [`StatsEngine`](crate::stats::StatsEngine), map the outcome to a status code.

pub mod handlers;
pub mod payload;
pub mod router;

use crate::stats::StatsEngine;
use std::sync::Arc;

/// Shared handler state: the one engine instance for the process
pub type AppState = Arc<StatsEngine>;

pub use payload::{parse_transaction, ErrorBody, MalformedInput, StatisticsBody};
pub use router::create_router;
