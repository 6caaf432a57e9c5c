//! txstats - near-real-time rolling statistics over a transaction stream
//!
//! - `stats` - the windowed aggregation engine
//! - `api` - HTTP adapter (`POST /api/transactions`, `GET /api/statistics`)
//! - `config` - environment-driven configuration

pub mod api;
pub mod config;
pub mod stats;

pub use api::{create_router, AppState};
pub use config::{ConfigError, ServerConfig, StatsConfig};
pub use stats::{IngestOutcome, StatsEngine, WindowStatistics};
