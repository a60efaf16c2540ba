//! Library root for the `sensornode-relay` service.
//!
//! The binary in `main.rs` is a thin shell around these modules. Each module
//! owns one concern:
//! - `config`     – environment driven configuration
//! - `models`     – readings, series points, commands, lenient field coercion
//! - `timestamp`  – seconds/milliseconds epoch normalization
//! - `status`     – ordered status classification rules
//! - `history`    – history snapshot reconstruction
//! - `store`      – real-time store client
//! - `dispatcher` – command relay to the automation gateway
//! - `poll`       – poll cycle and background poll loop
//! - `routes`     – HTTP API gateway (EMBP)

pub mod config;
pub mod dispatcher;
pub mod history;
pub mod models;
pub mod poll;
pub mod routes;
pub mod status;
pub mod store;
pub mod timestamp;

pub use config::{Config, FieldNames};
pub use dispatcher::{CommandDispatcher, DispatchOutcome};
pub use store::StoreClient;

// Re-exported so routes/*.rs only ever import from the crate root; they do
// not need to know which sibling module owns a type.
pub use models::{Command, Rgb, SensorReading, TimeSeriesPoint};
pub use status::{StatusResult, StatusTag, Thresholds};
