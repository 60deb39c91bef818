// Audit engine: append-only event log, filtering, statistics, alerting, export.
// Everything except `store`, `service` and `handlers` is a pure function over a snapshot.

pub mod alerts;
pub mod export;
pub mod handlers;
pub mod models;
pub mod presets;
pub mod query;
pub mod service;
pub mod stats;
pub mod store;
