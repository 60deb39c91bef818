pub mod classifier;
pub mod emotion;
pub mod handlers;
pub mod history;
pub mod models;
pub mod rules;
pub mod tags;
pub mod user_analytics;
