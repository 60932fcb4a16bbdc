//! Commute-alert notification rule engine.
//!
//! Given a snapshot of weather, air-quality and transit signals, decide which
//! configured rules fire, render their messages and rank them by priority.
//! The core (`engine::evaluate`) is pure; `config`, `presets` and `logging`
//! cover the surrounding rule loading and process setup.
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod presets;
pub mod rules;
pub mod template;

pub use context::{AirQualityData, BusArrival, Context, SubwayArrival, WeatherData};
pub use engine::{evaluate, top_pick, Dispatch, Recommendation, RuleEngine};
pub use error::RuleSetError;
pub use rules::{Condition, ConditionEvaluator, DataSource, LogicalOperator, Operator, Rule, RuleCategory};
