//! Fuzzy Irrigation Controller
//!
//! Mamdani-style fuzzy inference engine mapping crisp sensor readings to a
//! crisp irrigation duration.
//!
//! Module layout:
//! - `domain` / `membership` / `variable`: universes, piecewise-linear
//!   membership functions, linguistic variables and fuzzification
//! - `rules`: declarative rule data and builder
//! - `engine`: the inference coordinator (min/max composition, aggregation,
//!   defuzzification)
//! - `defuzz`: centroid reduction
//! - `config`: serde configuration layer
//! - `irrigation`: the authored irrigation knowledge base
//!
//! The engine is immutable after construction and purely functional per
//! call, so one instance serves concurrent callers without locking. All
//! configuration validation fails fast at build time.

pub mod config;
pub mod defuzz;
pub mod domain;
pub mod engine;
pub mod error;
pub mod irrigation;
pub mod membership;
pub mod rules;
pub mod utils;
pub mod variable;

// Re-export commonly used types
pub use config::{EngineConfig, TermConfig, VariableConfig};
pub use domain::Domain;
pub use engine::{FuzzyEngine, Inference, RuleActivation};
pub use error::{ConfigError, InferenceError};
pub use irrigation::{IrrigationController, SensorReading};
pub use membership::{MembershipFunction, Shape};
pub use rules::{Rule, RuleTerm};
pub use variable::{LinguisticVariable, Term};
