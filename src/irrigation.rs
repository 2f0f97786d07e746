//! Irrigation Controller - authored knowledge base and front-end
//!
//! Maps three crisp sensor readings (soil moisture %, air humidity %,
//! temperature in degrees Celsius) to an irrigation duration in minutes
//! over [0, 10].
//!
//! State variables and terms:
//! - soil moisture: low, medium, high
//! - air humidity: low, medium, high
//! - temperature: low, normal, high
//! - duration (output): very_short, short, medium, long, very_long
//!
//! The rule table groups 23 conjunctions into the 5 duration buckets. The
//! very_short and very_long rules are temperature-independent. The table
//! does not cover every cell of the input cube; readings that fire no rule
//! fall back to the output midpoint.

use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, TermConfig, VariableConfig};
use crate::engine::{FuzzyEngine, Inference};
use crate::error::{ConfigError, InferenceError};
use crate::membership::Shape;
use crate::rules::Rule;

/// One crisp sensor sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Soil moisture in percent, nominally [0, 100].
    pub soil_moisture: f64,
    /// Relative air humidity in percent, nominally [0, 100].
    pub air_humidity: f64,
    /// Air temperature in degrees Celsius, nominally [-10, 50].
    pub temperature: f64,
}

/// Fuzzy irrigation controller with the authored variables and rule table.
///
/// An explicit constructor builds one engine per controller; independent
/// controllers can coexist and a controller is safe to share across threads.
pub struct IrrigationController {
    engine: FuzzyEngine,
}

fn tri(label: &str, a: f64, b: f64, c: f64) -> TermConfig {
    TermConfig {
        label: label.to_string(),
        shape: Shape::Triangular { a, b, c },
    }
}

fn trap(label: &str, a: f64, b: f64, c: f64, d: f64) -> TermConfig {
    TermConfig {
        label: label.to_string(),
        shape: Shape::Trapezoidal { a, b, c, d },
    }
}

impl IrrigationController {
    /// Build the controller from the authored knowledge base.
    pub fn new() -> Result<Self, ConfigError> {
        let engine = FuzzyEngine::from_config(&Self::config())?;
        Ok(Self { engine })
    }

    /// The authored knowledge base as data.
    ///
    /// Exposed so the surrounding application can persist, display or adapt
    /// the configuration without reaching into the engine.
    pub fn config() -> EngineConfig {
        let soil_moisture = VariableConfig {
            name: "soil_moisture".to_string(),
            min: 0.0,
            max: 100.0,
            step: 1.0,
            terms: vec![
                trap("low", 0.0, 0.0, 20.0, 40.0),
                tri("medium", 30.0, 50.0, 70.0),
                trap("high", 60.0, 80.0, 100.0, 100.0),
            ],
        };

        let air_humidity = VariableConfig {
            name: "air_humidity".to_string(),
            min: 0.0,
            max: 100.0,
            step: 1.0,
            terms: vec![
                trap("low", 0.0, 0.0, 15.0, 40.0),
                tri("medium", 25.0, 50.0, 75.0),
                trap("high", 60.0, 85.0, 100.0, 100.0),
            ],
        };

        let temperature = VariableConfig {
            name: "temperature".to_string(),
            min: -10.0,
            max: 50.0,
            step: 1.0,
            terms: vec![
                trap("low", -10.0, -10.0, 0.0, 15.0),
                tri("normal", 10.0, 20.0, 30.0),
                trap("high", 25.0, 40.0, 50.0, 50.0),
            ],
        };

        let duration = VariableConfig {
            name: "duration".to_string(),
            min: 0.0,
            max: 10.0,
            step: 0.5,
            terms: vec![
                tri("very_short", 0.0, 0.0, 2.5),
                tri("short", 0.0, 2.5, 5.0),
                tri("medium", 2.5, 5.0, 7.5),
                tri("long", 5.0, 7.5, 10.0),
                tri("very_long", 7.5, 10.0, 10.0),
            ],
        };

        EngineConfig {
            inputs: vec![soil_moisture, air_humidity, temperature],
            output: duration,
            rules: Self::rule_table(),
        }
    }

    /// The 23 authored rules, grouped by duration bucket.
    fn rule_table() -> Vec<Rule> {
        let mut rules = Vec::with_capacity(23);

        // Bucket 1: wet air over wet soil needs almost no watering,
        // whatever the temperature
        rules.push(
            Rule::when("air_humidity", "high")
                .and("soil_moisture", "high")
                .then("duration", "very_short"),
        );

        // Bucket 2: short watering
        for (humidity, moisture, temp) in [
            ("high", "medium", "normal"),
            ("medium", "high", "normal"),
            ("high", "medium", "low"),
            ("medium", "high", "low"),
            ("low", "high", "low"),
            ("high", "high", "low"),
        ] {
            rules.push(
                Rule::when("air_humidity", humidity)
                    .and("soil_moisture", moisture)
                    .and("temperature", temp)
                    .then("duration", "short"),
            );
        }

        // Bucket 3: medium watering
        for (humidity, moisture, temp) in [
            ("medium", "medium", "normal"),
            ("medium", "medium", "low"),
            ("medium", "medium", "high"),
            ("high", "medium", "high"),
            ("medium", "high", "high"),
            ("low", "medium", "low"),
            ("medium", "low", "low"),
            ("low", "high", "normal"),
            ("high", "low", "normal"),
        ] {
            rules.push(
                Rule::when("air_humidity", humidity)
                    .and("soil_moisture", moisture)
                    .and("temperature", temp)
                    .then("duration", "medium"),
            );
        }

        // Bucket 4: long watering
        for (humidity, moisture, temp) in [
            ("medium", "low", "normal"),
            ("low", "medium", "normal"),
            ("low", "medium", "high"),
            ("medium", "low", "high"),
            ("high", "low", "high"),
            ("low", "high", "high"),
        ] {
            rules.push(
                Rule::when("air_humidity", humidity)
                    .and("soil_moisture", moisture)
                    .and("temperature", temp)
                    .then("duration", "long"),
            );
        }

        // Bucket 5: dry air over dry soil needs the longest watering,
        // whatever the temperature
        rules.push(
            Rule::when("air_humidity", "low")
                .and("soil_moisture", "low")
                .then("duration", "very_long"),
        );

        rules
    }

    /// Run one inference. Duration comes back in minutes via
    /// `Inference::crisp`, alongside the per-rule and aggregate curves.
    pub fn evaluate(
        &self,
        soil_moisture: f64,
        air_humidity: f64,
        temperature: f64,
    ) -> Result<Inference, InferenceError> {
        self.engine
            .evaluate(&[soil_moisture, air_humidity, temperature])
    }

    /// Evaluate a batch of readings in parallel.
    pub fn evaluate_batch(
        &self,
        readings: &[SensorReading],
    ) -> Vec<Result<Inference, InferenceError>> {
        let rows: Vec<Vec<f64>> = readings
            .iter()
            .map(|r| vec![r.soil_moisture, r.air_humidity, r.temperature])
            .collect();
        self.engine.evaluate_batch(&rows)
    }

    /// The underlying engine, for plotting and diagnostic consumers.
    pub fn engine(&self) -> &FuzzyEngine {
        &self.engine
    }
}
