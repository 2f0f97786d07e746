//! Fuzzy Engine - Main coordinator for Mamdani inference
//!
//! Owns the static configuration (input variables, output variable, compiled
//! rule base) and runs the full pipeline per call: fuzzification, rule
//! evaluation (AND = min), per-label aggregation (OR = max), aggregation
//! across labels, centroid defuzzification.
//!
//! The engine is read-only after construction. Each `evaluate` call owns its
//! transient curves and returns them in the `Inference` value, so concurrent
//! calls from multiple threads share nothing and need no locking. Per-call
//! cost is O(output samples x rule count).

use rayon::prelude::*;
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::defuzz;
use crate::error::{ConfigError, InferenceError};
use crate::rules::Rule;
use crate::utils::interp_sampled;
use crate::variable::LinguisticVariable;

/// Rule with its term references resolved to indices.
///
/// Antecedents become `(input index, term index)` pairs; the consequent
/// becomes an output term index. Resolution failures surface as
/// `ConfigError` before an engine exists.
#[derive(Debug, Clone)]
struct CompiledRule {
    antecedent: SmallVec<[(usize, usize); 3]>,
    consequent: usize,
}

/// Per-rule outcome of one inference call.
#[derive(Debug, Clone)]
pub struct RuleActivation {
    /// Position of the rule in the engine's rule list.
    pub rule_index: usize,
    /// Output label the rule concludes.
    pub consequent_label: String,
    /// Minimum of the antecedent degrees (fuzzy AND).
    pub strength: f64,
    /// Consequent curve clipped at `strength`, over the output domain.
    pub curve: Vec<f64>,
}

/// Everything one `evaluate` call produced.
///
/// Owned by the caller; the engine keeps no record of past calls. Plotting
/// and diagnostic consumers read these fields as pure data.
#[derive(Debug, Clone)]
pub struct Inference {
    /// Defuzzified output value.
    pub crisp: f64,
    /// Membership height of the aggregate curve at `crisp`, read back by
    /// interpolation.
    pub activation_height: f64,
    /// True when no rule fired and `crisp` is the output domain midpoint.
    pub used_fallback: bool,
    /// Activation of every rule, in rule order.
    pub rule_activations: Vec<RuleActivation>,
    /// Aggregated curve per output label, in output term order. Labels no
    /// rule concluded keep an all-zero curve.
    pub label_curves: Vec<(String, Vec<f64>)>,
    /// Pointwise max across all label curves, over the output domain.
    pub aggregate: Vec<f64>,
}

/// Mamdani fuzzy inference engine.
pub struct FuzzyEngine {
    inputs: Vec<LinguisticVariable>,
    output: LinguisticVariable,
    rules: Vec<Rule>,
    compiled: Vec<CompiledRule>,
}

impl FuzzyEngine {
    /// Build an engine from already-constructed variables and rules.
    ///
    /// Every rule term is resolved here: antecedents must name input
    /// variables and their labels, the consequent must name the output
    /// variable and one of its labels. Any unresolved name fails the build,
    /// so evaluation never encounters an unknown label.
    pub fn new(
        inputs: Vec<LinguisticVariable>,
        output: LinguisticVariable,
        rules: Vec<Rule>,
    ) -> Result<Self, ConfigError> {
        if inputs.is_empty() {
            return Err(ConfigError::NoInputVariables);
        }

        for (i, var) in inputs.iter().enumerate() {
            let clash = inputs[..i].iter().any(|v| v.name() == var.name())
                || var.name() == output.name();
            if clash {
                return Err(ConfigError::DuplicateVariable {
                    variable: var.name().to_string(),
                });
            }
        }

        let compiled = rules
            .iter()
            .enumerate()
            .map(|(rule_index, rule)| Self::compile_rule(rule_index, rule, &inputs, &output))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            inputs = inputs.len(),
            output = output.name(),
            output_samples = output.domain().len(),
            rules = rules.len(),
            "fuzzy engine constructed"
        );

        Ok(Self {
            inputs,
            output,
            rules,
            compiled,
        })
    }

    /// Build an engine from a serializable configuration.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        let inputs = config
            .inputs
            .iter()
            .map(|v| v.build())
            .collect::<Result<Vec<_>, _>>()?;
        let output = config.output.build()?;

        Self::new(inputs, output, config.rules.clone())
    }

    fn compile_rule(
        rule_index: usize,
        rule: &Rule,
        inputs: &[LinguisticVariable],
        output: &LinguisticVariable,
    ) -> Result<CompiledRule, ConfigError> {
        if rule.antecedent().is_empty() {
            return Err(ConfigError::EmptyAntecedent { rule: rule_index });
        }

        let mut antecedent = SmallVec::new();
        for term in rule.antecedent() {
            let var_index = inputs
                .iter()
                .position(|v| v.name() == term.variable)
                .ok_or_else(|| ConfigError::UnknownVariable {
                    rule: rule_index,
                    variable: term.variable.clone(),
                })?;
            let term_index = inputs[var_index].term_index(&term.label).ok_or_else(|| {
                ConfigError::UnknownLabel {
                    rule: rule_index,
                    variable: term.variable.clone(),
                    label: term.label.clone(),
                }
            })?;
            antecedent.push((var_index, term_index));
        }

        let consequent_term = rule.consequent();
        if consequent_term.variable != output.name() {
            return Err(ConfigError::UnknownVariable {
                rule: rule_index,
                variable: consequent_term.variable.clone(),
            });
        }
        let consequent = output.term_index(&consequent_term.label).ok_or_else(|| {
            ConfigError::UnknownLabel {
                rule: rule_index,
                variable: consequent_term.variable.clone(),
                label: consequent_term.label.clone(),
            }
        })?;

        Ok(CompiledRule {
            antecedent,
            consequent,
        })
    }

    /// Run one inference over crisp inputs given in input-variable order.
    ///
    /// Out-of-range inputs fuzzify to zero degrees and an aggregate with no
    /// mass defuzzifies to the output domain midpoint; neither is an error.
    /// The only failure is passing the wrong number of inputs.
    pub fn evaluate(&self, crisp_inputs: &[f64]) -> Result<Inference, InferenceError> {
        if crisp_inputs.len() != self.inputs.len() {
            return Err(InferenceError::InputArity {
                expected: self.inputs.len(),
                got: crisp_inputs.len(),
            });
        }

        // Fuzzification: degree per term, per input variable
        let degrees: Vec<Vec<f64>> = self
            .inputs
            .iter()
            .zip(crisp_inputs)
            .map(|(var, &value)| var.fuzzify_indexed(value))
            .collect();

        // Rule evaluation: strength = min over antecedent degrees, then clip
        // the consequent term curve at that strength
        let samples = self.output.domain().len();
        let output_terms = self.output.terms();
        let mut label_curves: Vec<Vec<f64>> = vec![vec![0.0; samples]; output_terms.len()];
        let mut rule_activations = Vec::with_capacity(self.rules.len());

        for (rule_index, (rule, compiled)) in
            self.rules.iter().zip(&self.compiled).enumerate()
        {
            let strength = compiled
                .antecedent
                .iter()
                .map(|&(var, term)| degrees[var][term])
                .fold(1.0_f64, f64::min);

            let term_curve = output_terms[compiled.consequent].curve();
            let curve: Vec<f64> = term_curve.iter().map(|&d| d.min(strength)).collect();

            // Rules sharing a consequent label combine by max
            for (aggregated, &d) in label_curves[compiled.consequent].iter_mut().zip(&curve) {
                *aggregated = aggregated.max(d);
            }

            rule_activations.push(RuleActivation {
                rule_index,
                consequent_label: rule.consequent().label.clone(),
                strength,
                curve,
            });
        }

        // Aggregation across labels
        let mut aggregate: Vec<f64> = vec![0.0; samples];
        for curve in &label_curves {
            for (a, &d) in aggregate.iter_mut().zip(curve) {
                *a = a.max(d);
            }
        }

        // Defuzzification. Engine policy: an all-zero aggregate (no rule
        // fired) yields the output domain midpoint.
        let xs = self.output.domain().samples();
        let (crisp, used_fallback) = match defuzz::centroid(xs, &aggregate) {
            Some(value) => (value, false),
            None => (self.output.domain().midpoint(), true),
        };
        let activation_height = interp_sampled(xs, &aggregate, crisp);

        debug!(
            crisp,
            activation_height, used_fallback, "inference complete"
        );

        let label_curves = output_terms
            .iter()
            .map(|t| t.label().to_string())
            .zip(label_curves)
            .collect();

        Ok(Inference {
            crisp,
            activation_height,
            used_fallback,
            rule_activations,
            label_curves,
            aggregate,
        })
    }

    /// Evaluate many input rows in parallel.
    ///
    /// Calls are independent, so rows fan out across the Rayon pool and the
    /// results come back in row order.
    pub fn evaluate_batch(&self, rows: &[Vec<f64>]) -> Vec<Result<Inference, InferenceError>> {
        rows.par_iter().map(|row| self.evaluate(row)).collect()
    }

    /// Input variables in evaluation order, with their sampled term curves.
    pub fn input_variables(&self) -> &[LinguisticVariable] {
        &self.inputs
    }

    pub fn output_variable(&self) -> &LinguisticVariable {
        &self.output
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;
    use crate::membership::MembershipFunction;
    use approx::assert_relative_eq;

    fn two_label_variable(name: &str) -> LinguisticVariable {
        LinguisticVariable::new(
            name,
            Domain::new(0.0, 10.0, 1.0).unwrap(),
            vec![
                (
                    "low".to_string(),
                    MembershipFunction::triangular(0.0, 0.0, 10.0).unwrap(),
                ),
                (
                    "high".to_string(),
                    MembershipFunction::triangular(0.0, 10.0, 10.0).unwrap(),
                ),
            ],
        )
        .unwrap()
    }

    fn small_engine() -> FuzzyEngine {
        FuzzyEngine::new(
            vec![two_label_variable("input")],
            two_label_variable("output"),
            vec![
                Rule::when("input", "low").then("output", "low"),
                Rule::when("input", "high").then("output", "high"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_unknown_label_fails_at_construction() {
        let result = FuzzyEngine::new(
            vec![two_label_variable("input")],
            two_label_variable("output"),
            vec![Rule::when("input", "enormous").then("output", "low")],
        );
        assert!(matches!(
            result,
            Err(ConfigError::UnknownLabel { rule: 0, .. })
        ));

        let result = FuzzyEngine::new(
            vec![two_label_variable("input")],
            two_label_variable("output"),
            vec![Rule::when("pressure", "low").then("output", "low")],
        );
        assert!(matches!(
            result,
            Err(ConfigError::UnknownVariable { rule: 0, .. })
        ));

        let result = FuzzyEngine::new(
            vec![two_label_variable("input")],
            two_label_variable("output"),
            vec![Rule::when("input", "low").then("output", "endless")],
        );
        assert!(matches!(result, Err(ConfigError::UnknownLabel { .. })));
    }

    #[test]
    fn test_duplicate_variable_name_rejected() {
        let result = FuzzyEngine::new(
            vec![two_label_variable("x"), two_label_variable("x")],
            two_label_variable("output"),
            vec![Rule::when("x", "low").then("output", "low")],
        );
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateVariable { .. })
        ));
    }

    #[test]
    fn test_input_arity_checked() {
        let engine = small_engine();
        assert!(matches!(
            engine.evaluate(&[1.0, 2.0]),
            Err(InferenceError::InputArity {
                expected: 1,
                got: 2
            })
        ));
    }

    #[test]
    fn test_rule_strength_is_min_of_antecedents() {
        let engine = FuzzyEngine::new(
            vec![two_label_variable("a"), two_label_variable("b")],
            two_label_variable("output"),
            vec![Rule::when("a", "high")
                .and("b", "high")
                .then("output", "high")],
        )
        .unwrap();

        let inference = engine.evaluate(&[8.0, 4.0]).unwrap();
        assert_relative_eq!(inference.rule_activations[0].strength, 0.4);
    }

    #[test]
    fn test_activation_curve_is_clipped_consequent() {
        let engine = small_engine();
        let inference = engine.evaluate(&[5.0]).unwrap();

        // Both rules fire at 0.5; every activation stays at or below that
        for activation in &inference.rule_activations {
            assert_relative_eq!(activation.strength, 0.5);
            assert!(activation.curve.iter().all(|&d| d <= 0.5));
        }
    }

    #[test]
    fn test_unused_label_keeps_zero_curve() {
        let engine = FuzzyEngine::new(
            vec![two_label_variable("input")],
            two_label_variable("output"),
            vec![Rule::when("input", "low").then("output", "low")],
        )
        .unwrap();

        let inference = engine.evaluate(&[2.0]).unwrap();
        let (label, curve) = &inference.label_curves[1];
        assert_eq!(label, "high");
        assert!(curve.iter().all(|&d| d == 0.0));
    }

    #[test]
    fn test_aggregate_is_pointwise_max() {
        let engine = small_engine();
        let inference = engine.evaluate(&[5.0]).unwrap();

        for (i, &d) in inference.aggregate.iter().enumerate() {
            let expected = inference
                .label_curves
                .iter()
                .map(|(_, curve)| curve[i])
                .fold(0.0_f64, f64::max);
            assert_relative_eq!(d, expected);
        }
    }

    #[test]
    fn test_rule_order_does_not_change_result() {
        let forward = small_engine();
        let reversed = FuzzyEngine::new(
            vec![two_label_variable("input")],
            two_label_variable("output"),
            vec![
                Rule::when("input", "high").then("output", "high"),
                Rule::when("input", "low").then("output", "low"),
            ],
        )
        .unwrap();

        let a = forward.evaluate(&[3.0]).unwrap();
        let b = reversed.evaluate(&[3.0]).unwrap();
        assert_eq!(a.aggregate, b.aggregate);
        assert_eq!(a.crisp.to_bits(), b.crisp.to_bits());
    }

    #[test]
    fn test_midpoint_fallback_when_nothing_fires() {
        // Terms cover [2, 8] only; inputs outside leave the aggregate empty
        let input = LinguisticVariable::new(
            "input",
            Domain::new(0.0, 10.0, 1.0).unwrap(),
            vec![(
                "mid".to_string(),
                MembershipFunction::triangular(2.0, 5.0, 8.0).unwrap(),
            )],
        )
        .unwrap();
        let engine = FuzzyEngine::new(
            vec![input],
            two_label_variable("output"),
            vec![Rule::when("input", "mid").then("output", "high")],
        )
        .unwrap();

        let inference = engine.evaluate(&[100.0]).unwrap();
        assert!(inference.used_fallback);
        assert_relative_eq!(inference.crisp, 5.0);
        assert_relative_eq!(inference.activation_height, 0.0);
        assert!(inference.aggregate.iter().all(|&d| d == 0.0));
    }

    #[test]
    fn test_repeated_calls_bit_identical() {
        let engine = small_engine();
        let a = engine.evaluate(&[3.7]).unwrap();
        let b = engine.evaluate(&[3.7]).unwrap();
        assert_eq!(a.crisp.to_bits(), b.crisp.to_bits());
        assert_eq!(a.aggregate, b.aggregate);
    }

    #[test]
    fn test_batch_matches_sequential() {
        let engine = small_engine();
        let rows: Vec<Vec<f64>> = (0..=20).map(|i| vec![0.5 * i as f64]).collect();

        let batch = engine.evaluate_batch(&rows);
        for (row, result) in rows.iter().zip(batch) {
            let sequential = engine.evaluate(row).unwrap();
            let parallel = result.unwrap();
            assert_eq!(sequential.crisp.to_bits(), parallel.crisp.to_bits());
        }
    }
}
