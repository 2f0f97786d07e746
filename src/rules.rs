//! Declarative fuzzy rules.
//!
//! A rule is data: an antecedent list of `(variable, label)` terms, all
//! ANDed, implying one consequent term. Rules are authored once and compiled
//! against the engine's variables at construction, so a rule naming an
//! unknown variable or label can never reach evaluation.

use serde::{Deserialize, Serialize};

/// Reference to one labeled term of a named variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTerm {
    pub variable: String,
    pub label: String,
}

impl RuleTerm {
    pub fn new(variable: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            label: label.into(),
        }
    }
}

/// One fuzzy rule: `IF t1 AND t2 AND … THEN consequent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    antecedent: Vec<RuleTerm>,
    consequent: RuleTerm,
}

impl Rule {
    /// Start a rule from its first antecedent term.
    ///
    /// ```
    /// use irrigation_controller_rust::rules::Rule;
    ///
    /// let rule = Rule::when("air_humidity", "high")
    ///     .and("soil_moisture", "high")
    ///     .then("duration", "very_short");
    /// assert_eq!(rule.antecedent().len(), 2);
    /// ```
    pub fn when(variable: impl Into<String>, label: impl Into<String>) -> RuleBuilder {
        RuleBuilder {
            terms: vec![RuleTerm::new(variable, label)],
        }
    }

    pub fn antecedent(&self) -> &[RuleTerm] {
        &self.antecedent
    }

    pub fn consequent(&self) -> &RuleTerm {
        &self.consequent
    }
}

/// Builder produced by [`Rule::when`].
#[derive(Debug, Clone)]
pub struct RuleBuilder {
    terms: Vec<RuleTerm>,
}

impl RuleBuilder {
    pub fn and(mut self, variable: impl Into<String>, label: impl Into<String>) -> Self {
        self.terms.push(RuleTerm::new(variable, label));
        self
    }

    pub fn then(self, variable: impl Into<String>, label: impl Into<String>) -> Rule {
        Rule {
            antecedent: self.terms,
            consequent: RuleTerm::new(variable, label),
        }
    }
}
