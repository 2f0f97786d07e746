//! Linguistic variables and fuzzification.

use rustc_hash::FxHashMap;

use crate::domain::Domain;
use crate::error::ConfigError;
use crate::membership::MembershipFunction;

/// One labeled term of a linguistic variable.
///
/// Holds the membership function plus its curve rasterized over the owning
/// variable's domain. The curve is sampled once at construction; inference
/// only reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    label: String,
    membership: MembershipFunction,
    curve: Vec<f64>,
}

impl Term {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn membership(&self) -> &MembershipFunction {
        &self.membership
    }

    /// Dense degree curve aligned with the variable's domain samples.
    pub fn curve(&self) -> &[f64] {
        &self.curve
    }
}

/// A named domain plus a small ordered set of labeled membership functions.
///
/// Labels are unique within one variable. Terms are expected to overlap;
/// nothing requires them to partition the range.
#[derive(Debug, Clone, PartialEq)]
pub struct LinguisticVariable {
    name: String,
    domain: Domain,
    terms: Vec<Term>,
}

impl LinguisticVariable {
    /// Build a variable from its domain and `(label, membership)` pairs,
    /// preserving authoring order.
    ///
    /// # Errors
    /// - `NoTerms` if the term list is empty
    /// - `DuplicateLabel` if a label repeats
    pub fn new(
        name: impl Into<String>,
        domain: Domain,
        terms: Vec<(String, MembershipFunction)>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();

        if terms.is_empty() {
            return Err(ConfigError::NoTerms { variable: name });
        }

        let mut built: Vec<Term> = Vec::with_capacity(terms.len());
        for (label, membership) in terms {
            if built.iter().any(|t| t.label == label) {
                return Err(ConfigError::DuplicateLabel {
                    variable: name,
                    label,
                });
            }
            let curve = membership.sample_over(&domain);
            built.push(Term {
                label,
                membership,
                curve,
            });
        }

        Ok(Self {
            name,
            domain,
            terms: built,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|t| t.label())
    }

    pub fn term_index(&self, label: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.label == label)
    }

    /// Evaluate a crisp value against every term.
    ///
    /// Values outside the domain range are not an error; every label simply
    /// reads as degree 0 there. Read-only, no side effects.
    pub fn fuzzify(&self, value: f64) -> FxHashMap<&str, f64> {
        self.terms
            .iter()
            .map(|t| (t.label(), t.membership.degree_at(value)))
            .collect()
    }

    /// Degrees in term order, for the inference hot path.
    pub(crate) fn fuzzify_indexed(&self, value: f64) -> Vec<f64> {
        self.terms
            .iter()
            .map(|t| t.membership.degree_at(value))
            .collect()
    }

    /// Sampled curves per label, for plotting consumers. Pure data; the
    /// caller gets no write access.
    pub fn sampled_curves(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.terms.iter().map(|t| (t.label(), t.curve()))
    }
}
