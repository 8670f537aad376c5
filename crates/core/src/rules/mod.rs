//! Recommendation rule engine.
//!
//! The protocol is expressed as an ordered list of independent [`Rule`]s, each a predicate plus a
//! producer over a shared, immutable [`RuleContext`]. [`RuleSet::evaluate`] walks the list once
//! per call and collects the recommendations of every rule whose predicate holds, so the output
//! order is the rule order:
//!
//! 1. geriatric assessment (age 70 and over)
//! 2. standard and complementary workup
//! 3. treatment block for the effective stage (or a single "complete staging" warning)
//! 4. cross-cutting flags (EGFR transformation, brain metastases)
//! 5. supportive care, then surveillance
//!
//! Missing age or performance status never satisfies a `>=`/`>` threshold.

mod common;
mod geriatric;
mod limited;
mod metastatic;
mod workup;

use crate::constants::{GERIATRIC_AGE, G8_FRAILTY_CUTOFF};
use crate::recommendation::Recommendation;
use crate::record::{Frailty, OverallStage, PatientRecord, ResponseStatus, TreatmentHistory};

/// Values shared by every rule during one evaluation.
#[derive(Clone, Copy, Debug)]
pub struct RuleContext<'a> {
    pub record: &'a PatientRecord,
    pub stage: Option<OverallStage>,
    pub frailty: Frailty,
}

impl<'a> RuleContext<'a> {
    pub fn new(record: &'a PatientRecord) -> Self {
        Self {
            record,
            stage: record.effective_stage(),
            frailty: record.frailty(),
        }
    }

    /// Age is known and at least `years`.
    pub fn age_at_least(&self, years: u32) -> bool {
        self.record.age.is_some_and(|age| age >= years)
    }

    /// Age is unknown or below `years`.
    pub fn age_below(&self, years: u32) -> bool {
        !self.age_at_least(years)
    }

    /// Performance status is known and above `grade`.
    pub fn ps_above(&self, grade: u8) -> bool {
        self.record
            .performance_status
            .is_some_and(|ps| ps.grade() > grade)
    }

    /// Performance status is known and at most `grade`.
    pub fn ps_known_at_most(&self, grade: u8) -> bool {
        self.record
            .performance_status
            .is_some_and(|ps| ps.grade() <= grade)
    }

    pub fn is_geriatric(&self) -> bool {
        self.age_at_least(GERIATRIC_AGE)
    }

    /// G8 does not argue against standard treatment: either unscored in a patient under 70, or
    /// scored above the frailty cutoff.
    pub fn frailty_acceptable(&self) -> bool {
        match self.frailty {
            Frailty::Unknown => self.age_below(GERIATRIC_AGE),
            Frailty::Known(score) => score > G8_FRAILTY_CUTOFF,
        }
    }

    pub fn is_first_line(&self) -> bool {
        self.record.treatment_history == Some(TreatmentHistory::Naive)
            || self.record.response_status == Some(ResponseStatus::Naive)
    }
}

/// A named predicate and producer pair.
#[derive(Clone, Copy)]
pub struct Rule {
    name: &'static str,
    applies: fn(&RuleContext<'_>) -> bool,
    produce: fn(&RuleContext<'_>) -> Recommendation,
}

impl Rule {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn applies(&self, ctx: &RuleContext<'_>) -> bool {
        (self.applies)(ctx)
    }

    pub fn produce(&self, ctx: &RuleContext<'_>) -> Recommendation {
        (self.produce)(ctx)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// An ordered collection of rules.
#[derive(Clone, Debug)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// The fixed protocol, in emission order.
    pub fn standard() -> Self {
        let rules = [
            geriatric::RULES,
            workup::RULES,
            metastatic::RULES,
            limited::RULES,
            common::RULES,
        ]
        .concat();
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Looks up a rule by name.
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Evaluates every rule against `record` and returns the fired recommendations in order.
    pub fn evaluate(&self, record: &PatientRecord) -> Vec<Recommendation> {
        let ctx = RuleContext::new(record);
        tracing::debug!(
            stage = ?ctx.stage,
            frailty = ?ctx.frailty,
            "evaluating recommendation rules"
        );

        let mut out = Vec::new();
        for rule in &self.rules {
            if rule.applies(&ctx) {
                tracing::trace!(rule = rule.name, "rule fired");
                out.push(rule.produce(&ctx));
            }
        }
        out
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// Generates the ordered recommendation list for a patient record.
///
/// Deterministic: an unchanged record always yields an identical list.
pub fn generate_recommendations(record: &PatientRecord) -> Vec<Recommendation> {
    RuleSet::standard().evaluate(record)
}
