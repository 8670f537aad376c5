//! # SCLC Core
//!
//! Decision logic for the small-cell lung cancer treatment advisor.
//!
//! This crate contains pure, synchronous operations over an in-memory patient record:
//! - G8 geriatric frailty score aggregation ([`frailty`])
//! - TNM classification into a stage group ([`tnm`])
//! - The ordered recommendation rule engine ([`rules`])
//!
//! **No API concerns**: record files, HTTP/gRPC servers and authentication belong in `sclc-wire`,
//! `api-grpc`, `api-rest` or `api-shared`.

pub mod constants;
pub mod error;
pub mod frailty;
pub mod recommendation;
pub mod record;
pub mod rules;
pub mod service;
pub mod tnm;

pub use error::{CoreError, CoreResult};
pub use frailty::{compute_frailty_score, is_frail, G8Answers, G8Option, G8Question};
pub use recommendation::{Recommendation, Severity};
pub use record::{Frailty, OverallStage, PatientRecord, ResponseStatus, TreatmentHistory};
pub use rules::{generate_recommendations, Rule, RuleContext, RuleSet};
pub use service::{AdvisorService, FrailtyAssessment};
pub use tnm::{
    classify_tnm, MCategory, NCategory, Stage, StageOutcome, TCategory, TnmInputs, TnmResult,
    TumorCharacteristic,
};
