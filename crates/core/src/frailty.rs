//! G8 geriatric screening questionnaire and score aggregation.
//!
//! The G8 is an eight-item screening tool for older patients with cancer. Each item is answered
//! with a point value; the total ranges from 0 to 17 and a total of 14 or less flags the patient
//! as frail.
//!
//! Answers are kept as the raw text the host collected. Aggregation skips anything blank or
//! non-numeric rather than counting it as zero, so an unanswered item reads as "incomplete"
//! instead of "worst possible".

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::G8_FRAILTY_CUTOFF;
use crate::{CoreError, CoreResult};

/// One of the eight fixed G8 items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum G8Question {
    Appetite,
    WeightLoss,
    Mobility,
    Neuropsychological,
    Bmi,
    Medications,
    HealthComparison,
    Age,
}

/// A selectable answer for a G8 item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct G8Option {
    pub points: f64,
    pub label: &'static str,
}

impl G8Question {
    /// All items, in questionnaire order.
    pub const ALL: [G8Question; 8] = [
        G8Question::Appetite,
        G8Question::WeightLoss,
        G8Question::Mobility,
        G8Question::Neuropsychological,
        G8Question::Bmi,
        G8Question::Medications,
        G8Question::HealthComparison,
        G8Question::Age,
    ];

    /// Stable key used in record files and APIs.
    pub fn key(self) -> &'static str {
        match self {
            G8Question::Appetite => "appetite",
            G8Question::WeightLoss => "weight-loss",
            G8Question::Mobility => "mobility",
            G8Question::Neuropsychological => "neuropsychological",
            G8Question::Bmi => "bmi",
            G8Question::Medications => "medications",
            G8Question::HealthComparison => "health-comparison",
            G8Question::Age => "age",
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            G8Question::Appetite => {
                "Has food intake declined over the past 3 months due to loss of appetite, \
                 digestive problems, chewing or swallowing difficulties?"
            }
            G8Question::WeightLoss => "Weight loss during the last 3 months",
            G8Question::Mobility => "Mobility",
            G8Question::Neuropsychological => "Neuropsychological problems",
            G8Question::Bmi => "Body mass index (weight in kg / (height in m)²)",
            G8Question::Medications => "Takes more than 3 prescription drugs per day?",
            G8Question::HealthComparison => {
                "In comparison with other people of the same age, how does the patient consider \
                 their health status?"
            }
            G8Question::Age => "Age",
        }
    }

    /// The permitted answers, lowest score first.
    pub fn options(self) -> &'static [G8Option] {
        match self {
            G8Question::Appetite => &[
                G8Option { points: 0.0, label: "Severe decrease in food intake" },
                G8Option { points: 1.0, label: "Moderate decrease in food intake" },
                G8Option { points: 2.0, label: "No decrease in food intake" },
            ],
            G8Question::WeightLoss => &[
                G8Option { points: 0.0, label: "Weight loss > 3 kg" },
                G8Option { points: 1.0, label: "Does not know" },
                G8Option { points: 2.0, label: "Weight loss between 1 and 3 kg" },
                G8Option { points: 3.0, label: "No weight loss" },
            ],
            G8Question::Mobility => &[
                G8Option { points: 0.0, label: "Bed or chair bound" },
                G8Option {
                    points: 1.0,
                    label: "Able to get out of bed/chair but does not go out",
                },
                G8Option { points: 2.0, label: "Goes out" },
            ],
            G8Question::Neuropsychological => &[
                G8Option { points: 0.0, label: "Severe dementia or depression" },
                G8Option { points: 1.0, label: "Mild dementia or depression" },
                G8Option { points: 2.0, label: "No psychological problems" },
            ],
            G8Question::Bmi => &[
                G8Option { points: 0.0, label: "BMI < 19" },
                G8Option { points: 1.0, label: "BMI 19 to < 21" },
                G8Option { points: 2.0, label: "BMI 21 to < 23" },
                G8Option { points: 3.0, label: "BMI ≥ 23" },
            ],
            G8Question::Medications => &[
                G8Option { points: 0.0, label: "Yes" },
                G8Option { points: 1.0, label: "No" },
            ],
            G8Question::HealthComparison => &[
                G8Option { points: 0.0, label: "Not as good" },
                G8Option { points: 0.5, label: "Does not know" },
                G8Option { points: 1.0, label: "As good" },
                G8Option { points: 2.0, label: "Better" },
            ],
            G8Question::Age => &[
                G8Option { points: 0.0, label: "> 85" },
                G8Option { points: 1.0, label: "80-85" },
                G8Option { points: 2.0, label: "< 80" },
            ],
        }
    }

    /// Highest points this item can contribute.
    pub fn max_points(self) -> f64 {
        self.options()
            .iter()
            .map(|o| o.points)
            .fold(0.0, f64::max)
    }
}

impl FromStr for G8Question {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let key = s.trim();
        G8Question::ALL
            .into_iter()
            .find(|q| q.key() == key)
            .ok_or_else(|| CoreError::InvalidInput(format!("unknown G8 item '{key}'")))
    }
}

impl std::fmt::Display for G8Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw answers to the G8 questionnaire, keyed by item.
///
/// Values are stored as collected (for example `"2"` or `"0.5"`). A missing key and a blank
/// value both mean "not answered".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct G8Answers(BTreeMap<G8Question, String>);

impl G8Answers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an answer, replacing any previous one for the same item.
    pub fn set(&mut self, question: G8Question, value: impl Into<String>) {
        self.0.insert(question, value.into());
    }

    /// Builder-style variant of [`G8Answers::set`].
    pub fn with(mut self, question: G8Question, value: impl Into<String>) -> Self {
        self.set(question, value);
        self
    }

    pub fn get(&self, question: G8Question) -> Option<&str> {
        self.0.get(&question).map(String::as_str)
    }

    fn is_answered(&self, question: G8Question) -> bool {
        self.get(question).is_some_and(|v| !v.trim().is_empty())
    }

    /// True when at least one item has a non-blank answer.
    pub fn has_any_answer(&self) -> bool {
        G8Question::ALL.into_iter().any(|q| self.is_answered(q))
    }

    /// True when every one of the eight items has a non-blank answer.
    pub fn is_complete(&self) -> bool {
        G8Question::ALL.into_iter().all(|q| self.is_answered(q))
    }

    pub fn iter(&self) -> impl Iterator<Item = (G8Question, &str)> {
        self.0.iter().map(|(q, v)| (*q, v.as_str()))
    }
}

impl FromIterator<(G8Question, String)> for G8Answers {
    fn from_iter<I: IntoIterator<Item = (G8Question, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Sums every answer that parses as a finite number.
///
/// Blank and non-numeric answers are skipped without error. Returns `0.0` when nothing is
/// answered; use [`G8Answers::is_complete`] to tell that apart from a genuine zero. The sum is
/// not clamped and the values are not checked against the item options.
pub fn compute_frailty_score(answers: &G8Answers) -> f64 {
    answers
        .iter()
        .filter_map(|(_, raw)| parse_points(raw))
        .fold(0.0, |total, points| total + points)
}

fn parse_points(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// True when a G8 total indicates frailty (14 or less).
pub fn is_frail(score: f64) -> bool {
    score <= G8_FRAILTY_CUTOFF
}
