//! String-typed form record and its translation into the domain record.
//!
//! Responsibilities:
//! - Mirror the record as a form collects it (every scalar is text, blank means unset)
//! - Accept numbers where text is expected, so `age: 72` and `age: "72"` read the same
//! - Translate into [`PatientRecord`], naming the offending field on failure
//!
//! Notes:
//! - Translation is strict: a non-blank value that does not parse is an error, never "unset"
//! - G8 answer values are kept verbatim; the score aggregation skips non-numeric answers

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use sclc_core::{
    G8Answers, G8Question, MCategory, NCategory, OverallStage, PatientRecord, ResponseStatus,
    TnmInputs, TreatmentHistory, TumorCharacteristic,
};
use sclc_types::{G8Score, PerformanceStatus};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::{WireError, WireResult};

// ============================================================================
// Public wire-level types
// ============================================================================

/// Patient record as collected by a form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormRecord {
    #[serde(deserialize_with = "text")]
    pub age: String,

    #[serde(deserialize_with = "text")]
    pub performance_status: String,

    /// `limited`/`I-III` or `metastatic`/`IV`.
    #[serde(deserialize_with = "text")]
    pub overall_stage: String,

    pub extension_workup_done: bool,

    #[serde(deserialize_with = "text")]
    pub treatment_history: String,

    #[serde(deserialize_with = "text")]
    pub response_status: String,

    pub brain_metastases: bool,

    pub egfr_mutation: bool,

    #[serde(deserialize_with = "text")]
    pub g8_score: String,

    /// Item key (for example `weight-loss`) to answer points.
    #[serde(deserialize_with = "text_map", skip_serializing_if = "BTreeMap::is_empty")]
    pub g8_answers: BTreeMap<String, String>,

    pub tnm: FormTnm,
}

/// TNM inputs as collected by a form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormTnm {
    #[serde(deserialize_with = "text")]
    pub tumor_size_cm: String,

    /// Characteristic tags, for example `chest-wall-involvement`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub characteristics: Vec<String>,

    #[serde(deserialize_with = "text")]
    pub nodes: String,

    #[serde(deserialize_with = "text")]
    pub metastasis: String,
}

// ============================================================================
// Translation
// ============================================================================

impl FormRecord {
    /// Translates the form into a domain record.
    ///
    /// When any TNM input is present the classifier runs and its result is applied, so the
    /// returned record already carries the derived stage.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidField`] naming the first field whose non-blank value does not
    /// parse.
    pub fn into_record(self) -> WireResult<PatientRecord> {
        let mut record = PatientRecord::new();

        record.age = parse_optional("age", &self.age, |s| s.parse::<u32>())?;
        record.performance_status = parse_optional(
            "performance_status",
            &self.performance_status,
            PerformanceStatus::from_str,
        )?;
        record.overall_stage =
            parse_optional("overall_stage", &self.overall_stage, OverallStage::from_str)?;
        record.extension_workup_done = self.extension_workup_done;
        record.treatment_history = parse_optional(
            "treatment_history",
            &self.treatment_history,
            TreatmentHistory::from_str,
        )?;
        record.response_status = parse_optional(
            "response_status",
            &self.response_status,
            ResponseStatus::from_str,
        )?;
        record.brain_metastases = self.brain_metastases;
        record.egfr_mutation = self.egfr_mutation;
        record.g8_score = parse_optional("g8_score", &self.g8_score, G8Score::from_str)?;
        record.g8_answers = parse_g8_answers(self.g8_answers)?;
        record.tnm_inputs = self.tnm.into_inputs()?;

        if record.tnm_inputs.has_any_input() {
            record.restage();
        }

        Ok(record)
    }
}

impl FormTnm {
    /// Translates the TNM section into classifier inputs.
    pub fn into_inputs(self) -> WireResult<TnmInputs> {
        let tumor_size_cm = parse_optional("tnm.tumor_size_cm", &self.tumor_size_cm, |s| {
            s.replace(',', ".")
                .parse::<f64>()
                .map_err(|e| e.to_string())
                .and_then(|v| {
                    if v.is_finite() && v >= 0.0 {
                        Ok(v)
                    } else {
                        Err(format!("'{s}' is not a valid size"))
                    }
                })
        })?;

        let mut characteristics = std::collections::BTreeSet::new();
        for (i, tag) in self.characteristics.iter().enumerate() {
            let tag = tag.trim();
            if tag.is_empty() {
                continue;
            }
            if TumorCharacteristic::from_tag(tag).is_none() {
                return Err(WireError::field(
                    format!("tnm.characteristics.{i}"),
                    format!("unknown characteristic '{tag}'"),
                ));
            }
            characteristics.insert(tag.to_owned());
        }

        Ok(TnmInputs {
            tumor_size_cm,
            characteristics,
            nodes: parse_optional("tnm.nodes", &self.nodes, NCategory::from_str)?,
            metastasis: parse_optional("tnm.metastasis", &self.metastasis, MCategory::from_str)?,
        })
    }
}

fn parse_optional<T, E, F>(field: &str, raw: &str, parse: F) -> WireResult<Option<T>>
where
    F: FnOnce(&str) -> Result<T, E>,
    E: fmt::Display,
{
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse(trimmed)
        .map(Some)
        .map_err(|e| WireError::field(field, e))
}

/// Translates raw `(item key, answer)` pairs into G8 answers.
///
/// Unknown item keys are rejected; answer values are kept verbatim. A repeated key keeps the
/// last answer.
pub fn parse_g8_answers(
    raw: impl IntoIterator<Item = (String, String)>,
) -> WireResult<G8Answers> {
    raw.into_iter()
        .map(|(key, value)| {
            G8Question::from_str(&key)
                .map(|q| (q, value))
                .map_err(|e| WireError::field(format!("g8_answers.{key}"), e))
        })
        .collect()
}

// ============================================================================
// Lenient scalar deserialisation (internal)
// ============================================================================

struct TextVisitor;

impl<'de> Visitor<'de> for TextVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, a number or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_owned())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_unit<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }
}

struct Text(String);

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TextVisitor).map(Text)
    }
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Text::deserialize(deserializer).map(|t| t.0)
}

fn text_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error> {
    let raw = BTreeMap::<String, Text>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(k, Text(v))| (k, v)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sclc_core::{Frailty, StageOutcome};

    fn form() -> FormRecord {
        FormRecord {
            age: "75".into(),
            performance_status: "1".into(),
            treatment_history: "naive".into(),
            g8_score: "12,5".into(),
            ..FormRecord::default()
        }
    }

    #[test]
    fn blank_form_is_an_empty_record() {
        let record = FormRecord::default().into_record().expect("blank form");
        assert_eq!(record, PatientRecord::new());
    }

    #[test]
    fn parses_scalars_and_trims_whitespace() {
        let mut form = form();
        form.overall_stage = " I-III ".into();
        let record = form.into_record().expect("valid form");

        assert_eq!(record.age, Some(75));
        assert_eq!(record.performance_status.map(|p| p.grade()), Some(1));
        assert_eq!(record.overall_stage, Some(OverallStage::Limited));
        assert_eq!(record.treatment_history, Some(TreatmentHistory::Naive));
        assert_eq!(record.frailty(), Frailty::Known(12.5));
        assert!(record.tnm_result.is_none());
    }

    #[test]
    fn names_the_invalid_field() {
        let mut form = form();
        form.performance_status = "5".into();
        let err = form.into_record().expect_err("PS out of range");
        assert!(matches!(err, WireError::InvalidField { ref field, .. } if field == "performance_status"));

        let mut form = FormRecord::default();
        form.age = "seventy".into();
        let err = form.into_record().expect_err("age not a number");
        assert!(matches!(err, WireError::InvalidField { ref field, .. } if field == "age"));
    }

    #[test]
    fn rejects_unknown_g8_item() {
        let mut form = FormRecord::default();
        form.g8_answers.insert("appetit".into(), "2".into());
        let err = form.into_record().expect_err("unknown item");
        assert!(err.to_string().contains("g8_answers.appetit"));
    }

    #[test]
    fn keeps_non_numeric_g8_answers_verbatim() {
        let mut form = FormRecord::default();
        form.g8_answers.insert("appetite".into(), "2".into());
        form.g8_answers.insert("bmi".into(), "unknown".into());
        let record = form.into_record().expect("answers are free text");
        assert_eq!(record.g8_answers.get(G8Question::Bmi), Some("unknown"));
        assert_eq!(record.frailty(), Frailty::Known(2.0));
    }

    #[test]
    fn tnm_inputs_are_classified_and_applied() {
        let mut form = FormRecord::default();
        form.overall_stage = "limited".into();
        form.tnm = FormTnm {
            tumor_size_cm: "2,5".into(),
            characteristics: vec!["visceral-pleura-involvement".into()],
            nodes: "N1".into(),
            metastasis: "M1b".into(),
        };
        let record = form.into_record().expect("valid TNM");
        let result = record.tnm_result.expect("classified");
        assert_eq!(result.stage.label(), "IV A");
        assert_eq!(record.overall_stage, Some(OverallStage::Metastatic));
    }

    #[test]
    fn incomplete_tnm_is_still_recorded() {
        let mut form = FormRecord::default();
        form.tnm.nodes = "N0".into();
        let record = form.into_record().expect("valid partial TNM");
        assert_eq!(
            record.tnm_result.map(|r| r.stage),
            Some(StageOutcome::Incomplete)
        );
    }

    #[test]
    fn rejects_unknown_characteristic_and_bad_size() {
        let mut form = FormRecord::default();
        form.tnm.characteristics = vec!["carina".into()];
        let err = form.into_record().expect_err("unknown tag");
        assert!(err.to_string().contains("tnm.characteristics.0"));

        let mut form = FormRecord::default();
        form.tnm.tumor_size_cm = "-3".into();
        let err = form.into_record().expect_err("negative size");
        assert!(matches!(err, WireError::InvalidField { ref field, .. } if field == "tnm.tumor_size_cm"));
    }

    #[test]
    fn numbers_are_accepted_where_text_is_expected() {
        let form: FormRecord = serde_json::from_str(
            r#"{"age": 81, "performance_status": 2, "g8_score": null,
                "g8_answers": {"health-comparison": 0.5, "age": "0"},
                "tnm": {"tumor_size_cm": 3.2}}"#,
        )
        .expect("lenient scalars");
        assert_eq!(form.age, "81");
        assert_eq!(form.performance_status, "2");
        assert_eq!(form.g8_score, "");
        assert_eq!(form.g8_answers["health-comparison"], "0.5");
        assert_eq!(form.tnm.tumor_size_cm, "3.2");
    }
}
