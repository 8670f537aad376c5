//! Stage I-III treatment block (curative intent).

use super::{Rule, RuleContext};
use crate::constants::{ADVANCED_AGE, CURATIVE_MAX_PS, GERIATRIC_AGE};
use crate::recommendation::Recommendation;
use crate::record::OverallStage;

pub(super) const PRINCIPLES_CATEGORY: &str = "Limited-stage (I-III) SCLC - principles";
pub(super) const REGIMEN_CATEGORY: &str = "Concurrent chemoradiotherapy schedule (limited stage)";
pub(super) const ADJUVANT_CATEGORY: &str = "Adjuvant immunotherapy (limited stage)";
pub(super) const ADAPTATION_CATEGORY: &str =
    "Adaptation (limited stage - frail/PS ≥ 2/elderly patient)";
pub(super) const PCI_CATEGORY: &str =
    "Prophylactic cranial irradiation (PCI) - option (limited stage)";

const STANDARD_CATEGORY: &str = "Standard treatment (limited stage, PS 0-1";

fn is_limited(ctx: &RuleContext<'_>) -> bool {
    ctx.stage == Some(OverallStage::Limited)
}

/// PS known and at most 1, and G8 does not argue against standard treatment.
fn fit_for_concurrent_chemoradiation(ctx: &RuleContext<'_>) -> bool {
    ctx.ps_known_at_most(CURATIVE_MAX_PS) && ctx.frailty_acceptable()
}

pub(super) const RULES: &[Rule] = &[
    Rule {
        name: "limited-principles",
        applies: is_limited,
        produce: |_| {
            Recommendation::info(
                PRINCIPLES_CATEGORY,
                "The goal is curative. Concurrent chemoradiotherapy is the standard for patients \
                 in good general condition (PS 0-1).",
            )
        },
    },
    Rule {
        name: "limited-standard",
        applies: is_limited,
        produce: |ctx| {
            let qualifier =
                if ctx.age_at_least(GERIATRIC_AGE) && fit_for_concurrent_chemoradiation(ctx) {
                    ", G8 > 14"
                } else {
                    ""
                };
            Recommendation::success(
                format!("{STANDARD_CATEGORY}{qualifier})"),
                "Concurrent chemoradiotherapy followed by adjuvant durvalumab immunotherapy for \
                 1 year.",
            )
        },
    },
    Rule {
        name: "limited-regimen",
        applies: is_limited,
        produce: |_| {
            Recommendation::info(
                REGIMEN_CATEGORY,
                "Chemotherapy: cisplatin + etoposide (4 cycles). Thoracic radiotherapy: typically \
                 45 Gy in 30 fractions (twice daily) or 60-66 Gy in 30-33 fractions (once daily), \
                 ideally starting with the 1st or 2nd chemotherapy cycle.",
            )
        },
    },
    Rule {
        name: "limited-adjuvant-durvalumab",
        applies: is_limited,
        produce: |_| {
            Recommendation::success(
                ADJUVANT_CATEGORY,
                "Durvalumab: 10 mg/kg IV every 2 weeks or 1500 mg IV every 4 weeks for 12 months, \
                 starting within 42 days after chemoradiotherapy in the absence of progression.",
            )
        },
    },
    Rule {
        name: "limited-adaptation",
        applies: |ctx| {
            is_limited(ctx)
                && (!fit_for_concurrent_chemoradiation(ctx)
                    || ctx.ps_above(CURATIVE_MAX_PS)
                    || ctx.age_at_least(ADVANCED_AGE))
        },
        produce: |_| {
            Recommendation::warning(
                ADAPTATION_CATEGORY,
                "In elderly (≥ 75 years) or frail (G8 ≤ 14 and age ≥ 70) patients, or PS ≥ 2: \
                 sequential chemoradiotherapy (chemotherapy then radiotherapy) or radiotherapy \
                 alone may be discussed. Adjuvant immunotherapy is less established in this \
                 setting. Decision at the multidisciplinary tumour board.",
            )
        },
    },
    Rule {
        name: "limited-pci",
        // missing PS or age does not block the option
        applies: |ctx| {
            is_limited(ctx) && !ctx.ps_above(CURATIVE_MAX_PS) && ctx.age_below(GERIATRIC_AGE)
        },
        produce: |_| {
            Recommendation::info(
                PCI_CATEGORY,
                "PCI to be discussed for patients with a good response after chemoradiotherapy \
                 (PS 0-1, age < 70): 25 Gy in 10 fractions. Reduces the risk of brain metastases; \
                 weigh the impact on quality of life. Case-by-case decision.",
            )
        },
    },
];

#[cfg(test)]
mod tests {
    use super::super::tests::{categories, g8, ps, record};
    use super::*;
    use crate::recommendation::Severity;
    use crate::record::PatientRecord;
    use crate::rules::generate_recommendations;

    fn limited(age: Option<u32>, grade: Option<u8>) -> PatientRecord {
        let mut rec = record();
        rec.overall_stage = Some(OverallStage::Limited);
        rec.extension_workup_done = true;
        rec.age = age;
        rec.performance_status = grade.and_then(ps);
        rec
    }

    fn standard(recs: &[Recommendation]) -> &Recommendation {
        recs.iter()
            .find(|r| r.category.starts_with(STANDARD_CATEGORY))
            .expect("standard limited-stage block")
    }

    #[test]
    fn fit_young_patient_gets_full_curative_block() {
        let recs = generate_recommendations(&limited(Some(60), Some(0)));
        let cats = categories(&recs);

        let principles = cats.iter().position(|c| *c == PRINCIPLES_CATEGORY).unwrap();
        let regimen = cats.iter().position(|c| *c == REGIMEN_CATEGORY).unwrap();
        let adjuvant = cats.iter().position(|c| *c == ADJUVANT_CATEGORY).unwrap();
        let pci = cats.iter().position(|c| *c == PCI_CATEGORY).unwrap();
        assert!(principles < regimen && regimen < adjuvant && adjuvant < pci);
        assert!(!cats.contains(&ADAPTATION_CATEGORY));

        let std = standard(&recs);
        assert_eq!(std.severity, Severity::Success);
        assert_eq!(std.category, "Standard treatment (limited stage, PS 0-1)");
        assert_eq!(recs[adjuvant].severity, Severity::Success);
    }

    #[test]
    fn fit_elderly_patient_has_g8_qualifier_and_no_pci() {
        let mut rec = limited(Some(72), Some(1));
        rec.g8_score = g8(15.0);
        let recs = generate_recommendations(&rec);

        assert_eq!(
            standard(&recs).category,
            "Standard treatment (limited stage, PS 0-1, G8 > 14)"
        );
        let cats = categories(&recs);
        assert!(!cats.contains(&ADAPTATION_CATEGORY));
        assert!(!cats.contains(&PCI_CATEGORY));
    }

    #[test]
    fn advanced_age_is_adapted_even_when_fit() {
        let mut rec = limited(Some(76), Some(0));
        rec.g8_score = g8(16.0);
        let recs = generate_recommendations(&rec);
        assert!(categories(&recs).contains(&ADAPTATION_CATEGORY));
    }

    #[test]
    fn age_seventy_five_is_adapted() {
        let mut rec = limited(Some(75), Some(0));
        rec.g8_score = g8(16.0);
        let recs = generate_recommendations(&rec);
        let cats = categories(&recs);
        assert!(cats.contains(&ADAPTATION_CATEGORY));
        assert_eq!(
            standard(&recs).category,
            "Standard treatment (limited stage, PS 0-1, G8 > 14)"
        );

        let mut younger = limited(Some(74), Some(0));
        younger.g8_score = g8(16.0);
        assert!(!categories(&generate_recommendations(&younger)).contains(&ADAPTATION_CATEGORY));
    }

    #[test]
    fn frail_elderly_patient_is_adapted() {
        let mut rec = limited(Some(71), Some(0));
        rec.g8_score = g8(11.0);
        let recs = generate_recommendations(&rec);
        assert!(categories(&recs).contains(&ADAPTATION_CATEGORY));
        assert_eq!(
            standard(&recs).category,
            "Standard treatment (limited stage, PS 0-1)"
        );
    }

    #[test]
    fn poor_performance_status_is_adapted_without_pci() {
        let recs = generate_recommendations(&limited(Some(60), Some(2)));
        let cats = categories(&recs);
        assert!(cats.contains(&ADAPTATION_CATEGORY));
        assert!(!cats.contains(&PCI_CATEGORY));
    }

    #[test]
    fn missing_performance_status_counts_as_unfit_but_keeps_pci() {
        let recs = generate_recommendations(&limited(Some(60), None));
        let cats = categories(&recs);
        assert!(cats.contains(&ADAPTATION_CATEGORY));
        assert!(cats.contains(&PCI_CATEGORY));
    }

    #[test]
    fn missing_age_keeps_pci() {
        let recs = generate_recommendations(&limited(None, Some(1)));
        let cats = categories(&recs);
        assert!(cats.contains(&PCI_CATEGORY));
        assert!(!cats.contains(&ADAPTATION_CATEGORY));
    }
}
