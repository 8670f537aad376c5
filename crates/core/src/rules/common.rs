use super::{Rule, RuleContext};
use crate::recommendation::Recommendation;

pub(super) const UNSTAGED_CATEGORY: &str = "Stage undefined or incomplete";
pub(super) const EGFR_CATEGORY: &str = "Special case: SCLC transformation of EGFR-mutant NSCLC";
pub(super) const BRAIN_METASTASES_CATEGORY: &str = "Brain metastases management";
pub(super) const SUPPORTIVE_CARE_CATEGORY: &str = "Essential supportive care";
pub(super) const SURVEILLANCE_CATEGORY: &str = "Post-treatment surveillance";

pub(super) const RULES: &[Rule] = &[
    Rule {
        name: "stage-missing",
        applies: |ctx| ctx.stage.is_none(),
        produce: unstaged,
    },
    Rule {
        name: "egfr-transformation",
        applies: |ctx| ctx.record.egfr_mutation,
        produce: |_| {
            Recommendation::warning(
                EGFR_CATEGORY,
                "For EGFR-mutant NSCLC transformed into SCLC: SCLC-type chemotherapy (platinum + \
                 etoposide). The role of immunotherapy is debated (tumour board). Continuing the \
                 EGFR tyrosine kinase inhibitor may be discussed if an NSCLC component persists \
                 or the EGFR mutation is still present. Look for clinical trials.",
            )
        },
    },
    Rule {
        name: "brain-metastases",
        applies: |ctx| ctx.record.brain_metastases,
        produce: |_| {
            Recommendation::info(
                BRAIN_METASTASES_CATEGORY,
                "Brain radiotherapy (whole-brain or stereotactic depending on number and size of \
                 lesions) and corticosteroids. Systemic treatment should also be chosen for good \
                 brain penetration where possible.",
            )
        },
    },
    Rule {
        name: "supportive-care",
        applies: |_| true,
        produce: |_| {
            Recommendation::info(
                SUPPORTIVE_CARE_CATEGORY,
                "Symptom management, nutritional support, psychosocial care, G-CSF prophylaxis \
                 (secondary after febrile neutropenia, primary if high risk). Smoking cessation \
                 support is MANDATORY.",
            )
        },
    },
    Rule {
        name: "surveillance",
        applies: |_| true,
        produce: |_| {
            Recommendation::info(
                SURVEILLANCE_CATEGORY,
                "Schedule adapted to the clinical situation and stage. Typically: \
                 chest-abdomen-pelvis CT +/- brain imaging every 3-4 months for the first 2-3 \
                 years, then progressively less often. Beware of second cancers (lung, head and \
                 neck).",
            )
        },
    },
];

/// Names the stage the host currently holds, if any, so the user knows what to fix.
fn unstaged(ctx: &RuleContext<'_>) -> Recommendation {
    let current = ctx
        .record
        .tnm_result
        .map(|r| r.stage.label())
        .filter(|label| !label.is_empty())
        .unwrap_or("not provided");
    Recommendation::warning(
        UNSTAGED_CATEGORY,
        format!(
            "The patient's stage (currently \"{current}\") is not clearly defined as limited \
             (I-III) or metastatic (IV). Please complete or verify the staging information to \
             obtain precise recommendations."
        ),
    )
}
