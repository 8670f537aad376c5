//! Stage IV treatment block.
//!
//! First line applies when the patient is treatment-naive (by history or by response status);
//! every other metastatic patient gets the second-line block.

use super::{Rule, RuleContext};
use crate::constants::{GERIATRIC_AGE, METASTATIC_MAX_PS};
use crate::recommendation::Recommendation;
use crate::record::{OverallStage, ResponseStatus};

pub(super) const PRINCIPLES_CATEGORY: &str = "Stage IV (metastatic) SCLC - principles";
pub(super) const FIRST_LINE_CATEGORY: &str = "First-line treatment (stage IV)";
pub(super) const REGIMEN_CATEGORY: &str = "Chemo-immunotherapy regimens (first line)";
pub(super) const ADAPTATION_CATEGORY: &str = "Contraindication/adaptation (first line)";
pub(super) const SECOND_LINE_CATEGORY: &str = "Second line and beyond (stage IV)";
pub(super) const SENSITIVE_CATEGORY: &str = "Second line (sensitive/highly sensitive patient)";
pub(super) const RESISTANT_CATEGORY: &str = "Second line (resistant/refractory patient)";
pub(super) const SALVAGE_CATEGORY: &str = "Lurbinectedin option (second line and beyond)";

fn is_metastatic(ctx: &RuleContext<'_>) -> bool {
    ctx.stage == Some(OverallStage::Metastatic)
}

fn first_line(ctx: &RuleContext<'_>) -> bool {
    is_metastatic(ctx) && ctx.is_first_line()
}

fn second_line(ctx: &RuleContext<'_>) -> bool {
    is_metastatic(ctx) && !ctx.is_first_line()
}

fn response_is(ctx: &RuleContext<'_>, statuses: &[ResponseStatus]) -> bool {
    ctx.record
        .response_status
        .is_some_and(|s| statuses.contains(&s))
}

pub(super) const RULES: &[Rule] = &[
    Rule {
        name: "metastatic-principles",
        applies: is_metastatic,
        produce: |_| {
            Recommendation::info(
                PRINCIPLES_CATEGORY,
                "The main goal is palliative: disease control, symptom relief and quality of \
                 life. Enrolment in clinical trials should be encouraged.",
            )
        },
    },
    Rule {
        name: "metastatic-first-line",
        applies: first_line,
        produce: first_line_standard,
    },
    Rule {
        name: "metastatic-first-line-regimen",
        applies: first_line,
        produce: |_| {
            Recommendation::info(
                REGIMEN_CATEGORY,
                "E.g. carboplatin AUC 5 D1 + etoposide 100 mg/m² D1-D3 + atezolizumab 1200 mg IV \
                 (or 1875 mg SC) D1, every 3 weeks for 4 cycles, then atezolizumab maintenance. A \
                 durvalumab-based alternative is available.",
            )
        },
    },
    Rule {
        name: "metastatic-first-line-adaptation",
        applies: |ctx| {
            first_line(ctx)
                && (ctx.ps_above(METASTATIC_MAX_PS)
                    || (!ctx.frailty_acceptable() && ctx.age_at_least(GERIATRIC_AGE)))
        },
        produce: |_| {
            Recommendation::warning(
                ADAPTATION_CATEGORY,
                "If PS > 2, frail patient (G8 ≤ 14 and age ≥ 70) or contraindication to \
                 immunotherapy: chemotherapy alone (cisplatin/carboplatin + etoposide, 4-6 \
                 cycles), single-agent therapy (oral etoposide, weekly carboplatin) or best \
                 supportive care. Discuss at the multidisciplinary tumour board.",
            )
        },
    },
    Rule {
        name: "metastatic-second-line",
        applies: second_line,
        produce: |ctx| {
            let status = ctx
                .record
                .response_status
                .map_or("not specified", ResponseStatus::as_str);
            Recommendation::info(
                SECOND_LINE_CATEGORY,
                format!(
                    "The choice depends on sensitivity to first-line chemotherapy \
                     (treatment-free interval). Patient response status: {status}."
                ),
            )
        },
    },
    Rule {
        name: "metastatic-second-line-sensitive",
        applies: |ctx| {
            second_line(ctx)
                && response_is(
                    ctx,
                    &[ResponseStatus::HighlySensitive, ResponseStatus::Sensitive],
                )
        },
        produce: |_| {
            Recommendation::success(
                SENSITIVE_CATEGORY,
                "Re-challenge with the first-line chemotherapy (platinum + etoposide) if the \
                 treatment-free interval exceeds 3-6 months. IV or oral topotecan is a validated \
                 option.",
            )
        },
    },
    Rule {
        name: "metastatic-second-line-resistant",
        applies: |ctx| {
            second_line(ctx)
                && response_is(ctx, &[ResponseStatus::Resistant, ResponseStatus::Refractory])
        },
        produce: |_| {
            Recommendation::warning(
                RESISTANT_CATEGORY,
                "Limited options: topotecan, lurbinectedin (if available through early access), \
                 CAV (cyclophosphamide, doxorubicin, vincristine). Clinical trials should be \
                 preferred. Optimised supportive care.",
            )
        },
    },
    Rule {
        name: "metastatic-second-line-lurbinectedin",
        applies: second_line,
        produce: |_| {
            Recommendation::info(
                SALVAGE_CATEGORY,
                "Lurbinectedin (3.2 mg/m² IV every 3 weeks) is an option after failure of a \
                 platinum-based first line (compassionate or early access depending on \
                 country).",
            )
        },
    },
];

fn first_line_standard(ctx: &RuleContext<'_>) -> Recommendation {
    let qualifier = match (ctx.age_at_least(GERIATRIC_AGE), ctx.frailty_acceptable()) {
        (true, true) => ", G8 > 14",
        (true, false) => ", G8 ≤ 14",
        (false, _) => "",
    };
    Recommendation::success(
        FIRST_LINE_CATEGORY,
        format!(
            "STANDARD (PS 0-2{qualifier}): platinum-based chemotherapy (cisplatin or carboplatin) \
             + etoposide (D1-D3) + immunotherapy (atezolizumab or durvalumab) for 4 cycles, \
             followed by immunotherapy maintenance alone."
        ),
    )
}
