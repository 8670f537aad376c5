//! Geriatric assessment block, emitted only for patients aged 70 and over.

use sclc_types::{format_points, G8_MAX_POINTS};

use super::{Rule, RuleContext};
use crate::frailty::is_frail;
use crate::recommendation::Recommendation;
use crate::record::Frailty;

pub(super) const CATEGORY: &str = "Geriatric assessment (G8 score)";

pub(super) const RULES: &[Rule] = &[
    Rule {
        name: "geriatric-frail",
        applies: |ctx| ctx.is_geriatric() && ctx.frailty.score().is_some_and(is_frail),
        produce: frail,
    },
    Rule {
        name: "geriatric-fit",
        applies: |ctx| ctx.is_geriatric() && ctx.frailty.score().is_some_and(|s| !is_frail(s)),
        produce: fit,
    },
    Rule {
        name: "geriatric-unscored",
        applies: |ctx| ctx.is_geriatric() && ctx.frailty == Frailty::Unknown,
        produce: |_| {
            Recommendation::info(
                CATEGORY,
                "G8 score not calculated. For patients aged 70 and over, the G8 score is strongly \
                 recommended to assess frailty.",
            )
        },
    },
];

fn score_text(ctx: &RuleContext<'_>) -> String {
    format!(
        "{}/{}",
        format_points(ctx.frailty.score().unwrap_or_default()),
        format_points(G8_MAX_POINTS)
    )
}

fn frail(ctx: &RuleContext<'_>) -> Recommendation {
    Recommendation::warning(
        CATEGORY,
        format!(
            "G8 score = {} (≤14): frail or at-risk patient. A comprehensive geriatric assessment \
             is MANDATORY before starting any anticancer treatment.",
            score_text(ctx)
        ),
    )
}

fn fit(ctx: &RuleContext<'_>) -> Recommendation {
    Recommendation::success(
        CATEGORY,
        format!(
            "G8 score = {} (>14): no geriatric frailty signal. Standard treatment may be \
             considered, subject to other comorbidities and performance status.",
            score_text(ctx)
        ),
    )
}
