use super::Rule;
use crate::recommendation::Recommendation;
use crate::record::OverallStage;

pub(super) const STANDARD_CATEGORY: &str = "Standard staging workup";
pub(super) const COMPLEMENTARY_CATEGORY: &str = "Complementary workup (limited stage)";

pub(super) const RULES: &[Rule] = &[
    Rule {
        name: "standard-workup",
        applies: |_| true,
        produce: |_| {
            Recommendation::info(
                STANDARD_CATEGORY,
                "Baseline workup: complete clinical examination, laboratory tests (full blood \
                 count, platelets, electrolytes with calcium, creatinine, complete liver panel, \
                 LDH). Bronchoscopy with biopsies. Imaging: contrast-enhanced chest-abdomen-pelvis \
                 CT. Brain imaging (MRI or contrast-enhanced CT).",
            )
        },
    },
    Rule {
        name: "limited-complementary-workup",
        applies: |ctx| {
            ctx.stage == Some(OverallStage::Limited) && !ctx.record.extension_workup_done
        },
        produce: |_| {
            Recommendation::warning(
                COMPLEMENTARY_CATEGORY,
                "For limited-stage (I-III) SCLC considered for curative treatment: 18F-FDG \
                 PET-CT and brain MRI are recommended to refine staging and guide the treatment \
                 strategy.",
            )
        },
    },
];
