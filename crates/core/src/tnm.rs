//! TNM (8th edition) stage classification.
//!
//! Reduces the tumour size, tumour characteristics, nodal category and metastasis category to a
//! canonical T/N/M triple and an overall stage group.
//!
//! Classification is total: unresolved inputs degrade to the `Tx`/`Nx`/`Mx` sentinels and an
//! [`StageOutcome::Incomplete`] stage rather than failing.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::INCOMPLETE_STAGE_LABEL;
use crate::{CoreError, CoreResult};

// ============================================================================
// Categories
// ============================================================================

/// Primary tumour category.
///
/// `T2` without a sub-category is produced when bronchus or visceral pleura involvement raises a
/// smaller tumour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TCategory {
    Tx,
    T1a,
    T1b,
    T1c,
    T2,
    T2a,
    T2b,
    T3,
    T4,
}

impl TCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            TCategory::Tx => "Tx",
            TCategory::T1a => "T1a",
            TCategory::T1b => "T1b",
            TCategory::T1c => "T1c",
            TCategory::T2 => "T2",
            TCategory::T2a => "T2a",
            TCategory::T2b => "T2b",
            TCategory::T3 => "T3",
            TCategory::T4 => "T4",
        }
    }

    /// Size-based category for the greatest tumour dimension in centimetres.
    pub fn from_size_cm(size: f64) -> Self {
        if size <= 1.0 {
            TCategory::T1a
        } else if size <= 2.0 {
            TCategory::T1b
        } else if size <= 3.0 {
            TCategory::T1c
        } else if size <= 4.0 {
            TCategory::T2a
        } else if size <= 5.0 {
            TCategory::T2b
        } else if size <= 7.0 {
            TCategory::T3
        } else {
            TCategory::T4
        }
    }

    fn is_t1_or_t2(self) -> bool {
        matches!(
            self,
            TCategory::T1a
                | TCategory::T1b
                | TCategory::T1c
                | TCategory::T2
                | TCategory::T2a
                | TCategory::T2b
        )
    }
}

/// Regional lymph node category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NCategory {
    Nx,
    N0,
    N1,
    N2,
    N3,
}

impl NCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            NCategory::Nx => "Nx",
            NCategory::N0 => "N0",
            NCategory::N1 => "N1",
            NCategory::N2 => "N2",
            NCategory::N3 => "N3",
        }
    }
}

impl FromStr for NCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim() {
            "Nx" | "NX" => Ok(NCategory::Nx),
            "N0" => Ok(NCategory::N0),
            "N1" => Ok(NCategory::N1),
            "N2" => Ok(NCategory::N2),
            "N3" => Ok(NCategory::N3),
            other => Err(CoreError::InvalidInput(format!(
                "unknown nodal category '{other}'"
            ))),
        }
    }
}

/// Distant metastasis category.
///
/// `M1` is an unspecified distant metastasis; it still stages as IV.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MCategory {
    Mx,
    M0,
    M1,
    M1a,
    M1b,
    M1c,
}

impl MCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            MCategory::Mx => "Mx",
            MCategory::M0 => "M0",
            MCategory::M1 => "M1",
            MCategory::M1a => "M1a",
            MCategory::M1b => "M1b",
            MCategory::M1c => "M1c",
        }
    }

    fn is_m1(self) -> bool {
        matches!(
            self,
            MCategory::M1 | MCategory::M1a | MCategory::M1b | MCategory::M1c
        )
    }
}

impl FromStr for MCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim() {
            "Mx" | "MX" => Ok(MCategory::Mx),
            "M0" => Ok(MCategory::M0),
            "M1" => Ok(MCategory::M1),
            "M1a" => Ok(MCategory::M1a),
            "M1b" => Ok(MCategory::M1b),
            "M1c" => Ok(MCategory::M1c),
            other => Err(CoreError::InvalidInput(format!(
                "unknown metastasis category '{other}'"
            ))),
        }
    }
}

macro_rules! impl_display_as_str {
    ($($ty:ty),*) => {
        $(impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

impl_display_as_str!(TCategory, NCategory, MCategory);

/// Additional tumour findings that escalate the T category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TumorCharacteristic {
    MainBronchusInvolvement,
    VisceralPleuraInvolvement,
    ChestWallInvolvement,
    MediastinalInvolvement,
    SameLobeNodules,
    OtherLobeSameLungNodules,
}

impl TumorCharacteristic {
    pub const ALL: [TumorCharacteristic; 6] = [
        TumorCharacteristic::MainBronchusInvolvement,
        TumorCharacteristic::VisceralPleuraInvolvement,
        TumorCharacteristic::ChestWallInvolvement,
        TumorCharacteristic::MediastinalInvolvement,
        TumorCharacteristic::SameLobeNodules,
        TumorCharacteristic::OtherLobeSameLungNodules,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            TumorCharacteristic::MainBronchusInvolvement => "main-bronchus-involvement",
            TumorCharacteristic::VisceralPleuraInvolvement => "visceral-pleura-involvement",
            TumorCharacteristic::ChestWallInvolvement => "chest-wall-involvement",
            TumorCharacteristic::MediastinalInvolvement => "mediastinal-involvement",
            TumorCharacteristic::SameLobeNodules => "same-lobe-nodules",
            TumorCharacteristic::OtherLobeSameLungNodules => "other-lobe-same-lung-nodules",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TumorCharacteristic::MainBronchusInvolvement => {
                "Main bronchus involvement (without carina)"
            }
            TumorCharacteristic::VisceralPleuraInvolvement => "Visceral pleura involvement",
            TumorCharacteristic::ChestWallInvolvement => "Chest wall involvement",
            TumorCharacteristic::MediastinalInvolvement => "Mediastinal involvement",
            TumorCharacteristic::SameLobeNodules => "Separate nodules in the same lobe",
            TumorCharacteristic::OtherLobeSameLungNodules => {
                "Separate nodules in another lobe of the same lung"
            }
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL.into_iter().find(|c| c.tag() == tag)
    }
}

// ============================================================================
// Stage groups
// ============================================================================

/// Overall stage group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    IA,
    IB,
    IIA,
    IIB,
    IIIA,
    IIIB,
    IIIC,
    IV,
    IVA,
    IVB,
}

impl Stage {
    const ALL: [Stage; 10] = [
        Stage::IA,
        Stage::IB,
        Stage::IIA,
        Stage::IIB,
        Stage::IIIA,
        Stage::IIIB,
        Stage::IIIC,
        Stage::IV,
        Stage::IVA,
        Stage::IVB,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stage::IA => "I A",
            Stage::IB => "I B",
            Stage::IIA => "II A",
            Stage::IIB => "II B",
            Stage::IIIA => "III A",
            Stage::IIIB => "III B",
            Stage::IIIC => "III C",
            Stage::IV => "IV",
            Stage::IVA => "IV A",
            Stage::IVB => "IV B",
        }
    }

    /// Stage IV of any sub-group, i.e. every label containing "IV".
    pub fn is_metastatic(self) -> bool {
        self.label().contains("IV")
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of the stage lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutcome {
    /// A valid stage group.
    Staged(Stage),
    /// T, N or M is unresolved and no stage could be derived.
    Incomplete,
    /// All categories are resolved but the table has no entry for the combination.
    Unassigned,
}

impl StageOutcome {
    pub fn stage(self) -> Option<Stage> {
        match self {
            StageOutcome::Staged(stage) => Some(stage),
            StageOutcome::Incomplete | StageOutcome::Unassigned => None,
        }
    }

    /// Display label; empty for [`StageOutcome::Unassigned`].
    pub fn label(self) -> &'static str {
        match self {
            StageOutcome::Staged(stage) => stage.label(),
            StageOutcome::Incomplete => INCOMPLETE_STAGE_LABEL,
            StageOutcome::Unassigned => "",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "" => Some(StageOutcome::Unassigned),
            INCOMPLETE_STAGE_LABEL => Some(StageOutcome::Incomplete),
            other => Stage::from_label(other).map(StageOutcome::Staged),
        }
    }
}

impl std::fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for StageOutcome {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for StageOutcome {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        StageOutcome::from_label(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown stage '{s}'")))
    }
}

// ============================================================================
// Inputs and result
// ============================================================================

/// Raw staging inputs collected by the host.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TnmInputs {
    /// Greatest tumour dimension in centimetres.
    pub tumor_size_cm: Option<f64>,
    /// Characteristic tags; unknown tags are ignored.
    #[serde(default)]
    pub characteristics: BTreeSet<String>,
    pub nodes: Option<NCategory>,
    pub metastasis: Option<MCategory>,
}

impl TnmInputs {
    /// True when at least one staging input has been supplied.
    pub fn has_any_input(&self) -> bool {
        self.tumor_size_cm.is_some()
            || !self.characteristics.is_empty()
            || self.nodes.is_some()
            || self.metastasis.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TnmResult {
    pub t: TCategory,
    pub n: NCategory,
    pub m: MCategory,
    pub stage: StageOutcome,
}

impl TnmResult {
    /// True when the stage is a valid stage group.
    pub fn is_complete(&self) -> bool {
        self.stage.stage().is_some()
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Classifies staging inputs into T/N/M categories and a stage group.
pub fn classify_tnm(inputs: &TnmInputs) -> TnmResult {
    let t = tumour_category(inputs.tumor_size_cm, &inputs.characteristics);
    let n = inputs.nodes.unwrap_or(NCategory::Nx);
    let m = inputs.metastasis.unwrap_or(MCategory::Mx);

    // Unresolved T or N is incomplete even under M1; Mx only when no stage can be derived.
    let stage = if t == TCategory::Tx || n == NCategory::Nx {
        StageOutcome::Incomplete
    } else {
        match stage_group(t, n, m) {
            Some(stage) => StageOutcome::Staged(stage),
            None if m == MCategory::Mx => StageOutcome::Incomplete,
            None => StageOutcome::Unassigned,
        }
    };

    TnmResult { t, n, m, stage }
}

/// Bronchus and visceral pleura involvement only lift T1 tumours to `T2`; larger tumours keep
/// their size category instead of being overwritten with plain `T2`.
fn tumour_category(size_cm: Option<f64>, tags: &BTreeSet<String>) -> TCategory {
    let Some(size) = size_cm.filter(|s| s.is_finite()) else {
        return TCategory::Tx;
    };
    let mut t = TCategory::from_size_cm(size);

    let present: BTreeSet<TumorCharacteristic> = tags
        .iter()
        .filter_map(|tag| TumorCharacteristic::from_tag(tag))
        .collect();
    let has = |c: TumorCharacteristic| present.contains(&c);

    // Order matters: each step may overwrite the previous one.
    if (has(TumorCharacteristic::MainBronchusInvolvement)
        || has(TumorCharacteristic::VisceralPleuraInvolvement))
        && matches!(t, TCategory::T1a | TCategory::T1b | TCategory::T1c)
    {
        t = TCategory::T2;
    }
    if has(TumorCharacteristic::ChestWallInvolvement)
        || has(TumorCharacteristic::SameLobeNodules)
    {
        t = TCategory::T3;
    }
    if has(TumorCharacteristic::MediastinalInvolvement)
        || has(TumorCharacteristic::OtherLobeSameLungNodules)
    {
        t = TCategory::T4;
    }

    t
}

fn stage_group(t: TCategory, n: NCategory, m: MCategory) -> Option<Stage> {
    use TCategory::*;

    if m.is_m1() {
        return Some(match m {
            MCategory::M1a | MCategory::M1b => Stage::IVA,
            MCategory::M1c => Stage::IVB,
            _ => Stage::IV,
        });
    }
    if m != MCategory::M0 {
        return None;
    }

    match n {
        NCategory::N0 => match t {
            T1a | T1b | T1c => Some(Stage::IA),
            T2a => Some(Stage::IB),
            T2b => Some(Stage::IIA),
            T3 => Some(Stage::IIB),
            T4 => Some(Stage::IIIA),
            Tx | T2 => None,
        },
        NCategory::N1 => match t {
            t if t.is_t1_or_t2() => Some(Stage::IIB),
            T3 => Some(Stage::IIIA),
            T4 => Some(Stage::IIIB),
            _ => None,
        },
        NCategory::N2 => match t {
            t if t.is_t1_or_t2() => Some(Stage::IIIA),
            T3 | T4 => Some(Stage::IIIB),
            _ => None,
        },
        NCategory::N3 => match t {
            t if t.is_t1_or_t2() => Some(Stage::IIIB),
            T3 | T4 => Some(Stage::IIIC),
            _ => None,
        },
        NCategory::Nx => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(
        size: Option<f64>,
        tags: &[&str],
        nodes: Option<NCategory>,
        metastasis: Option<MCategory>,
    ) -> TnmInputs {
        TnmInputs {
            tumor_size_cm: size,
            characteristics: tags.iter().map(|t| t.to_string()).collect(),
            nodes,
            metastasis,
        }
    }

    fn t_for_size(size: f64) -> TCategory {
        classify_tnm(&inputs(Some(size), &[], None, None)).t
    }

    #[test]
    fn size_boundaries_are_inclusive() {
        assert_eq!(t_for_size(1.0), TCategory::T1a);
        assert_eq!(t_for_size(1.01), TCategory::T1b);
        assert_eq!(t_for_size(2.0), TCategory::T1b);
        assert_eq!(t_for_size(3.0), TCategory::T1c);
        assert_eq!(t_for_size(4.0), TCategory::T2a);
        assert_eq!(t_for_size(5.0), TCategory::T2b);
        assert_eq!(t_for_size(7.0), TCategory::T3);
        assert_eq!(t_for_size(7.01), TCategory::T4);
    }

    #[test]
    fn stages_small_node_negative_tumour() {
        let result = classify_tnm(&inputs(
            Some(2.0),
            &[],
            Some(NCategory::N0),
            Some(MCategory::M0),
        ));
        assert_eq!(result.t, TCategory::T1b);
        assert_eq!(result.n, NCategory::N0);
        assert_eq!(result.m, MCategory::M0);
        assert_eq!(result.stage, StageOutcome::Staged(Stage::IA));
        assert_eq!(result.stage.label(), "I A");
        assert!(result.is_complete());
    }

    #[test]
    fn mediastinal_involvement_overrides_bronchus() {
        let result = classify_tnm(&inputs(
            Some(2.0),
            &["main-bronchus-involvement", "mediastinal-involvement"],
            None,
            None,
        ));
        assert_eq!(result.t, TCategory::T4);
    }

    #[test]
    fn same_lobe_nodules_lose_to_other_lobe_nodules() {
        let result = classify_tnm(&inputs(
            Some(8.0),
            &["other-lobe-same-lung-nodules", "same-lobe-nodules"],
            None,
            None,
        ));
        assert_eq!(result.t, TCategory::T4);

        let result = classify_tnm(&inputs(Some(1.5), &["chest-wall-involvement"], None, None));
        assert_eq!(result.t, TCategory::T3);
    }

    #[test]
    fn pleura_involvement_raises_t1_to_t2_only() {
        let raised = classify_tnm(&inputs(
            Some(1.5),
            &["visceral-pleura-involvement"],
            Some(NCategory::N1),
            Some(MCategory::M0),
        ));
        assert_eq!(raised.t, TCategory::T2);
        assert_eq!(raised.stage, StageOutcome::Staged(Stage::IIB));

        let kept = classify_tnm(&inputs(Some(6.0), &["main-bronchus-involvement"], None, None));
        assert_eq!(kept.t, TCategory::T3);

        let kept = classify_tnm(&inputs(Some(4.5), &["main-bronchus-involvement"], None, None));
        assert_eq!(kept.t, TCategory::T2b);
    }

    #[test]
    fn plain_t2_without_nodes_is_unassigned() {
        let result = classify_tnm(&inputs(
            Some(1.5),
            &["main-bronchus-involvement"],
            Some(NCategory::N0),
            Some(MCategory::M0),
        ));
        assert_eq!(result.stage, StageOutcome::Unassigned);
        assert!(!result.is_complete());
    }

    #[test]
    fn unknown_tags_are_ignored() {
        let result = classify_tnm(&inputs(Some(2.5), &["pericardium", ""], None, None));
        assert_eq!(result.t, TCategory::T1c);
    }

    #[test]
    fn missing_size_is_incomplete() {
        let result = classify_tnm(&inputs(
            None,
            &["mediastinal-involvement"],
            Some(NCategory::N2),
            Some(MCategory::M0),
        ));
        assert_eq!(result.t, TCategory::Tx);
        assert_eq!(result.stage, StageOutcome::Incomplete);
        assert_eq!(result.stage.label(), "Incomplete");
    }

    #[test]
    fn all_unset_inputs_degrade_to_sentinels() {
        let result = classify_tnm(&TnmInputs::default());
        assert_eq!(result.t, TCategory::Tx);
        assert_eq!(result.n, NCategory::Nx);
        assert_eq!(result.m, MCategory::Mx);
        assert_eq!(result.stage, StageOutcome::Incomplete);
    }

    #[test]
    fn metastasis_with_unresolved_t_or_n_is_incomplete() {
        let no_size = classify_tnm(&inputs(None, &[], Some(NCategory::N0), Some(MCategory::M1c)));
        assert_eq!(no_size.t, TCategory::Tx);
        assert_eq!(no_size.stage, StageOutcome::Incomplete);

        let no_nodes = classify_tnm(&inputs(Some(3.0), &[], None, Some(MCategory::M1a)));
        assert_eq!(no_nodes.n, NCategory::Nx);
        assert_eq!(no_nodes.stage, StageOutcome::Incomplete);
        assert!(!no_nodes.is_complete());
    }

    #[test]
    fn metastasis_stages_iv_when_t_and_n_resolved() {
        let m1a = classify_tnm(&inputs(Some(1.5), &[], Some(NCategory::N0), Some(MCategory::M1a)));
        assert_eq!(m1a.stage, StageOutcome::Staged(Stage::IVA));
        let m1b = classify_tnm(&inputs(Some(3.0), &[], Some(NCategory::N0), Some(MCategory::M1b)));
        assert_eq!(m1b.stage, StageOutcome::Staged(Stage::IVA));
        let m1c = classify_tnm(&inputs(Some(3.0), &[], Some(NCategory::N3), Some(MCategory::M1c)));
        assert_eq!(m1c.stage, StageOutcome::Staged(Stage::IVB));
        let m1 = classify_tnm(&inputs(Some(3.0), &[], Some(NCategory::N1), Some(MCategory::M1)));
        assert_eq!(m1.stage, StageOutcome::Staged(Stage::IV));
        assert!(m1.stage.stage().unwrap().is_metastatic());
    }

    #[test]
    fn pleura_involvement_keeps_t2a_tumour_staged() {
        let result = classify_tnm(&inputs(
            Some(3.5),
            &["main-bronchus-involvement"],
            Some(NCategory::N0),
            Some(MCategory::M0),
        ));
        assert_eq!(result.t, TCategory::T2a);
        assert_eq!(result.stage, StageOutcome::Staged(Stage::IB));
    }

    #[test]
    fn node_positive_table() {
        let cases = [
            (2.5, NCategory::N1, Stage::IIB),
            (4.5, NCategory::N1, Stage::IIB),
            (6.0, NCategory::N1, Stage::IIIA),
            (8.0, NCategory::N1, Stage::IIIB),
            (1.0, NCategory::N2, Stage::IIIA),
            (6.0, NCategory::N2, Stage::IIIB),
            (9.0, NCategory::N2, Stage::IIIB),
            (3.5, NCategory::N3, Stage::IIIB),
            (6.5, NCategory::N3, Stage::IIIC),
            (4.5, NCategory::N0, Stage::IIA),
            (3.5, NCategory::N0, Stage::IB),
            (6.5, NCategory::N0, Stage::IIB),
            (7.5, NCategory::N0, Stage::IIIA),
        ];
        for (size, n, expected) in cases {
            let result = classify_tnm(&inputs(Some(size), &[], Some(n), Some(MCategory::M0)));
            assert_eq!(
                result.stage,
                StageOutcome::Staged(expected),
                "size {size} {n}"
            );
            assert!(!expected.is_metastatic());
        }
    }

    #[test]
    fn unresolved_metastasis_without_stage_is_incomplete() {
        let result = classify_tnm(&inputs(Some(2.0), &[], Some(NCategory::N0), None));
        assert_eq!(result.m, MCategory::Mx);
        assert_eq!(result.stage, StageOutcome::Incomplete);
    }

    #[test]
    fn parses_categories() {
        assert_eq!("N2".parse::<NCategory>().unwrap(), NCategory::N2);
        assert_eq!(" M1c ".parse::<MCategory>().unwrap(), MCategory::M1c);
        assert!("N4".parse::<NCategory>().is_err());
        assert!("M2".parse::<MCategory>().is_err());
    }

    #[test]
    fn stage_outcome_serialises_as_label() {
        let result = classify_tnm(&inputs(
            Some(2.0),
            &[],
            Some(NCategory::N0),
            Some(MCategory::M0),
        ));
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["t"], "T1b");
        assert_eq!(json["stage"], "I A");

        let back: TnmResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
        assert!(serde_json::from_str::<StageOutcome>(r#""V""#).is_err());
    }
}
