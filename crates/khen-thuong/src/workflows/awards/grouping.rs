use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::TitleCode;

/// Fixed partition of title codes. A proposal may only mix titles drawn from
/// one family; the partition is configuration data, never computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleFamily {
    /// Baseline annual commendations: CSTDCS, CSTT.
    Baseline,
    /// Elevated annual commendations: BKBQP, CSTDTQ.
    Elevated,
    /// HCCSVV long-service tiers.
    LongServiceHccsvv,
    /// HC_QKQT, a family of its own within niên hạn proposals.
    TheatreService,
    /// KNC_VSNXD_QDNDVN, also a singleton family.
    ArmyBuilding,
}

impl TitleFamily {
    pub const fn label(self) -> &'static str {
        match self {
            TitleFamily::Baseline => "CSTDCS/CSTT",
            TitleFamily::Elevated => "BKBQP/CSTDTQ",
            TitleFamily::LongServiceHccsvv => "HCCSVV",
            TitleFamily::TheatreService => "HC_QKQT",
            TitleFamily::ArmyBuilding => "KNC_VSNXD_QDNDVN",
        }
    }
}

pub const fn family_of(title: TitleCode) -> TitleFamily {
    match title {
        TitleCode::Cstdcs | TitleCode::Cstt => TitleFamily::Baseline,
        TitleCode::Bkbqp | TitleCode::Cstdtq => TitleFamily::Elevated,
        TitleCode::HccsvvHangBa | TitleCode::HccsvvHangNhi | TitleCode::HccsvvHangNhat => {
            TitleFamily::LongServiceHccsvv
        }
        TitleCode::HcQkqt => TitleFamily::TheatreService,
        TitleCode::KncVsnxdQdndvn => TitleFamily::ArmyBuilding,
    }
}

/// Result of the mutual-exclusion check. Denials are values the wizard can
/// render inline, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "ruling")]
pub enum TitleRuling {
    Allowed,
    Denied {
        candidate_family: TitleFamily,
        draft_family: TitleFamily,
    },
}

impl TitleRuling {
    pub const fn allowed(&self) -> bool {
        matches!(self, TitleRuling::Allowed)
    }

    pub fn summary(&self) -> String {
        match self {
            TitleRuling::Allowed => "allowed".to_string(),
            TitleRuling::Denied {
                candidate_family,
                draft_family,
            } => format!(
                "title family {} conflicts with the {} titles already in the proposal",
                candidate_family.label(),
                draft_family.label()
            ),
        }
    }
}

/// Pure, stateless check run every time a title is assigned in a draft:
/// an empty draft accepts anything, otherwise the candidate must share the
/// family of the titles already present.
pub fn can_add_title(current: &BTreeSet<TitleCode>, candidate: TitleCode) -> TitleRuling {
    let candidate_family = family_of(candidate);
    match current.iter().next() {
        None => TitleRuling::Allowed,
        Some(present) => {
            let draft_family = family_of(*present);
            if draft_family == candidate_family {
                TitleRuling::Allowed
            } else {
                TitleRuling::Denied {
                    candidate_family,
                    draft_family,
                }
            }
        }
    }
}
