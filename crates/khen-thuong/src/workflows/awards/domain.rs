use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for personnel records managed by the external directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonnelId(pub String);

/// Identifier wrapper for organizational units.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
        }
    }
}

/// Snapshot of a personnel record as served by the personnel directory.
///
/// Enlistment and separation dates drive every duration-based eligibility
/// rule; a missing separation date means the person is still serving.
/// The rules treat these records as read-only input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonnelRecord {
    pub id: PersonnelId,
    pub full_name: String,
    pub gender: Option<Gender>,
    pub enlistment_date: Option<NaiveDate>,
    pub separation_date: Option<NaiveDate>,
    pub unit: Option<UnitId>,
    pub position: Option<String>,
}

/// Organizational unit snapshot used by unit-level proposals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub parent: Option<UnitId>,
}

/// Elapsed service derived from a pair of dates. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDuration {
    pub years: u32,
    /// Remainder months, always in `0..=11`.
    pub months: u32,
    pub total_months: u32,
}

impl ServiceDuration {
    pub const ZERO: ServiceDuration = ServiceDuration {
        years: 0,
        months: 0,
        total_months: 0,
    };

    pub const fn from_total_months(total_months: u32) -> Self {
        Self {
            years: total_months / 12,
            months: total_months % 12,
            total_months,
        }
    }
}

/// Medal families tracked by the eligibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MedalFamily {
    /// Huy chương Chiến sĩ vẻ vang, three tiers in strict order.
    Hccsvv,
    /// Huân chương Quân kỳ Quyết thắng.
    HcQkqt,
    /// Kỷ niệm chương "Vì sự nghiệp xây dựng QĐND Việt Nam".
    KncVsnxdQdndvn,
    /// Duty-category medal measured in elapsed months.
    Hcbvtq,
}

impl MedalFamily {
    pub const fn label(self) -> &'static str {
        match self {
            MedalFamily::Hccsvv => "HCCSVV",
            MedalFamily::HcQkqt => "HC_QKQT",
            MedalFamily::KncVsnxdQdndvn => "KNC_VSNXD_QDNDVN",
            MedalFamily::Hcbvtq => "HCBVTQ",
        }
    }
}

/// Tier within a medal family. Ordering follows the award progression:
/// Hạng Ba is earned first, Hạng Nhất last. Single-tier families only
/// carry a `HangBa` row in the requirement table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MedalTier {
    HangBa,
    HangNhi,
    HangNhat,
}

impl MedalTier {
    pub const fn label(self) -> &'static str {
        match self {
            MedalTier::HangBa => "Hạng Ba",
            MedalTier::HangNhi => "Hạng Nhì",
            MedalTier::HangNhat => "Hạng Nhất",
        }
    }
}

/// Per-tier standing recorded in a person's award profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TierStatus {
    NotEligible,
    Eligible,
    Granted,
}

/// One row of the award profile served by the external profile API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardHistoryEntry {
    pub family: MedalFamily,
    pub tier: MedalTier,
    pub status: TierStatus,
    pub granted_on: Option<NaiveDate>,
}

/// Read-only award profile for one person. Tiers without an entry are
/// treated as `NotEligible`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardHistory {
    entries: Vec<AwardHistoryEntry>,
}

impl AwardHistory {
    pub fn from_entries(entries: Vec<AwardHistoryEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[AwardHistoryEntry] {
        &self.entries
    }

    pub fn status_of(&self, family: MedalFamily, tier: MedalTier) -> TierStatus {
        self.entries
            .iter()
            .find(|entry| entry.family == family && entry.tier == tier)
            .map(|entry| entry.status)
            .unwrap_or(TierStatus::NotEligible)
    }

    pub fn granted(&self, family: MedalFamily, tier: MedalTier) -> bool {
        self.status_of(family, tier) == TierStatus::Granted
    }
}

/// Commendation title codes assignable inside a proposal draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TitleCode {
    Cstdcs,
    Cstt,
    Bkbqp,
    Cstdtq,
    HccsvvHangBa,
    HccsvvHangNhi,
    HccsvvHangNhat,
    HcQkqt,
    KncVsnxdQdndvn,
}

impl TitleCode {
    pub const fn code(self) -> &'static str {
        match self {
            TitleCode::Cstdcs => "CSTDCS",
            TitleCode::Cstt => "CSTT",
            TitleCode::Bkbqp => "BKBQP",
            TitleCode::Cstdtq => "CSTDTQ",
            TitleCode::HccsvvHangBa => "HCCSVV_HANG_BA",
            TitleCode::HccsvvHangNhi => "HCCSVV_HANG_NHI",
            TitleCode::HccsvvHangNhat => "HCCSVV_HANG_NHAT",
            TitleCode::HcQkqt => "HC_QKQT",
            TitleCode::KncVsnxdQdndvn => "KNC_VSNXD_QDNDVN",
        }
    }

    /// Medal (family, tier) behind a long-service title, if any. Annual
    /// commendation titles have no duration rule attached.
    pub const fn medal(self) -> Option<(MedalFamily, MedalTier)> {
        match self {
            TitleCode::HccsvvHangBa => Some((MedalFamily::Hccsvv, MedalTier::HangBa)),
            TitleCode::HccsvvHangNhi => Some((MedalFamily::Hccsvv, MedalTier::HangNhi)),
            TitleCode::HccsvvHangNhat => Some((MedalFamily::Hccsvv, MedalTier::HangNhat)),
            TitleCode::HcQkqt => Some((MedalFamily::HcQkqt, MedalTier::HangBa)),
            TitleCode::KncVsnxdQdndvn => Some((MedalFamily::KncVsnxdQdndvn, MedalTier::HangBa)),
            _ => None,
        }
    }
}

/// Proposal batches tracked by the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalType {
    /// Annual commendation round (personnel entities).
    Annual,
    /// Long-service ("niên hạn") medal round (personnel entities).
    NienHan,
    /// Unit-level commendation round (unit entities).
    UnitLevel,
    /// Scientific achievement round; entries carry a category and
    /// description instead of a title code.
    ScientificAchievement,
}

impl ProposalType {
    pub const fn label(self) -> &'static str {
        match self {
            ProposalType::Annual => "annual",
            ProposalType::NienHan => "nien_han",
            ProposalType::UnitLevel => "unit_level",
            ProposalType::ScientificAchievement => "scientific_achievement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Manager,
    Admin,
}

/// Explicit caller context threaded through service operations instead of
/// any ambient session lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub actor: String,
    pub role: Role,
}

impl RequestContext {
    pub fn new(actor: impl Into<String>, role: Role) -> Self {
        Self {
            actor: actor.into(),
            role,
        }
    }
}
