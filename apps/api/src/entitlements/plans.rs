//! Plan catalog — the static pricing tiers and their capability matrices.
//!
//! Feature and limit names are closed enums on purpose: a typo'd feature
//! name is a compile error here, not a silently-false lookup.

use serde::{Deserialize, Serialize};

/// The three pricing tiers. Unknown identifiers resolve to `Free`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanId {
    Free,
    ProMonthly,
    OneTime,
}

impl PlanId {
    /// Parses a stored plan identifier, falling back to `Free` for anything
    /// unrecognized. Total by design: the gate must never crash request
    /// handling over a bad plan string.
    pub fn from_id(id: &str) -> Self {
        match id {
            "pro_monthly" => PlanId::ProMonthly,
            "one_time" => PlanId::OneTime,
            _ => PlanId::Free,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PlanId::Free => "free",
            PlanId::ProMonthly => "pro_monthly",
            PlanId::OneTime => "one_time",
        }
    }

    pub fn plan(self) -> &'static Plan {
        match self {
            PlanId::Free => &FREE,
            PlanId::ProMonthly => &PRO_MONTHLY,
            PlanId::OneTime => &ONE_TIME,
        }
    }
}

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billing cycle attached to paid plans and to payment records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "billing_cycle", rename_all = "kebab-case")]
pub enum BillingCycle {
    Monthly,
    OneTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Docx,
}

/// Feature names a plan can grant. `Watermark` is carried for catalog
/// fidelity but no gate consults it: its polarity is inverted relative to
/// its name (`Enabled` on Free means "exports carry a watermark"), so
/// export watermarking is decided by plan identity in `export.rs` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    MaxResumes,
    Watermark,
    AtsScore,
    JobTailoring,
    AiAssistance,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::MaxResumes,
        Feature::Watermark,
        Feature::AtsScore,
        Feature::JobTailoring,
        Feature::AiAssistance,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Feature::MaxResumes => "maxResumes",
            Feature::Watermark => "watermark",
            Feature::AtsScore => "atsScore",
            Feature::JobTailoring => "jobTailoring",
            Feature::AiAssistance => "aiAssistance",
        }
    }
}

/// Countable limits a plan imposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitKind {
    Resumes,
    Exports,
}

impl LimitKind {
    pub const ALL: [LimitKind; 2] = [LimitKind::Resumes, LimitKind::Exports];

    pub const fn as_str(self) -> &'static str {
        match self {
            LimitKind::Resumes => "resumes",
            LimitKind::Exports => "exports",
        }
    }
}

/// A capability value: boolean flags, counted allowances, and the `-1`
/// "unlimited" sentinel from the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Enabled,
    Disabled,
    Count(i64),
    Unlimited,
}

impl Capability {
    /// Mirrors the source semantics: access is granted only for a boolean
    /// `true` or the unlimited sentinel. A plain count does not grant.
    pub const fn grants_access(self) -> bool {
        matches!(self, Capability::Enabled | Capability::Unlimited)
    }

    /// JSON form as the catalog publishes it: `true`/`false` for flags,
    /// a number for counts, `-1` for unlimited.
    pub fn to_json(self) -> serde_json::Value {
        match self {
            Capability::Enabled => serde_json::Value::Bool(true),
            Capability::Disabled => serde_json::Value::Bool(false),
            Capability::Count(n) => serde_json::Value::from(n),
            Capability::Unlimited => serde_json::Value::from(-1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitValue {
    AtMost(i64),
    Unlimited,
}

impl LimitValue {
    pub fn to_json(self) -> serde_json::Value {
        match self {
            LimitValue::AtMost(n) => serde_json::Value::from(n),
            LimitValue::Unlimited => serde_json::Value::from(-1),
        }
    }
}

/// A pricing tier. Immutable, defined at compile time, looked up by id.
#[derive(Debug)]
pub struct Plan {
    pub id: PlanId,
    pub name: &'static str,
    pub price: f64,
    pub price_label: &'static str,
    pub billing: Option<BillingCycle>,
    pub export_formats: &'static [ExportFormat],
}

pub static FREE: Plan = Plan {
    id: PlanId::Free,
    name: "Free",
    price: 0.0,
    price_label: "Free",
    billing: None,
    export_formats: &[ExportFormat::Pdf],
};

pub static PRO_MONTHLY: Plan = Plan {
    id: PlanId::ProMonthly,
    name: "Pro",
    price: 9.99,
    price_label: "$9.99/month",
    billing: Some(BillingCycle::Monthly),
    export_formats: &[ExportFormat::Pdf, ExportFormat::Docx],
};

pub static ONE_TIME: Plan = Plan {
    id: PlanId::OneTime,
    name: "Premium Export",
    price: 4.99,
    price_label: "$4.99",
    billing: Some(BillingCycle::OneTime),
    export_formats: &[ExportFormat::Pdf, ExportFormat::Docx],
};

impl Plan {
    pub fn feature(&self, feature: Feature) -> Capability {
        use Capability::*;
        match (self.id, feature) {
            (PlanId::Free, Feature::MaxResumes) => Count(1),
            (PlanId::Free, Feature::Watermark) => Enabled,
            (PlanId::Free, Feature::AtsScore) => Disabled,
            (PlanId::Free, Feature::JobTailoring) => Disabled,
            (PlanId::Free, Feature::AiAssistance) => Disabled,

            (PlanId::ProMonthly, Feature::MaxResumes) => Unlimited,
            (PlanId::ProMonthly, Feature::Watermark) => Disabled,
            (PlanId::ProMonthly, Feature::AtsScore) => Enabled,
            (PlanId::ProMonthly, Feature::JobTailoring) => Enabled,
            (PlanId::ProMonthly, Feature::AiAssistance) => Enabled,

            (PlanId::OneTime, Feature::MaxResumes) => Count(1),
            (PlanId::OneTime, Feature::Watermark) => Disabled,
            (PlanId::OneTime, Feature::AtsScore) => Enabled,
            (PlanId::OneTime, Feature::JobTailoring) => Enabled,
            (PlanId::OneTime, Feature::AiAssistance) => Disabled,
        }
    }

    pub fn limit(&self, kind: LimitKind) -> LimitValue {
        use LimitValue::*;
        match (self.id, kind) {
            (PlanId::Free, LimitKind::Resumes) => AtMost(1),
            (PlanId::Free, LimitKind::Exports) => AtMost(5), // per month
            (PlanId::ProMonthly, _) => Unlimited,
            (PlanId::OneTime, LimitKind::Resumes) => AtMost(1),
            (PlanId::OneTime, LimitKind::Exports) => AtMost(1), // single export
        }
    }
}

/// Looks up a plan by stored identifier, falling back to Free when the
/// identifier is absent or unrecognized.
pub fn get_plan(id: Option<&str>) -> &'static Plan {
    id.map(PlanId::from_id).unwrap_or(PlanId::Free).plan()
}

/// True only if the plan's capability for `feature` is boolean true or the
/// unlimited sentinel.
pub fn has_feature(plan: PlanId, feature: Feature) -> bool {
    plan.plan().feature(feature).grants_access()
}

/// True if the plan's limit is unlimited or `current_usage` is strictly
/// below it. A limit of 1 permits usage 0 only.
pub fn check_limit(plan: PlanId, kind: LimitKind, current_usage: i64) -> bool {
    match plan.plan().limit(kind) {
        LimitValue::Unlimited => true,
        LimitValue::AtMost(limit) => current_usage < limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_plan_falls_back_to_free() {
        assert_eq!(PlanId::from_id("enterprise"), PlanId::Free);
        assert_eq!(PlanId::from_id(""), PlanId::Free);
        assert_eq!(get_plan(None).id, PlanId::Free);
        assert_eq!(get_plan(Some("not_a_plan")).id, PlanId::Free);
    }

    #[test]
    fn test_known_plan_ids_round_trip() {
        for id in [PlanId::Free, PlanId::ProMonthly, PlanId::OneTime] {
            assert_eq!(PlanId::from_id(id.as_str()), id);
        }
    }

    #[test]
    fn test_has_feature_boolean_true_only() {
        assert!(has_feature(PlanId::ProMonthly, Feature::AtsScore));
        assert!(has_feature(PlanId::OneTime, Feature::JobTailoring));
        assert!(!has_feature(PlanId::Free, Feature::AtsScore));
        assert!(!has_feature(PlanId::Free, Feature::AiAssistance));
        // A plain count is not "true": Free has maxResumes = 1.
        assert!(!has_feature(PlanId::Free, Feature::MaxResumes));
    }

    #[test]
    fn test_has_feature_unlimited_sentinel_is_true() {
        // Pro's maxResumes is the -1 sentinel, which grants.
        assert!(has_feature(PlanId::ProMonthly, Feature::MaxResumes));
    }

    #[test]
    fn test_watermark_polarity_is_inverted() {
        // `watermark: true` on Free means "exports carry a watermark", yet
        // has_feature reports it as a granted capability. No gate consults
        // this flag; export.rs checks plan identity instead.
        assert!(has_feature(PlanId::Free, Feature::Watermark));
        assert!(!has_feature(PlanId::OneTime, Feature::Watermark));
    }

    #[test]
    fn test_check_limit_strict_boundary() {
        assert!(check_limit(PlanId::Free, LimitKind::Resumes, 0));
        assert!(!check_limit(PlanId::Free, LimitKind::Resumes, 1));
        assert!(!check_limit(PlanId::Free, LimitKind::Resumes, 2));
    }

    #[test]
    fn test_check_limit_unlimited() {
        assert!(check_limit(PlanId::ProMonthly, LimitKind::Resumes, 1_000_000));
        assert!(check_limit(PlanId::ProMonthly, LimitKind::Exports, i64::MAX - 1));
    }

    #[test]
    fn test_one_time_single_export() {
        assert!(check_limit(PlanId::OneTime, LimitKind::Exports, 0));
        assert!(!check_limit(PlanId::OneTime, LimitKind::Exports, 1));
    }

    #[test]
    fn test_free_export_quota() {
        assert!(check_limit(PlanId::Free, LimitKind::Exports, 4));
        assert!(!check_limit(PlanId::Free, LimitKind::Exports, 5));
    }
}
