//! Export policy — watermark decision for resume exports.
//!
//! Export is never denied outright: free-tier exports carry a watermark,
//! paid tiers export clean. This asymmetry with the deniable AI features
//! is deliberate and load-bearing for the product funnel.

use serde::Serialize;

use crate::entitlements::plans::PlanId;
use crate::entitlements::resolver::{effective_plan, Subject};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportDecision {
    pub allowed: bool,
    pub with_watermark: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_plan: Option<PlanId>,
}

/// Always allowed; `with_watermark` is true iff the effective plan is Free.
/// Watermarking checks plan identity directly rather than the `watermark`
/// feature flag, whose polarity is inverted relative to its name.
pub fn can_export_resume(
    admin_email: Option<&str>,
    subject: Option<&Subject<'_>>,
) -> ExportDecision {
    let plan = effective_plan(admin_email, subject);
    if plan == PlanId::Free {
        return ExportDecision {
            allowed: true,
            with_watermark: true,
            reason: Some("Export will include watermark".to_string()),
            current_plan: None,
        };
    }
    ExportDecision {
        allowed: true,
        with_watermark: false,
        reason: None,
        current_plan: Some(plan),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: Option<&str> = Some("admin@site.com");

    fn subject<'a>(email: &'a str, plan: Option<&'a str>, is_premium: bool) -> Subject<'a> {
        Subject {
            email,
            plan,
            is_premium,
        }
    }

    #[test]
    fn test_export_never_denied() {
        let free = subject("user@x.com", Some("free"), false);
        let pro = subject("user@x.com", Some("pro_monthly"), true);
        assert!(can_export_resume(ADMIN, None).allowed);
        assert!(can_export_resume(ADMIN, Some(&free)).allowed);
        assert!(can_export_resume(ADMIN, Some(&pro)).allowed);
        assert!(can_export_resume(None, None).allowed);
    }

    #[test]
    fn test_free_plan_watermarked() {
        let free = subject("user@x.com", Some("free"), false);
        let d = can_export_resume(ADMIN, Some(&free));
        assert!(d.with_watermark);
        assert!(d.reason.is_some());
    }

    #[test]
    fn test_missing_user_watermarked() {
        assert!(can_export_resume(ADMIN, None).with_watermark);
    }

    #[test]
    fn test_paid_plans_export_clean() {
        let pro = subject("user@x.com", Some("pro_monthly"), false);
        let one_time = subject("user@x.com", Some("one_time"), false);
        assert!(!can_export_resume(ADMIN, Some(&pro)).with_watermark);
        assert!(!can_export_resume(ADMIN, Some(&one_time)).with_watermark);
    }

    #[test]
    fn test_admin_exports_clean_regardless_of_stored_plan() {
        let s = subject("Admin@Site.com", Some("free"), false);
        let d = can_export_resume(ADMIN, Some(&s));
        assert!(!d.with_watermark);
        assert_eq!(d.current_plan, Some(PlanId::ProMonthly));
    }

    #[test]
    fn test_premium_flag_alone_does_not_remove_watermark() {
        // Watermark follows effective plan identity, not the premium flag.
        let s = subject("user@x.com", Some("free"), true);
        assert!(can_export_resume(ADMIN, Some(&s)).with_watermark);
    }
}
