//! Feature gate — allow/deny decisions with display-ready reasons.
//!
//! Two paths, preserved exactly from the product semantics:
//! - ATS scoring and job tailoring are decided solely by the premium flag,
//!   bypassing the per-plan feature map. The flag can diverge from plan
//!   identity (a `plan: free` user with `is_premium: true` is allowed),
//!   so the bypass is intentional privilege semantics, not redundancy.
//! - Every other feature defers to the plan's capability matrix.

use serde::Serialize;

use crate::entitlements::plans::{self, Feature, LimitKind, PlanId};
use crate::entitlements::resolver::{effective_plan, premium_flag, Subject};

/// The result of a gate check. Pure value, constructed fresh per call.
/// Denials carry a reason string suitable for direct display.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureDecision {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub upgrade_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_plan: Option<PlanId>,
}

impl FeatureDecision {
    fn allow(current_plan: Option<PlanId>) -> Self {
        Self {
            allowed: true,
            reason: None,
            upgrade_required: false,
            current_plan,
        }
    }

    fn deny(reason: String, current_plan: Option<PlanId>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
            upgrade_required: true,
            current_plan,
        }
    }
}

/// Can `subject` use `feature`?
pub fn can_access_feature(
    admin_email: Option<&str>,
    subject: Option<&Subject<'_>>,
    feature: Feature,
) -> FeatureDecision {
    // Premium-gated pair: decided by the premium flag, not the feature map.
    if matches!(feature, Feature::AtsScore | Feature::JobTailoring) {
        if premium_flag(admin_email, subject) {
            return FeatureDecision::allow(Some(PlanId::ProMonthly));
        }
        return FeatureDecision::deny(
            "This feature requires premium access. Upgrade to Pro or One-Time plan.".to_string(),
            Some(effective_plan(admin_email, subject)),
        );
    }

    let plan = effective_plan(admin_email, subject);
    if plans::has_feature(plan, feature) {
        return FeatureDecision::allow(Some(plan));
    }

    let tier = if plan == PlanId::Free { "Pro" } else { "upgraded" };
    FeatureDecision::deny(
        format!("This feature requires a {tier} plan"),
        Some(plan),
    )
}

/// Can `subject` perform one more `action` given `current_usage` so far?
pub fn can_perform_action(
    admin_email: Option<&str>,
    subject: Option<&Subject<'_>>,
    action: LimitKind,
    current_usage: i64,
) -> FeatureDecision {
    let plan = effective_plan(admin_email, subject);
    if plans::check_limit(plan, action, current_usage) {
        return FeatureDecision::allow(None);
    }
    FeatureDecision::deny(
        format!(
            "You've reached your {} limit for the {} plan",
            action.as_str(),
            plan.plan().name
        ),
        Some(plan),
    )
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
    fn test_premium_user_allowed_ats_score() {
        let s = subject("user@x.com", Some("free"), true);
        let d = can_access_feature(ADMIN, Some(&s), Feature::AtsScore);
        assert!(d.allowed);
        assert_eq!(d.current_plan, Some(PlanId::ProMonthly));
    }

    #[test]
    fn test_non_premium_denied_job_tailoring_with_reason() {
        let s = subject("user@x.com", Some("free"), false);
        let d = can_access_feature(ADMIN, Some(&s), Feature::JobTailoring);
        assert!(!d.allowed);
        assert!(d.upgrade_required);
        assert!(d.reason.as_deref().is_some_and(|r| !r.is_empty()));
        assert_eq!(d.current_plan, Some(PlanId::Free));
    }

    #[test]
    fn test_premium_bypass_ignores_feature_map() {
        // Pro's map says atsScore: true, but a pro-plan user whose premium
        // flag was never set is still denied on the premium path.
        let s = subject("user@x.com", Some("pro_monthly"), false);
        let d = can_access_feature(ADMIN, Some(&s), Feature::AtsScore);
        assert!(!d.allowed);
        assert_eq!(d.current_plan, Some(PlanId::ProMonthly));
    }

    #[test]
    fn test_admin_allowed_premium_features() {
        let s = subject(" ADMIN@site.COM ", Some("free"), false);
        assert!(can_access_feature(ADMIN, Some(&s), Feature::AtsScore).allowed);
        assert!(can_access_feature(ADMIN, Some(&s), Feature::JobTailoring).allowed);
    }

    #[test]
    fn test_scenario_non_admin_free_user_denied() {
        // {email: a@x.com, plan: free, isPremium: false}, admin admin@site.com
        let s = subject("a@x.com", Some("free"), false);
        assert_eq!(effective_plan(ADMIN, Some(&s)), PlanId::Free);
        assert!(!can_access_feature(ADMIN, Some(&s), Feature::AtsScore).allowed);
    }

    #[test]
    fn test_scenario_admin_email_with_case_and_whitespace() {
        // Same user, admin configured as " A@X.COM ": override applies.
        let s = subject("a@x.com", Some("free"), false);
        let admin = Some(" A@X.COM ");
        assert_eq!(effective_plan(admin, Some(&s)), PlanId::ProMonthly);
        assert!(can_access_feature(admin, Some(&s), Feature::AtsScore).allowed);
    }

    #[test]
    fn test_generic_feature_defers_to_plan_map() {
        let free = subject("user@x.com", Some("free"), false);
        let pro = subject("user@x.com", Some("pro_monthly"), false);
        assert!(!can_access_feature(ADMIN, Some(&free), Feature::AiAssistance).allowed);
        assert!(can_access_feature(ADMIN, Some(&pro), Feature::AiAssistance).allowed);
    }

    #[test]
    fn test_generic_denial_reason_names_pro_for_free_plan() {
        let free = subject("user@x.com", Some("free"), false);
        let d = can_access_feature(ADMIN, Some(&free), Feature::AiAssistance);
        assert_eq!(
            d.reason.as_deref(),
            Some("This feature requires a Pro plan")
        );

        // One-Time lacks aiAssistance; its denial uses the generic wording.
        let one_time = subject("user@x.com", Some("one_time"), false);
        let d = can_access_feature(ADMIN, Some(&one_time), Feature::AiAssistance);
        assert_eq!(
            d.reason.as_deref(),
            Some("This feature requires a upgraded plan")
        );
    }

    #[test]
    fn test_missing_user_denied_premium_features() {
        let d = can_access_feature(ADMIN, None, Feature::AtsScore);
        assert!(!d.allowed);
        assert_eq!(d.current_plan, Some(PlanId::Free));
    }

    #[test]
    fn test_action_within_limit_allowed() {
        let s = subject("user@x.com", Some("free"), false);
        assert!(can_perform_action(ADMIN, Some(&s), LimitKind::Resumes, 0).allowed);
    }

    #[test]
    fn test_action_at_limit_denied_with_plan_name() {
        let s = subject("user@x.com", Some("free"), false);
        let d = can_perform_action(ADMIN, Some(&s), LimitKind::Resumes, 1);
        assert!(!d.allowed);
        let reason = d.reason.unwrap();
        assert!(reason.contains("resumes"));
        assert!(reason.contains("Free"));
    }

    #[test]
    fn test_admin_actions_unlimited() {
        let s = subject("admin@site.com", Some("free"), false);
        assert!(can_perform_action(ADMIN, Some(&s), LimitKind::Resumes, 500).allowed);
    }

    #[test]
    fn test_decision_serializes_camel_case() {
        let s = subject("user@x.com", Some("free"), false);
        let d = can_access_feature(ADMIN, Some(&s), Feature::AtsScore);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["allowed"], false);
        assert_eq!(json["upgradeRequired"], true);
        assert_eq!(json["currentPlan"], "free");
    }
}
