//! Entitlement resolution — effective plan and premium flag for a user,
//! including the admin email override.
//!
//! The admin override elevates a configured email to Pro with premium
//! access on every request. It is computed here and applied to responses
//! and decisions only — it is never written back to the user record.

use crate::entitlements::plans::PlanId;

/// The minimal borrowed view of a user record the resolver needs. Route
/// handlers build this from the sqlx row; tests build it inline.
#[derive(Debug, Clone, Copy)]
pub struct Subject<'a> {
    pub email: &'a str,
    pub plan: Option<&'a str>,
    pub is_premium: bool,
}

/// Case-insensitive, whitespace-trimmed admin email match. An absent admin
/// configuration means no user is ever treated as admin.
pub fn is_admin_email(admin_email: Option<&str>, email: &str) -> bool {
    let admin = match admin_email {
        Some(a) => a,
        None => return false,
    };
    if admin.trim().is_empty() || email.trim().is_empty() {
        return false;
    }
    email.trim().eq_ignore_ascii_case(admin.trim())
}

/// The plan actually applied to a user:
/// - no user -> Free
/// - admin email match -> ProMonthly, unconditionally
/// - otherwise the stored plan id (unrecognized -> Free)
///
/// Total and cheap; call it fresh on every authorization decision.
pub fn effective_plan(admin_email: Option<&str>, subject: Option<&Subject<'_>>) -> PlanId {
    let subject = match subject {
        Some(s) => s,
        None => return PlanId::Free,
    };
    if is_admin_email(admin_email, subject.email) {
        return PlanId::ProMonthly;
    }
    subject
        .plan
        .map(PlanId::from_id)
        .unwrap_or(PlanId::Free)
}

/// Premium access for the ATS-score and job-tailoring features: the stored
/// `is_premium` flag OR the admin override. Deliberately independent of
/// plan identity — a user with `plan: free` but `is_premium: true` is
/// premium.
pub fn premium_flag(admin_email: Option<&str>, subject: Option<&Subject<'_>>) -> bool {
    let subject = match subject {
        Some(s) => s,
        None => return false,
    };
    subject.is_premium || is_admin_email(admin_email, subject.email)
}
