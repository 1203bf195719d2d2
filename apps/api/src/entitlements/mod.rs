//! Entitlements — the single shared plan/feature-gating library.
//!
//! ARCHITECTURAL RULE: every authorization decision in ResumeKit goes
//! through this module. It is pure and synchronous: no I/O, no caching,
//! no ambient environment reads. Callers pass the configured admin email
//! explicitly and resolve entitlement fresh on every request, because the
//! admin email, the user's plan, and the premium flag are all mutable
//! between requests.
//!
//! Failure policy is fail-open-to-most-restrictive: a missing user, a
//! missing plan id, or an unrecognized plan id resolves to the Free tier.
//! Nothing in this module returns an error or panics — denials are values.

pub mod export;
pub mod gate;
pub mod plans;
pub mod resolver;

pub use export::{can_export_resume, ExportDecision};
pub use gate::{can_access_feature, can_perform_action, FeatureDecision};
pub use plans::{
    check_limit, get_plan, has_feature, BillingCycle, Capability, ExportFormat, Feature,
    LimitKind, LimitValue, Plan, PlanId,
};
pub use resolver::{effective_plan, is_admin_email, premium_flag, Subject};
