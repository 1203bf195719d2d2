//! Payments — provider-agnostic checkout and completion plumbing.
//!
//! Providers are mocked behind the `PaymentGateway` trait: checkout
//! creation returns a callback URL instead of calling a real SDK, and
//! webhooks are accepted unverified. The entitlement-relevant part is
//! `grant_plan`: completing a payment copies the purchased plan onto the
//! user row, which is the only place `plan`, `is_premium`, and
//! `plan_expires_at` are ever written after registration.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entitlements::{BillingCycle, PlanId};
use crate::errors::AppError;
use crate::models::payment::{PaymentProvider, PaymentRow, PaymentStatus};

pub mod lemonsqueezy;
pub mod paypal;

/// One checkout backend. Both implementations are mocks that round-trip
/// through the frontend callback page.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    fn provider(&self) -> PaymentProvider;

    /// Returns the URL the client should follow to approve the checkout.
    async fn checkout_url(
        &self,
        payment: &PaymentRow,
        frontend_url: &str,
    ) -> Result<String, AppError>;
}

/// Premium is granted for both paid tiers; an unknown plan id (resolving
/// Free) grants nothing.
pub fn premium_for_plan(plan_id: &str) -> bool {
    matches!(
        PlanId::from_id(plan_id),
        PlanId::ProMonthly | PlanId::OneTime
    )
}

/// Monthly billing sets a 30-day expiry; one-time purchases never expire.
/// Nothing reads this column yet — see DESIGN.md.
pub fn expiry_for_billing(billing: Option<BillingCycle>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match billing {
        Some(BillingCycle::Monthly) => Some(now + Duration::days(30)),
        _ => None,
    }
}

/// Inserts the pending payment record for a freshly initiated checkout.
pub async fn create_pending_payment(
    pool: &PgPool,
    user_id: Uuid,
    plan_id: &str,
    amount: f64,
    billing: Option<BillingCycle>,
    provider: PaymentProvider,
) -> Result<PaymentRow, AppError> {
    let payment: PaymentRow = sqlx::query_as(
        r#"
        INSERT INTO payments (id, user_id, plan_id, amount, currency, status, provider, billing)
        VALUES ($1, $2, $3, $4, 'USD', $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(plan_id)
    .bind(amount)
    .bind(PaymentStatus::Pending)
    .bind(provider)
    .bind(billing)
    .fetch_one(pool)
    .await?;

    Ok(payment)
}

/// Marks a payment completed and applies the purchased plan to its owner.
/// Payments are never deleted; completion is the only forward transition
/// the mocked providers exercise.
pub async fn complete_payment(
    pool: &PgPool,
    payment: &PaymentRow,
    provider_payment_id: Option<&str>,
    provider_transaction_id: Option<&str>,
) -> Result<PaymentRow, AppError> {
    let updated: PaymentRow = sqlx::query_as(
        r#"
        UPDATE payments
        SET status = $2,
            provider_payment_id = COALESCE($3, provider_payment_id),
            provider_transaction_id = COALESCE($4, provider_transaction_id),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(payment.id)
    .bind(PaymentStatus::Completed)
    .bind(provider_payment_id)
    .bind(provider_transaction_id)
    .fetch_one(pool)
    .await?;

    grant_plan(pool, payment.user_id, &payment.plan_id, payment.billing).await?;

    tracing::info!(
        payment_id = %payment.id,
        user_id = %payment.user_id,
        plan = %payment.plan_id,
        provider = payment.provider.as_str(),
        "payment completed"
    );

    Ok(updated)
}

/// Copies the purchased plan onto the user record. The entitlement core
/// consumes these fields; it never writes them.
pub async fn grant_plan(
    pool: &PgPool,
    user_id: Uuid,
    plan_id: &str,
    billing: Option<BillingCycle>,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE users SET plan = $2, is_premium = $3, plan_expires_at = $4 WHERE id = $1",
    )
    .bind(user_id)
    .bind(plan_id)
    .bind(premium_for_plan(plan_id))
    .bind(expiry_for_billing(billing, Utc::now()))
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premium_for_paid_plans() {
        assert!(premium_for_plan("pro_monthly"));
        assert!(premium_for_plan("one_time"));
    }

    #[test]
    fn test_no_premium_for_free_or_unknown() {
        assert!(!premium_for_plan("free"));
        assert!(!premium_for_plan("gold_plated"));
    }

    #[test]
    fn test_monthly_billing_expires_in_30_days() {
        let now = Utc::now();
        let expiry = expiry_for_billing(Some(BillingCycle::Monthly), now).unwrap();
        assert_eq!(expiry - now, Duration::days(30));
    }

    #[test]
    fn test_one_time_and_absent_billing_never_expire() {
        let now = Utc::now();
        assert_eq!(expiry_for_billing(Some(BillingCycle::OneTime), now), None);
        assert_eq!(expiry_for_billing(None, now), None);
    }
}
