use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::entitlements::BillingCycle;

/// Payment lifecycle: created `Pending`, moved to `Completed` by the
/// execute callback or a provider webhook. Rows are never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "payment_provider", rename_all = "lowercase")]
pub enum PaymentProvider {
    Paypal,
    Lemonsqueezy,
}

impl PaymentProvider {
    pub const fn as_str(self) -> &'static str {
        match self {
            PaymentProvider::Paypal => "paypal",
            PaymentProvider::Lemonsqueezy => "lemonsqueezy",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: String,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    pub provider: PaymentProvider,
    pub provider_payment_id: Option<String>,
    pub provider_transaction_id: Option<String>,
    pub billing: Option<BillingCycle>,
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
