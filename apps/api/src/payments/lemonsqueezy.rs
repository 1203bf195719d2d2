//! Lemon Squeezy gateway mock and webhook payload types.

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::payment::{PaymentProvider, PaymentRow};
use crate::payments::PaymentGateway;

pub struct LemonSqueezyGateway;

#[async_trait]
impl PaymentGateway for LemonSqueezyGateway {
    fn provider(&self) -> PaymentProvider {
        PaymentProvider::Lemonsqueezy
    }

    // Mock checkout URL; a real integration would create a checkout via the
    // Lemon Squeezy API here.
    async fn checkout_url(
        &self,
        payment: &PaymentRow,
        frontend_url: &str,
    ) -> Result<String, AppError> {
        Ok(format!(
            "{frontend_url}/app/payments/lemonsqueezy/callback?paymentId={}",
            payment.id
        ))
    }
}

/// Lemon Squeezy webhook envelope. Signature verification is out of scope
/// for the mocked integration.
#[derive(Debug, Deserialize)]
pub struct LemonSqueezyWebhook {
    pub event: String,
    pub data: LemonSqueezyData,
}

#[derive(Debug, Deserialize)]
pub struct LemonSqueezyData {
    pub id: String,
}

impl LemonSqueezyWebhook {
    pub fn is_completion(&self) -> bool {
        matches!(
            self.event.as_str(),
            "order_created" | "subscription_created"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_events_recognized() {
        let hook: LemonSqueezyWebhook =
            serde_json::from_str(r#"{"event": "order_created", "data": {"id": "ls-42"}}"#).unwrap();
        assert!(hook.is_completion());
        assert_eq!(hook.data.id, "ls-42");

        let hook: LemonSqueezyWebhook =
            serde_json::from_str(r#"{"event": "subscription_created", "data": {"id": "ls-7"}}"#)
                .unwrap();
        assert!(hook.is_completion());
    }

    #[test]
    fn test_other_events_ignored() {
        let hook: LemonSqueezyWebhook =
            serde_json::from_str(r#"{"event": "subscription_cancelled", "data": {"id": "x"}}"#)
                .unwrap();
        assert!(!hook.is_completion());
    }
}
