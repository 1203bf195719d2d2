//! PayPal gateway mock and webhook payload types.

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::payment::{PaymentProvider, PaymentRow};
use crate::payments::PaymentGateway;

pub struct PaypalGateway;

#[async_trait]
impl PaymentGateway for PaypalGateway {
    fn provider(&self) -> PaymentProvider {
        PaymentProvider::Paypal
    }

    // Mock approval URL; a real integration would create the order via the
    // PayPal SDK here and return its approval link.
    async fn checkout_url(
        &self,
        payment: &PaymentRow,
        frontend_url: &str,
    ) -> Result<String, AppError> {
        Ok(format!(
            "{frontend_url}/app/payments/paypal/callback?paymentId={}",
            payment.id
        ))
    }
}

/// PayPal webhook envelope. Signature verification is out of scope for the
/// mocked integration.
#[derive(Debug, Deserialize)]
pub struct PaypalWebhook {
    pub event_type: String,
    pub resource: PaypalResource,
}

#[derive(Debug, Deserialize)]
pub struct PaypalResource {
    pub id: String,
}

impl PaypalWebhook {
    /// Only completed sale/capture events drive plan grants.
    pub fn is_completion(&self) -> bool {
        matches!(
            self.event_type.as_str(),
            "PAYMENT.SALE.COMPLETED" | "PAYMENT.CAPTURE.COMPLETED"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_events_recognized() {
        let hook: PaypalWebhook = serde_json::from_str(
            r#"{"event_type": "PAYMENT.SALE.COMPLETED", "resource": {"id": "PAY-123"}}"#,
        )
        .unwrap();
        assert!(hook.is_completion());
        assert_eq!(hook.resource.id, "PAY-123");

        let hook: PaypalWebhook = serde_json::from_str(
            r#"{"event_type": "PAYMENT.CAPTURE.COMPLETED", "resource": {"id": "CAP-1"}}"#,
        )
        .unwrap();
        assert!(hook.is_completion());
    }

    #[test]
    fn test_other_events_ignored() {
        let hook: PaypalWebhook = serde_json::from_str(
            r#"{"event_type": "PAYMENT.SALE.DENIED", "resource": {"id": "PAY-123"}}"#,
        )
        .unwrap();
        assert!(!hook.is_completion());
    }
}
