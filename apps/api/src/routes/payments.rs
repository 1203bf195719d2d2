use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::entitlements::{Feature, LimitKind, Plan, PlanId};
use crate::errors::AppError;
use crate::middleware::auth::AuthUserId;
use crate::models::payment::PaymentRow;
use crate::payments::lemonsqueezy::{LemonSqueezyGateway, LemonSqueezyWebhook};
use crate::payments::paypal::{PaypalGateway, PaypalWebhook};
use crate::payments::{complete_payment, create_pending_payment, PaymentGateway};
use crate::state::AppState;

/// GET /api/plans — the static catalog, in the shape the pricing page
/// renders: feature and limit maps with `-1` as the unlimited sentinel.
pub async fn handle_list_plans() -> Json<Value> {
    let plans: Vec<Value> = [PlanId::Free, PlanId::ProMonthly, PlanId::OneTime]
        .into_iter()
        .map(|id| plan_json(id.plan()))
        .collect();
    Json(json!({ "plans": plans }))
}

fn plan_json(plan: &Plan) -> Value {
    let features: Value = Feature::ALL
        .iter()
        .map(|f| (f.as_str().to_string(), plan.feature(*f).to_json()))
        .collect::<serde_json::Map<_, _>>()
        .into();
    let limits: Value = LimitKind::ALL
        .iter()
        .map(|l| (l.as_str().to_string(), plan.limit(*l).to_json()))
        .collect::<serde_json::Map<_, _>>()
        .into();

    json!({
        "id": plan.id,
        "name": plan.name,
        "price": plan.price,
        "priceLabel": plan.price_label,
        "billing": plan.billing,
        "exportFormats": plan.export_formats,
        "features": features,
        "limits": limits,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutRequest {
    pub plan_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutResponse {
    pub success: bool,
    pub payment_id: Uuid,
    pub approval_url: String,
}

/// POST /api/payments/paypal/create
pub async fn handle_paypal_create(
    State(state): State<AppState>,
    Extension(AuthUserId(user_id)): Extension<AuthUserId>,
    Json(req): Json<CreateCheckoutRequest>,
) -> Result<Json<CreateCheckoutResponse>, AppError> {
    create_checkout(&state, user_id, &req.plan_id, &PaypalGateway).await
}

/// POST /api/payments/lemonsqueezy/create
pub async fn handle_lemonsqueezy_create(
    State(state): State<AppState>,
    Extension(AuthUserId(user_id)): Extension<AuthUserId>,
    Json(req): Json<CreateCheckoutRequest>,
) -> Result<Json<CreateCheckoutResponse>, AppError> {
    create_checkout(&state, user_id, &req.plan_id, &LemonSqueezyGateway).await
}

/// Shared checkout path. Price and billing cycle come from the catalog,
/// never from the client.
async fn create_checkout(
    state: &AppState,
    user_id: Uuid,
    plan_id: &str,
    gateway: &dyn PaymentGateway,
) -> Result<Json<CreateCheckoutResponse>, AppError> {
    let plan = match PlanId::from_id(plan_id) {
        // from_id resolves unknown ids to Free; Free is not purchasable.
        PlanId::Free => {
            return Err(AppError::Validation(format!(
                "'{plan_id}' is not a purchasable plan"
            )))
        }
        paid => paid.plan(),
    };

    let payment = create_pending_payment(
        &state.db,
        user_id,
        plan.id.as_str(),
        plan.price,
        plan.billing,
        gateway.provider(),
    )
    .await?;

    let approval_url = gateway
        .checkout_url(&payment, &state.config.frontend_url)
        .await?;

    tracing::info!(
        payment_id = %payment.id,
        user_id = %user_id,
        plan = %plan.id,
        provider = gateway.provider().as_str(),
        "checkout created"
    );

    Ok(Json(CreateCheckoutResponse {
        success: true,
        payment_id: payment.id,
        approval_url,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutePaypalRequest {
    pub payment_id: Uuid,
    pub payer_id: String,
}

#[derive(Serialize)]
pub struct ExecutePaymentResponse {
    pub success: bool,
    pub message: String,
    pub payment: PaymentRow,
}

/// POST /api/payments/paypal/execute
///
/// The mock of PayPal's approve-then-execute flow: the caller must own the
/// payment; execution completes it and applies the plan to the user.
pub async fn handle_paypal_execute(
    State(state): State<AppState>,
    Extension(AuthUserId(user_id)): Extension<AuthUserId>,
    Json(req): Json<ExecutePaypalRequest>,
) -> Result<Json<ExecutePaymentResponse>, AppError> {
    if req.payer_id.trim().is_empty() {
        return Err(AppError::Validation("Missing required fields".to_string()));
    }

    let payment: Option<PaymentRow> = sqlx::query_as("SELECT * FROM payments WHERE id = $1")
        .bind(req.payment_id)
        .fetch_optional(&state.db)
        .await?;
    let payment = payment.ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

    if payment.user_id != user_id {
        return Err(AppError::Forbidden("Unauthorized".to_string()));
    }

    let payment = complete_payment(&state.db, &payment, Some(&req.payer_id), None).await?;

    Ok(Json(ExecutePaymentResponse {
        success: true,
        message: "Payment completed successfully".to_string(),
        payment,
    }))
}

/// POST /api/payments/paypal/webhook (unauthenticated)
pub async fn handle_paypal_webhook(
    State(state): State<AppState>,
    Json(hook): Json<PaypalWebhook>,
) -> Result<Json<Value>, AppError> {
    if hook.is_completion() {
        let payment: Option<PaymentRow> =
            sqlx::query_as("SELECT * FROM payments WHERE provider_payment_id = $1")
                .bind(&hook.resource.id)
                .fetch_optional(&state.db)
                .await?;

        match payment {
            Some(payment) => {
                complete_payment(&state.db, &payment, None, Some(&hook.resource.id)).await?;
            }
            None => {
                tracing::warn!(
                    provider_payment_id = %hook.resource.id,
                    "paypal webhook for unknown payment"
                );
            }
        }
    }

    // Always 200: providers retry on anything else.
    Ok(Json(json!({ "received": true })))
}

/// POST /api/payments/lemonsqueezy/webhook (unauthenticated)
pub async fn handle_lemonsqueezy_webhook(
    State(state): State<AppState>,
    Json(hook): Json<LemonSqueezyWebhook>,
) -> Result<Json<Value>, AppError> {
    if hook.is_completion() {
        let payment: Option<PaymentRow> =
            sqlx::query_as("SELECT * FROM payments WHERE provider_transaction_id = $1")
                .bind(&hook.data.id)
                .fetch_optional(&state.db)
                .await?;

        match payment {
            Some(payment) => {
                complete_payment(&state.db, &payment, None, Some(&hook.data.id)).await?;
            }
            None => {
                tracing::warn!(
                    provider_transaction_id = %hook.data.id,
                    "lemonsqueezy webhook for unknown payment"
                );
            }
        }
    }

    Ok(Json(json!({ "received": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_json_publishes_sentinels() {
        let pro = plan_json(PlanId::ProMonthly.plan());
        assert_eq!(pro["features"]["maxResumes"], json!(-1));
        assert_eq!(pro["features"]["atsScore"], json!(true));
        assert_eq!(pro["limits"]["resumes"], json!(-1));
        assert_eq!(pro["billing"], json!("monthly"));
    }

    #[test]
    fn test_plan_json_free_tier() {
        let free = plan_json(PlanId::Free.plan());
        assert_eq!(free["features"]["watermark"], json!(true));
        assert_eq!(free["features"]["maxResumes"], json!(1));
        assert_eq!(free["limits"]["exports"], json!(5));
        assert_eq!(free["billing"], json!(null));
        assert_eq!(free["exportFormats"], json!(["pdf"]));
    }
}
