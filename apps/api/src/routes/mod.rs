pub mod ai;
pub mod health;
pub mod payments;
pub mod resumes;
pub mod users;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::middleware::{auth, premium};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // ATS scoring and job tailoring sit behind the premium gate. The gate
    // re-resolves entitlement on every request; client-side checks are UX
    // only and never trusted.
    let premium_routes = Router::new()
        .route("/api/ai/enhance-pro-sum", post(ai::handle_enhance_summary))
        .route("/api/ai/enhance-job-desc", post(ai::handle_enhance_job_desc))
        .route("/api/ai/ats-score", post(ai::handle_ats_score))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            premium::require_premium_access,
        ));

    let authed_routes = Router::new()
        .route("/api/users/data", get(users::handle_user_data))
        .route("/api/users/resumes", get(users::handle_user_resumes))
        .route("/api/resumes", post(resumes::handle_create_resume))
        .route(
            "/api/resumes/:id",
            get(resumes::handle_get_resume)
                .put(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        .route("/api/resumes/:id/export", get(resumes::handle_export_resume))
        .route("/api/ai/upload-resume", post(ai::handle_upload_resume))
        .route("/api/payments/paypal/create", post(payments::handle_paypal_create))
        .route("/api/payments/paypal/execute", post(payments::handle_paypal_execute))
        .route(
            "/api/payments/lemonsqueezy/create",
            post(payments::handle_lemonsqueezy_create),
        )
        .merge(premium_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/plans", get(payments::handle_list_plans))
        .route("/api/users/register", post(users::handle_register))
        .route("/api/users/login", post(users::handle_login))
        // Webhooks are unauthenticated by design: providers call them.
        .route("/api/payments/paypal/webhook", post(payments::handle_paypal_webhook))
        .route(
            "/api/payments/lemonsqueezy/webhook",
            post(payments::handle_lemonsqueezy_webhook),
        )
        .merge(authed_routes)
        .with_state(state)
}
