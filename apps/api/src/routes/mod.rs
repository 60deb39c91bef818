pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::audit::handlers as audit;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Audit API
        .route(
            "/api/v1/audit/events",
            get(audit::handle_query_events).post(audit::handle_record_event),
        )
        .route("/api/v1/audit/presets", post(audit::handle_record_preset))
        .route("/api/v1/audit/stats", get(audit::handle_stats))
        .route("/api/v1/audit/alerts", get(audit::handle_alerts))
        .route("/api/v1/audit/rules", get(audit::handle_rules))
        .route("/api/v1/audit/export", get(audit::handle_export))
        // Analysis API
        .route("/api/v1/analysis/categories", get(analysis::handle_categories))
        .route("/api/v1/analysis/classify", post(analysis::handle_classify))
        .route(
            "/api/v1/analysis/history",
            get(analysis::handle_list_history).post(analysis::handle_record_analysis),
        )
        .route(
            "/api/v1/analysis/history/:id",
            get(analysis::handle_get_history)
                .patch(analysis::handle_update_history)
                .delete(analysis::handle_delete_history),
        )
        .route(
            "/api/v1/analysis/users/:user_id/summary",
            get(analysis::handle_user_summary),
        )
        .route(
            "/api/v1/analysis/users/:user_id/emotion-trends",
            get(analysis::handle_emotion_trends),
        )
        .with_state(state)
}
