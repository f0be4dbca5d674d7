//! Route table for the patient record service.
//!
//! Returns a composable `Router` mounted at the root. The original service
//! runs with a wide-open CORS policy, so the router carries a permissive
//! `CorsLayer`.

use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints::patients;
use crate::api::types::ApiContext;
use crate::db::SqlitePool;

/// Build the patient API router over the given pool.
pub fn patient_api_router(pool: SqlitePool) -> Router {
    let ctx = ApiContext::new(pool);

    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    Router::new()
        .route("/", get(patients::root))
        .route("/addPatient", post(patients::add))
        .route("/patients", get(patients::list))
        .route(
            "/patient/:pid",
            get(patients::detail)
                .put(patients::update)
                .delete(patients::remove),
        )
        .route("/search/patients", get(patients::search))
        .with_state(ctx)
        .layer(CorsLayer::permissive())
}
