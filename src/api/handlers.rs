//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, FarmSummary, StateResponse, TurbineQuery};
use crate::farm::TurbineResult;

/// Returns farm totals, the field evaluation, and the power study.
///
/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(StateResponse {
        farm: FarmSummary::from(&state.farm),
        layout: state.layout.clone(),
        study: state.study.clone(),
    })
}

/// Returns per-turbine results, optionally filtered by index range.
///
/// `GET /turbines` → 200 + `Vec<TurbineResult>` JSON
/// `GET /turbines?from=N&to=M` → filtered range (inclusive)
/// `GET /turbines?from=5&to=2` → 400 + `ErrorResponse`
pub async fn get_turbines(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TurbineQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let records: Vec<TurbineResult> = state
        .farm
        .turbines
        .iter()
        .filter(|t| t.index >= from && t.index <= to)
        .cloned()
        .collect();

    Ok(Json(records))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::farm::{Turbine, WindFarm};
    use crate::field::{Grid, GridCoord, WakeFieldParams};
    use crate::layout::{LayoutEvaluator, SpacingPenalty};
    use crate::power_curve::PowerCurve;
    use crate::power_curve::study::run_power_study;

    fn make_test_state() -> Arc<AppState> {
        let turbines = (0..6)
            .map(|i| Turbine::new(i as f64 * 400.0, 0.0, 80.0, 0.8, 2000.0).unwrap())
            .collect();
        let farm = WindFarm::new(turbines, 10.0, 0.04, 1.225)
            .unwrap()
            .evaluate()
            .unwrap();
        let evaluator = LayoutEvaluator::new(
            Grid::filled(30, 30, 9.0),
            WakeFieldParams::new(4.0, 0.8, 0.04).unwrap(),
            SpacingPenalty::default(),
        );
        let layout = evaluator
            .report(&[GridCoord::new(5, 2), GridCoord::new(5, 25)])
            .unwrap();
        let study = run_power_study(&PowerCurve::reference(), 2.0, 8.0, 200, 42).unwrap();
        Arc::new(AppState {
            farm,
            layout,
            study,
        })
    }

    #[tokio::test]
    async fn state_returns_200() {
        let app = router(make_test_state());

        let req = Request::builder()
            .uri("/state")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["farm"]["turbine_count"], 6);
        assert_eq!(json["farm"]["waked_turbine_count"], 5);
        assert!(json["layout"].get("fitness").is_some());
        assert!(json["layout"].get("effective").is_none());
        assert_eq!(json["study"]["samples"], 200);
    }

    #[tokio::test]
    async fn turbines_returns_all() {
        let app = router(make_test_state());

        let req = Request::builder()
            .uri("/turbines")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.len(), 6);
    }

    #[tokio::test]
    async fn turbines_range_query() {
        let app = router(make_test_state());

        let req = Request::builder()
            .uri("/turbines?from=2&to=4")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.len(), 3);
        assert_eq!(json[0]["index"], 2);
        assert_eq!(json[2]["index"], 4);
    }

    #[tokio::test]
    async fn turbines_invalid_range_returns_400() {
        let app = router(make_test_state());

        let req = Request::builder()
            .uri("/turbines?from=5&to=2")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json.get("error").is_some());
    }
}
