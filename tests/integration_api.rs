#![cfg(feature = "api")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;
use wake_farm::api::{AppState, router};
use wake_farm::config::ScenarioConfig;
use wake_farm::power_curve::study::run_power_study;

fn state_from_preset(name: &str) -> Arc<AppState> {
    let cfg = ScenarioConfig::from_preset(name).unwrap();
    let farm = cfg.build_farm().unwrap().evaluate().unwrap();
    let evaluator = cfg.layout_evaluator(cfg.build_ambient_field().unwrap()).unwrap();
    let layout = evaluator.report(&cfg.layout_coords()).unwrap();
    let study = run_power_study(
        &cfg.power_curve().unwrap(),
        cfg.study.weibull_shape,
        cfg.study.weibull_scale,
        1000,
        cfg.simulation.seed,
    )
    .unwrap();
    Arc::new(AppState {
        farm,
        layout,
        study,
    })
}

async fn get_json(state: Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn baseline_state_reports_farm_totals() {
    let state = state_from_preset("baseline");
    let expected_total = state.farm.total_power_kw;
    let (status, json) = get_json(state, "/state").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["farm"]["turbine_count"], 9);
    assert_eq!(json["farm"]["waked_turbine_count"], 6);
    let total = json["farm"]["total_power_kw"].as_f64().unwrap();
    assert!((total - expected_total).abs() < 1e-6);
    assert_eq!(json["layout"]["turbines"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn aligned_pair_turbines_in_farm_order() {
    let (status, json) = get_json(state_from_preset("aligned_pair"), "/turbines").await;

    assert_eq!(status, StatusCode::OK);
    let records = json.as_array().cloned().unwrap_or_default();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["effective_speed_ms"].as_f64(), Some(10.0));
    let waked = records[1]["effective_speed_ms"].as_f64().unwrap();
    assert!((waked - 6.729).abs() < 1e-3);
}

#[tokio::test]
async fn turbine_range_past_end_is_empty() {
    let (status, json) = get_json(state_from_preset("aligned_pair"), "/turbines?from=5&to=9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn inverted_range_is_rejected() {
    let (status, json) = get_json(state_from_preset("staggered"), "/turbines?from=3&to=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().is_some_and(|e| e.contains("from")));
}
