//! HTTP API route definitions.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{health, metrics, opportunities, ready, status, AppState};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        // Scan endpoints
        .route("/api/v1/status", get(status))
        .route("/api/v1/opportunities", get(opportunities))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::time::Duration;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::odds::{
        sample_events, BookmakerQuote, FallbackPolicy, MockConfig, MockOddsClient, OddsSource,
        Outcome,
    };
    use rust_decimal_macros::dec;

    fn state_with(mock: MockOddsClient) -> AppState {
        AppState::new(OddsSource::Mock(mock), Config::default()).with_fallback(FallbackPolicy {
            enabled: true,
            delay: Duration::ZERO,
        })
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let app = create_router(state_with(MockOddsClient::new()));

        let (status, body) = get_json(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn ready_endpoint_returns_503_when_not_ready() {
        let app = create_router(state_with(MockOddsClient::new()));

        let (status, _) = get_json(app, "/ready").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn ready_endpoint_returns_200_when_ready() {
        let state = state_with(MockOddsClient::new());
        state.set_ready(true);
        let app = create_router(state);

        let (status, _) = get_json(app, "/ready").await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn opportunities_reports_found_events() {
        let mock = MockOddsClient::new();
        let mut events = sample_events();
        // Betano's lifted prices turn the three-way book into an arbitrage.
        events[0].bookmakers[1] = BookmakerQuote::h2h(
            "betano",
            vec![
                Outcome::new("Flamengo", dec!(3.00)),
                Outcome::new("Palmeiras", dec!(4.50)),
                Outcome::new("Draw", dec!(4.00)),
            ],
        );
        mock.set_events(events);
        let state = state_with(mock);
        let app = create_router(state.clone());

        let (status, body) = get_json(app, "/api/v1/opportunities?stake=200&min_profit=1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["origin"], "live");
        assert_eq!(body["result"]["status"], "found");
        assert_eq!(body["result"]["count"], 1);
        assert_eq!(body["report"]["opportunities"][0]["opportunity"]["arbitrage"], true);
        assert!(state.last_scan.read().await.is_some());
    }

    #[tokio::test]
    async fn opportunities_falls_back_to_sample() {
        let mock = MockOddsClient::with_config(MockConfig {
            fail_events: true,
            ..Default::default()
        });
        let app = create_router(state_with(mock));

        let (status, body) = get_json(app, "/api/v1/opportunities").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["origin"], "sample");
        assert_eq!(body["result"]["status"], "no_opportunities");
    }

    #[tokio::test]
    async fn opportunities_rejects_bad_stake() {
        let app = create_router(state_with(MockOddsClient::new()));

        let (status, body) = get_json(app, "/api/v1/opportunities?stake=0").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("stake"));
    }

    #[tokio::test]
    async fn opportunities_rejects_threshold_out_of_range() {
        for uri in [
            "/api/v1/opportunities?min_profit=100",
            "/api/v1/opportunities?min_profit=-1",
        ] {
            let app = create_router(state_with(MockOddsClient::new()));

            let (status, body) = get_json(app, uri).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body["error"].as_str().unwrap().contains("min profit"));
        }
    }

    #[tokio::test]
    async fn empty_feed_reports_no_events() {
        let app = create_router(state_with(MockOddsClient::new()));

        let (_, body) = get_json(app, "/api/v1/opportunities?sport=tennis_atp").await;

        assert_eq!(body["sport"], "tennis_atp");
        assert_eq!(body["result"]["status"], "no_events");
    }

    #[tokio::test]
    async fn metrics_endpoint_is_empty_without_recorder() {
        let app = create_router(state_with(MockOddsClient::new()));

        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
