//! HTTP handlers

pub mod health;
pub mod access_points;
pub mod wifi;

use sqlx::PgPool;

use crate::{AppState, AppError};

/// Database pool, if configured and answering `SELECT 1`
pub async fn reachable_pool(state: &AppState) -> Option<&PgPool> {
    let pool = state.pool.as_ref()?;
    match crate::db::ping(pool).await {
        Ok(()) => {
            tracing::debug!("[API] Database connection verified");
            Some(pool)
        }
        Err(e) => {
            tracing::warn!("[API] Database connection failed, using fallback storage: {}", e);
            None
        }
    }
}

pub async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::fallback::FallbackStore;
    use crate::wifi::service::DEFAULT_SAMPLE_DATA;
    use crate::wifi::WifiDataService;
    use crate::{create_router, AppState};

    const UPLOAD: &str = "meta\nMAC,SSID,AuthMode,FirstSeen,Channel,RSSI,CurrentLatitude,CurrentLongitude,AltitudeMeters,AccuracyMeters,Type\n72:8C:52:2B:9F:7B,Test,[WPA2_PSK],2025-1-1 00:00:00,6,-60,30.0,-97.0,0,0,WIFI\nAA,Open,[OPEN],t,0,-40,0,0,0,0,WIFI\n";

    fn test_app(dir: &TempDir) -> (Router, AppState) {
        test_app_with(dir, |_| {})
    }

    fn test_app_with(dir: &TempDir, configure: impl FnOnce(&mut Config)) -> (Router, AppState) {
        let mut config = Config::from_env();
        config.database_url = None;
        config.fallback_storage_path = dir.path().join("data-fallback.json");
        config.sample_data_path = dir.path().join("sample-data.txt");
        config.max_upload_bytes = 64 * 1024 * 1024;
        configure(&mut config);

        let state = AppState {
            pool: None,
            wifi: WifiDataService::new(&config.sample_data_path),
            fallback: FallbackStore::new(&config.fallback_storage_path),
            config,
        };
        (create_router(state.clone()), state)
    }

    async fn send(app: Router, method: Method, uri: &str, body: Body, json: bool) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if json {
            request = request.header("content-type", "application/json");
        }
        let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        send(app, Method::GET, uri, Body::empty(), false).await
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        send(app, Method::POST, uri, Body::from(body.to_string()), true).await
    }

    #[tokio::test]
    async fn test_health_without_database() {
        let dir = TempDir::new().unwrap();
        let (app, _) = test_app(&dir);

        let (status, body) = get(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "disabled");
    }

    #[tokio::test]
    async fn test_share_goes_to_fallback_and_lists_shared() {
        let dir = TempDir::new().unwrap();
        let (app, state) = test_app(&dir);

        let shared = json!({
            "wifiData": UPLOAD,
            "shareInfo": { "city": "Austin", "state": "TX", "uploadedBy": "kim" }
        });
        let (status, body) = post_json(app.clone(), "/api/access-points", shared).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Processed 2 access points");
        assert_eq!(body["created"], 2);
        assert_eq!(body["skipped"], 0);
        assert_eq!(body["errors"], 0);

        // not shared: stored but not listed
        let private = json!({ "wifiData": UPLOAD });
        let (_, body) = post_json(app.clone(), "/api/access-points", private).await;
        assert_eq!(body["created"], 2);
        assert_eq!(state.fallback.load().len(), 4);

        let (status, body) = get(app, "/api/access-points").await;
        assert_eq!(status, StatusCode::OK);
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["AuthMode"], "WPA2_PSK");
        assert_eq!(data[0]["city"], "Austin");
        assert_eq!(data[0]["sharedPublicly"], true);
    }

    #[tokio::test]
    async fn test_share_validation_errors() {
        let dir = TempDir::new().unwrap();
        let (app, _) = test_app(&dir);

        let (status, body) = post_json(app.clone(), "/api/access-points", json!({ "wifiData": "" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("WiFi data is required"));

        let short_city = json!({ "wifiData": UPLOAD, "shareInfo": { "city": "A", "state": "TX" } });
        let (status, _) = post_json(app.clone(), "/api/access-points", short_city).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = post_json(app, "/api/access-points", json!({ "nope": 1 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_list_with_empty_fallback() {
        let dir = TempDir::new().unwrap();
        let (app, _) = test_app(&dir);

        let (status, body) = get(app, "/api/access-points").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_upload_then_dashboard() {
        let dir = TempDir::new().unwrap();
        let (app, _) = test_app(&dir);

        let (status, body) = send(app.clone(), Method::POST, "/api/upload", Body::from(UPLOAD), false).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert!(body.get("warnings").is_none());

        let (_, body) = get(app.clone(), "/api/dashboard").await;
        assert_eq!(body["stats"]["totalNetworks"], 2);
        assert_eq!(body["stats"]["openNetworkCount"], 1);
        // the (0,0) record has no marker
        assert_eq!(body["markers"].as_array().unwrap().len(), 1);
        assert_eq!(body["markers"][0]["color"], "#facc15");
        assert_eq!(body["channelDistribution"], json!([{ "channel": 6, "count": 1 }]));

        let (_, body) = get(app, "/api/dashboard?view=signal").await;
        assert_eq!(body["markers"][0]["color"], "#facc15");
        assert_eq!(body["markers"][0]["signalLevel"], "Good");
    }

    #[tokio::test]
    async fn test_strict_upload_reports_warnings() {
        let dir = TempDir::new().unwrap();
        let (app, _) = test_app(&dir);

        let data = format!("{}BB,x,[WEP],t,six,-70\n", UPLOAD);
        let (status, body) = send(app, Method::POST, "/api/upload?strict=true", Body::from(data), false).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 3);
        let warnings = body["warnings"].as_array().unwrap();
        assert_eq!(warnings[0]["field"], "Channel");
        assert_eq!(warnings[0]["kind"], "not_numeric");
    }

    #[tokio::test]
    async fn test_empty_upload_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let (app, _) = test_app(&dir);

        let (status, body) = send(app, Method::POST, "/api/upload", Body::empty(), false).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Empty file content");
    }

    #[tokio::test]
    async fn test_sample_falls_back_to_default_and_table_sorts() {
        let dir = TempDir::new().unwrap();
        let (app, _) = test_app(&dir);

        let (_, body) = get(app.clone(), "/api/sample").await;
        assert_eq!(body["count"], 8);

        let (_, body) = get(app.clone(), "/api/table?search=granger&sortBy=RSSI&direction=asc").await;
        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["RSSI"], -82);
        assert_eq!(rows[1]["RSSI"], -78);

        let (_, body) = get(app, "/api/table").await;
        assert_eq!(body["data"][0]["RSSI"], -78);
    }

    #[tokio::test]
    async fn test_sample_reload_reads_file() {
        let dir = TempDir::new().unwrap();
        let (app, state) = test_app(&dir);

        let (_, body) = get(app.clone(), "/api/sample").await;
        assert_eq!(body["count"], 8);

        std::fs::write(&state.config.sample_data_path, UPLOAD).unwrap();
        let (_, body) = get(app.clone(), "/api/sample").await;
        assert_eq!(body["count"], 8);
        let (_, body) = get(app, "/api/sample?reload=true").await;
        assert_eq!(body["count"], 2);
    }

    #[tokio::test]
    async fn test_clear_cache() {
        let dir = TempDir::new().unwrap();
        let (app, state) = test_app(&dir);

        std::fs::write(&state.config.sample_data_path, DEFAULT_SAMPLE_DATA).unwrap();
        let _ = get(app.clone(), "/api/sample").await;
        assert!(state.wifi.cached().is_some());

        let (status, _) = send(app, Method::DELETE, "/api/cache", Body::empty(), false).await;
        assert_eq!(status, StatusCode::OK);
        assert!(state.wifi.cached().is_none());
    }

    /// Wigle export of roughly `bytes` bytes
    fn large_export(bytes: usize) -> String {
        let mut data = String::from(UPLOAD);
        let mut n = 0u32;
        while data.len() < bytes {
            data.push_str(&format!(
                "02:00:00:{:02X}:{:02X}:{:02X},Net{},[WPA2_PSK],2025-5-6 11:14:51,6,-70,30.7193718,-97.3206482,144.50,1.50,WIFI\n",
                (n >> 16) & 0xff,
                (n >> 8) & 0xff,
                n & 0xff,
                n
            ));
            n += 1;
        }
        data
    }

    #[tokio::test]
    async fn test_upload_over_two_megabytes() {
        let dir = TempDir::new().unwrap();
        let (app, _) = test_app(&dir);

        let data = large_export(3 * 1024 * 1024);
        let rows = data.lines().count() - 2;
        let (status, body) = send(app, Method::POST, "/api/upload", Body::from(data), false).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], rows);
    }

    #[tokio::test]
    async fn test_share_over_two_megabytes() {
        let dir = TempDir::new().unwrap();
        let (app, state) = test_app(&dir);

        let data = large_export(3 * 1024 * 1024);
        let rows = data.lines().count() - 2;
        let (status, body) = post_json(app, "/api/access-points", json!({ "wifiData": data })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["created"], rows);
        assert_eq!(state.fallback.load().len(), rows);
    }

    #[tokio::test]
    async fn test_body_limit_from_config() {
        let dir = TempDir::new().unwrap();
        let (app, _) = test_app_with(&dir, |config| config.max_upload_bytes = 1024);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/upload")
                    .body(Body::from(large_export(4096)))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let dir = TempDir::new().unwrap();
        let (app, _) = test_app(&dir);

        let (status, body) = get(app, "/api/nothing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }
}
