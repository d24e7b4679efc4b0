//! Dashboard data handlers
//!
//! Work on the service cache: uploads replace it, the other routes read it
//! (loading the sample data set when nothing has been uploaded yet).

use axum::{body::Bytes, extract::{Query, State}, Json};
use serde::{Deserialize, Serialize};

use crate::{AppState, AppResult};
use crate::wifi::table::{filter_access_points, sort_access_points, SortDirection, SortKey};
use crate::wifi::{AccessPoint, DashboardSummary, FieldWarning, MarkerColorMode, ParseOptions};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPointsResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<AccessPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<FieldWarning>>,
}

impl AccessPointsResponse {
    fn new(data: Vec<AccessPoint>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
            warnings: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct UploadQuery {
    #[serde(default)]
    pub strict: bool,
}

/// Upload a Wigle export as the raw request body
pub async fn upload(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> AppResult<Json<AccessPointsResponse>> {
    let options = ParseOptions { strict: query.strict };
    let report = state.wifi.handle_file_upload(&body, options)?;

    let mut response = AccessPointsResponse::new(report.access_points);
    if options.strict {
        response.warnings = Some(report.warnings);
    }
    Ok(Json(response))
}

#[derive(Debug, Deserialize, Default)]
pub struct SampleQuery {
    #[serde(default)]
    pub reload: bool,
}

pub async fn sample(
    State(state): State<AppState>,
    Query(query): Query<SampleQuery>,
) -> Json<AccessPointsResponse> {
    let data = state.wifi.load_sample_data(query.reload).await;
    Json(AccessPointsResponse::new(data.to_vec()))
}

#[derive(Debug, Deserialize, Default)]
pub struct DashboardQuery {
    #[serde(default)]
    pub view: MarkerColorMode,
}

/// Stats, distributions and markers for the current data set
pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Json<DashboardSummary> {
    let data = state.wifi.load_sample_data(false).await;
    Json(DashboardSummary::build(&data, query.view))
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TableQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub sort_by: SortKey,
    #[serde(default)]
    pub direction: SortDirection,
}

pub async fn table(
    State(state): State<AppState>,
    Query(query): Query<TableQuery>,
) -> Json<AccessPointsResponse> {
    let data = state.wifi.load_sample_data(false).await;

    let mut rows = filter_access_points(&data, &query.search);
    sort_access_points(&mut rows, query.sort_by, query.direction);

    Json(AccessPointsResponse::new(rows.into_iter().cloned().collect()))
}

pub async fn clear_cache(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.wifi.invalidate();
    tracing::info!("[API] Access point cache invalidated");
    Json(serde_json::json!({ "success": true }))
}
