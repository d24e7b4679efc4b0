//! Shared access points handlers

use axum::{extract::{rejection::JsonRejection, State}, Json};
use sqlx::PgPool;
use tracing::{info, warn};
use validator::Validate;

use crate::{AppState, AppResult};
use crate::fallback::FallbackStore;
use crate::models::{
    ListAccessPointsResponse, SaveStatus, ShareInfo, ShareWifiDataRequest,
    ShareWifiDataResponse, StoredAccessPoint,
};
use crate::wifi::{parse_wigle_wifi_data, AccessPoint};

use super::reachable_pool;

/// Parse and store an upload, skipping records already known by
/// position + SSID
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<ShareWifiDataRequest>, JsonRejection>,
) -> AppResult<Json<ShareWifiDataResponse>> {
    info!("[API] POST access-points - start");

    let Json(req) = payload?;
    req.validate()?;

    let access_points = parse_wigle_wifi_data(&req.wifi_data);
    info!("[API] Parsed {} access points", access_points.len());

    let share = req.share_info;
    let statuses = match reachable_pool(&state).await {
        Some(pool) => save_to_database(pool, &access_points, share.as_ref()).await,
        None => {
            info!("[API] Using fallback JSON storage instead of database");
            save_to_fallback(state.fallback.clone(), &access_points, share).await?
        }
    };

    let response = ShareWifiDataResponse::from_statuses(access_points.len(), &statuses);
    info!(
        processed = access_points.len(),
        created = response.created,
        skipped = response.skipped,
        errors = response.errors,
        "[API] POST access-points - complete"
    );

    Ok(Json(response))
}

/// List publicly shared access points
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<ListAccessPointsResponse>> {
    info!("[API] GET access-points - start");

    let data = match reachable_pool(&state).await {
        Some(pool) => match StoredAccessPoint::list_shared(pool).await {
            Ok(data) => data,
            Err(e) => {
                warn!("[API] Database query failed, using fallback storage: {}", e);
                list_fallback(state.fallback.clone()).await?
            }
        },
        None => list_fallback(state.fallback.clone()).await?,
    };

    info!(count = data.len(), "[API] GET access-points - complete");
    Ok(Json(ListAccessPointsResponse { success: true, data }))
}

async fn save_to_database(
    pool: &PgPool,
    access_points: &[AccessPoint],
    share: Option<&ShareInfo>,
) -> Vec<SaveStatus> {
    let mut statuses = Vec::with_capacity(access_points.len());

    for ap in access_points {
        let status = match StoredAccessPoint::find_existing(pool, ap).await {
            Ok(Some(existing)) => {
                tracing::debug!("[API] Found existing access point {}", existing.id);
                SaveStatus::Skipped
            }
            Ok(None) => match StoredAccessPoint::create(pool, ap, share).await {
                Ok(created) => {
                    tracing::debug!("[API] Created access point {}", created.id);
                    SaveStatus::Created
                }
                Err(e) => {
                    warn!("[API] Error creating access point {} ({}): {}", ap.mac, ap.ssid, e);
                    SaveStatus::Error
                }
            },
            Err(e) => {
                warn!("[API] Error processing access point {} ({}): {}", ap.mac, ap.ssid, e);
                SaveStatus::Error
            }
        };
        statuses.push(status);
    }

    statuses
}

/// The whole batch lands in one write, so it succeeds or fails as a unit
async fn save_to_fallback(
    store: FallbackStore,
    access_points: &[AccessPoint],
    share: Option<ShareInfo>,
) -> AppResult<Vec<SaveStatus>> {
    let records: Vec<StoredAccessPoint> = access_points
        .iter()
        .map(|ap| StoredAccessPoint::for_fallback(ap, share.as_ref()))
        .collect();
    let count = records.len();

    let status = match tokio::task::spawn_blocking(move || store.append(&records)).await? {
        Ok(()) => SaveStatus::Created,
        Err(e) => {
            warn!("[FALLBACK] Error saving to fallback storage: {}", e);
            SaveStatus::Error
        }
    };

    Ok(vec![status; count])
}

async fn list_fallback(store: FallbackStore) -> AppResult<Vec<StoredAccessPoint>> {
    let data = tokio::task::spawn_blocking(move || store.list_shared()).await?;
    info!("[API] Retrieved {} records from fallback storage", data.len());
    Ok(data)
}
