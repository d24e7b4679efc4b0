//! Shared access point model

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use validator::Validate;

use crate::wifi::AccessPoint;

/// Persisted access point, as stored in PostgreSQL or the fallback file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StoredAccessPoint {
    pub id: String,
    #[serde(rename = "MAC")]
    pub mac: String,
    #[serde(rename = "SSID")]
    pub ssid: String,
    #[serde(rename = "AuthMode")]
    pub auth_mode: String,
    #[serde(rename = "FirstSeen")]
    pub first_seen: String,
    #[serde(rename = "Channel")]
    pub channel: i32,
    #[serde(rename = "RSSI")]
    pub rssi: i32,
    #[serde(rename = "CurrentLatitude")]
    pub current_latitude: f64,
    #[serde(rename = "CurrentLongitude")]
    pub current_longitude: f64,
    #[serde(rename = "AltitudeMeters")]
    pub altitude_meters: f64,
    #[serde(rename = "AccuracyMeters")]
    pub accuracy_meters: f64,
    #[serde(rename = "Type")]
    pub ap_type: String,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(rename = "uploadedBy")]
    pub uploaded_by: Option<String>,
    #[serde(rename = "sharedPublicly")]
    pub shared_publicly: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Where an upload was captured; presence marks the records as shared
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShareInfo {
    #[validate(length(min = 2, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 2, message = "State is required"))]
    pub state: String,
    pub uploaded_by: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShareWifiDataRequest {
    #[validate(length(min = 1, message = "WiFi data is required"))]
    pub wifi_data: String,
    #[validate(nested)]
    pub share_info: Option<ShareInfo>,
}

/// Outcome for a single record of a share request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    Created,
    Skipped,
    Error,
}

#[derive(Debug, Serialize)]
pub struct ShareWifiDataResponse {
    pub success: bool,
    pub message: String,
    pub created: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl ShareWifiDataResponse {
    pub fn from_statuses(processed: usize, statuses: &[SaveStatus]) -> Self {
        let count = |s: SaveStatus| statuses.iter().filter(|&&x| x == s).count();
        Self {
            success: true,
            message: format!("Processed {} access points", processed),
            created: count(SaveStatus::Created),
            skipped: count(SaveStatus::Skipped),
            errors: count(SaveStatus::Error),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListAccessPointsResponse {
    pub success: bool,
    pub data: Vec<StoredAccessPoint>,
}

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `fallback-<unix millis>-<7 base36 chars>`
pub fn fallback_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..7)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("fallback-{}-{}", Utc::now().timestamp_millis(), suffix)
}

impl StoredAccessPoint {
    /// Build a record for the fallback store, which has no database ids
    pub fn for_fallback(ap: &AccessPoint, share: Option<&ShareInfo>) -> Self {
        let now = Utc::now();
        Self {
            id: fallback_id(),
            mac: ap.mac.clone(),
            ssid: ap.ssid.clone(),
            auth_mode: ap.auth_mode.clone(),
            first_seen: ap.first_seen.clone(),
            channel: ap.channel,
            rssi: ap.rssi,
            current_latitude: ap.current_latitude,
            current_longitude: ap.current_longitude,
            altitude_meters: ap.altitude_meters,
            accuracy_meters: ap.accuracy_meters,
            ap_type: ap.kind.clone(),
            city: share.map(|s| s.city.clone()),
            state: share.map(|s| s.state.clone()),
            uploaded_by: share.and_then(|s| s.uploaded_by.clone()),
            shared_publicly: share.is_some(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Dedup lookup: same position and SSID
    pub async fn find_existing(pool: &PgPool, ap: &AccessPoint) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, StoredAccessPoint>(
            r#"
            SELECT * FROM access_points
            WHERE current_latitude = $1 AND current_longitude = $2 AND ssid = $3
            LIMIT 1
            "#
        )
        .bind(ap.current_latitude)
        .bind(ap.current_longitude)
        .bind(&ap.ssid)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(pool: &PgPool, ap: &AccessPoint, share: Option<&ShareInfo>) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, StoredAccessPoint>(
            r#"
            INSERT INTO access_points (
                mac, ssid, auth_mode, first_seen, channel, rssi,
                current_latitude, current_longitude, altitude_meters, accuracy_meters, ap_type,
                city, state, uploaded_by, shared_publicly
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#
        )
        .bind(&ap.mac)
        .bind(&ap.ssid)
        .bind(&ap.auth_mode)
        .bind(&ap.first_seen)
        .bind(ap.channel)
        .bind(ap.rssi)
        .bind(ap.current_latitude)
        .bind(ap.current_longitude)
        .bind(ap.altitude_meters)
        .bind(ap.accuracy_meters)
        .bind(&ap.kind)
        .bind(share.map(|s| s.city.as_str()))
        .bind(share.map(|s| s.state.as_str()))
        .bind(share.and_then(|s| s.uploaded_by.as_deref()))
        .bind(share.is_some())
        .fetch_one(pool)
        .await
    }

    pub async fn list_shared(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, StoredAccessPoint>(
            "SELECT * FROM access_points WHERE shared_publicly = true ORDER BY created_at DESC"
        )
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share() -> ShareInfo {
        ShareInfo {
            city: "Austin".to_string(),
            state: "TX".to_string(),
            uploaded_by: Some("kim".to_string()),
        }
    }

    #[test]
    fn test_fallback_id_format() {
        let id = fallback_id();
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "fallback");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 7);
        assert!(parts[2].bytes().all(|b| ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_for_fallback_copies_share_info() {
        let ap = AccessPoint {
            mac: "AA".to_string(),
            ssid: "net".to_string(),
            kind: "WIFI".to_string(),
            ..Default::default()
        };

        let shared = StoredAccessPoint::for_fallback(&ap, Some(&share()));
        assert!(shared.shared_publicly);
        assert_eq!(shared.city.as_deref(), Some("Austin"));
        assert_eq!(shared.uploaded_by.as_deref(), Some("kim"));
        assert_eq!(shared.ap_type, "WIFI");

        let private = StoredAccessPoint::for_fallback(&ap, None);
        assert!(!private.shared_publicly);
        assert!(private.city.is_none());
    }

    #[test]
    fn test_request_validation() {
        let ok = ShareWifiDataRequest {
            wifi_data: "x".to_string(),
            share_info: Some(share()),
        };
        assert!(ok.validate().is_ok());

        let empty = ShareWifiDataRequest {
            wifi_data: String::new(),
            share_info: None,
        };
        assert!(empty.validate().is_err());

        let short_city = ShareWifiDataRequest {
            wifi_data: "x".to_string(),
            share_info: Some(ShareInfo { city: "A".to_string(), ..share() }),
        };
        assert!(short_city.validate().is_err());
    }

    #[test]
    fn test_response_counts() {
        let statuses = [SaveStatus::Created, SaveStatus::Skipped, SaveStatus::Created, SaveStatus::Error];
        let resp = ShareWifiDataResponse::from_statuses(4, &statuses);
        assert_eq!(resp.message, "Processed 4 access points");
        assert_eq!((resp.created, resp.skipped, resp.errors), (2, 1, 1));
    }
}
