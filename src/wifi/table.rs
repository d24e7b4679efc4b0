//! Data table view: search filter and column sort

use std::cmp::Ordering;

use serde::Deserialize;

use super::classify::security_level;
use super::types::AccessPoint;

/// Sortable table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum SortKey {
    #[serde(rename = "MAC")]
    Mac,
    #[serde(rename = "SSID")]
    Ssid,
    #[serde(rename = "AuthMode")]
    AuthMode,
    #[serde(rename = "FirstSeen")]
    FirstSeen,
    #[serde(rename = "Channel")]
    Channel,
    #[default]
    #[serde(rename = "RSSI")]
    Rssi,
    #[serde(rename = "Type")]
    Type,
    /// Security level, weakest to strongest
    #[serde(rename = "security")]
    Security,
    /// Signal icon column, ordered by RSSI
    #[serde(rename = "signal")]
    Signal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Keep records whose SSID, MAC or auth mode contains `term`
/// (case-insensitive). An empty term keeps everything.
pub fn filter_access_points<'a>(access_points: &'a [AccessPoint], term: &str) -> Vec<&'a AccessPoint> {
    let needle = term.to_lowercase();
    access_points
        .iter()
        .filter(|ap| {
            ap.ssid.to_lowercase().contains(&needle)
                || ap.mac.to_lowercase().contains(&needle)
                || ap.auth_mode.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Stable sort by column
pub fn sort_access_points(access_points: &mut [&AccessPoint], key: SortKey, direction: SortDirection) {
    access_points.sort_by(|a, b| {
        let ordering = compare(a, b, key);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare(a: &AccessPoint, b: &AccessPoint, key: SortKey) -> Ordering {
    match key {
        SortKey::Mac => compare_text(&a.mac, &b.mac),
        SortKey::Ssid => compare_text(&a.ssid, &b.ssid),
        SortKey::AuthMode => compare_text(&a.auth_mode, &b.auth_mode),
        SortKey::FirstSeen => compare_text(&a.first_seen, &b.first_seen),
        SortKey::Type => compare_text(&a.kind, &b.kind),
        SortKey::Channel => a.channel.cmp(&b.channel),
        SortKey::Rssi | SortKey::Signal => a.rssi.cmp(&b.rssi),
        SortKey::Security => security_level(&a.auth_mode).cmp(&security_level(&b.auth_mode)),
    }
}

/// Case-insensitive order; on a case-only difference lowercase sorts first
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}
