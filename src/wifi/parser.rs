//! Wigle WiFi Parser
//!
//! Converts a Wigle WiFi CSV export into [`AccessPoint`] records.
//!
//! ```text
//! WigleWifi-1.4,appRelease=...,device=...            <- metadata, ignored
//! MAC,SSID,AuthMode,FirstSeen,Channel,RSSI,...       <- header
//! 72:8C:52:2B:9F:7B,SkyCerda,[WPA2_PSK],...          <- one record per line
//! ```
//!
//! Parsing never fails. Missing or malformed numeric fields become `0`;
//! strict mode reports each of those as a [`FieldWarning`].

use serde::Serialize;

use super::types::AccessPoint;

/// Token sequence identifying the header line
pub const HEADER_MARKER: &str = "MAC,SSID,AuthMode";

// Column positions
const COL_MAC: usize = 0;
const COL_SSID: usize = 1;
const COL_AUTH_MODE: usize = 2;
const COL_FIRST_SEEN: usize = 3;
const COL_CHANNEL: usize = 4;
const COL_RSSI: usize = 5;
const COL_LATITUDE: usize = 6;
const COL_LONGITUDE: usize = 7;
const COL_ALTITUDE: usize = 8;
const COL_ACCURACY: usize = 9;
const COL_TYPE: usize = 10;

// ============================================================================
// OPTIONS + REPORT
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Collect a warning for every numeric field that was defaulted or
    /// only partially parsed
    pub strict: bool,
}

/// Why a numeric field did not parse cleanly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Column absent from the line
    Missing,
    /// No numeric prefix, defaulted to 0
    NotNumeric,
    /// Numeric prefix used, remaining characters dropped
    TrailingCharacters,
    /// Integer does not fit, defaulted to 0
    OutOfRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldWarning {
    /// 1-based line number in the input
    pub line: usize,
    pub field: &'static str,
    pub value: String,
    pub kind: WarningKind,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseReport {
    pub access_points: Vec<AccessPoint>,
    pub warnings: Vec<FieldWarning>,
}

// ============================================================================
// PARSING
// ============================================================================

/// Parse a Wigle WiFi export, silently defaulting malformed fields.
pub fn parse_wigle_wifi_data(data: &str) -> Vec<AccessPoint> {
    parse_report(data, ParseOptions::default()).access_points
}

/// Parse a Wigle WiFi export, optionally collecting per-field warnings.
///
/// Without a header line the first line is still consumed as the header.
pub fn parse_report(data: &str, options: ParseOptions) -> ParseReport {
    let lines: Vec<&str> = data.lines().collect();

    let header_index = lines
        .iter()
        .position(|line| line.contains(HEADER_MARKER))
        .unwrap_or(0);

    let mut report = ParseReport::default();

    for (index, line) in lines.iter().enumerate().skip(header_index + 1) {
        if line.trim().is_empty() {
            continue;
        }

        let mut row = RowParser {
            values: line.split(',').collect(),
            line: index + 1,
            warnings: options.strict.then(Vec::new),
        };

        let access_point = AccessPoint {
            mac: row.text(COL_MAC),
            ssid: row.text(COL_SSID),
            auth_mode: row.text(COL_AUTH_MODE).replace(['[', ']'], ""),
            first_seen: row.text(COL_FIRST_SEEN),
            channel: row.int(COL_CHANNEL, "Channel"),
            rssi: row.int(COL_RSSI, "RSSI"),
            current_latitude: row.float(COL_LATITUDE, "CurrentLatitude"),
            current_longitude: row.float(COL_LONGITUDE, "CurrentLongitude"),
            altitude_meters: row.float(COL_ALTITUDE, "AltitudeMeters"),
            accuracy_meters: row.float(COL_ACCURACY, "AccuracyMeters"),
            kind: row.text(COL_TYPE),
        };

        if let Some(warnings) = row.warnings {
            report.warnings.extend(warnings);
        }
        report.access_points.push(access_point);
    }

    tracing::debug!(
        "Parsed {} access points ({} warnings)",
        report.access_points.len(),
        report.warnings.len()
    );

    report
}

/// Positional field access for one data line
struct RowParser<'a> {
    values: Vec<&'a str>,
    line: usize,
    warnings: Option<Vec<FieldWarning>>,
}

impl RowParser<'_> {
    fn text(&self, col: usize) -> String {
        self.values.get(col).map(|v| v.to_string()).unwrap_or_default()
    }

    fn int(&mut self, col: usize, field: &'static str) -> i32 {
        let raw = self.values.get(col).copied();
        let parsed = raw.map(parse_int_prefix).unwrap_or(Numeric::Invalid);
        self.resolve(raw, parsed, field)
    }

    fn float(&mut self, col: usize, field: &'static str) -> f64 {
        let raw = self.values.get(col).copied();
        let parsed = raw.map(parse_float_prefix).unwrap_or(Numeric::Invalid);
        self.resolve(raw, parsed, field)
    }

    fn resolve<T: Default>(&mut self, raw: Option<&str>, parsed: Numeric<T>, field: &'static str) -> T {
        let (value, kind) = match (raw, parsed) {
            (_, Numeric::Exact(v)) => (v, None),
            (_, Numeric::Prefix(v)) => (v, Some(WarningKind::TrailingCharacters)),
            (_, Numeric::Overflow) => (T::default(), Some(WarningKind::OutOfRange)),
            (None, Numeric::Invalid) => (T::default(), Some(WarningKind::Missing)),
            (Some(_), Numeric::Invalid) => (T::default(), Some(WarningKind::NotNumeric)),
        };

        if let (Some(warnings), Some(kind)) = (self.warnings.as_mut(), kind) {
            warnings.push(FieldWarning {
                line: self.line,
                field,
                value: raw.unwrap_or_default().to_string(),
                kind,
            });
        }

        value
    }
}

// ============================================================================
// PERMISSIVE NUMBERS
// ============================================================================

/// Result of leading-prefix numeric conversion
#[derive(Debug, Clone, Copy, PartialEq)]
enum Numeric<T> {
    /// Whole field (ignoring surrounding whitespace) was numeric
    Exact(T),
    /// Only a leading prefix was numeric
    Prefix(T),
    Overflow,
    Invalid,
}

/// Length of the run of ASCII digits at the start of `bytes`
fn digit_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn sign_len(bytes: &[u8]) -> usize {
    usize::from(matches!(bytes.first(), Some(b'+' | b'-')))
}

/// Integer conversion that takes the longest `[+-]?[0-9]+` prefix after
/// leading whitespace, so `"6abc"` and `"6.9"` both give 6.
fn parse_int_prefix(raw: &str) -> Numeric<i32> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let sign = sign_len(bytes);
    let digits = digit_run(&bytes[sign..]);
    if digits == 0 {
        return Numeric::Invalid;
    }

    let end = sign + digits;
    let Ok(value) = s[..end].parse::<i32>() else {
        return Numeric::Overflow;
    };

    if s[end..].trim().is_empty() {
        Numeric::Exact(value)
    } else {
        Numeric::Prefix(value)
    }
}

/// Float conversion over the longest decimal prefix (sign, digits, optional
/// fraction, optional exponent) after leading whitespace.
fn parse_float_prefix(raw: &str) -> Numeric<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();

    let mut end = sign_len(bytes);
    let int_digits = digit_run(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digit_run(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return Numeric::Invalid;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp_start = end + 1;
        let exp_sign = sign_len(&bytes[exp_start..]);
        let exp_digits = digit_run(&bytes[exp_start + exp_sign..]);
        if exp_digits > 0 {
            end = exp_start + exp_sign + exp_digits;
        }
    }

    let Ok(value) = s[..end].parse::<f64>() else {
        return Numeric::Invalid;
    };
    if !value.is_finite() {
        return Numeric::Overflow;
    }

    if s[end..].trim().is_empty() {
        Numeric::Exact(value)
    } else {
        Numeric::Prefix(value)
    }
}

// ============================================================================
// TESTS
// ============================================================================
