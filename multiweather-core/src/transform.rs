//! Response-to-canonical-record plumbing shared by all vendors: the
//! expected-timestamp grid, merge-by-timestamp insertion, unit conversions and
//! error-message synthesis for non-success responses.

use chrono::DateTime;
use serde_json::{Map, Value};

use crate::model::StationReading;
use crate::timezone::{self, StationWindow};
use crate::vendor::VendorId;

/// Round to two decimals, the precision every derived measurement carries.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn f_to_c(f: f64) -> f64 {
    round2((f - 32.0) * 5.0 / 9.0)
}

pub fn inches_to_mm(inches: f64) -> f64 {
    round2(inches * 25.4)
}

/// Accepts JSON numbers and numeric strings; some vendors quote their values.
pub fn json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Case-insensitive object lookup; vendors disagree on key capitalization.
pub fn case_insensitive_get<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
}

/// Synthesize a human-readable error from a non-success response body.
///
/// Prefers a case-insensitive `Message` key in a JSON body, then the body
/// itself, then the HTTP status reason (some vendors send an empty body on
/// auth failures).
pub fn error_message(body: &str, reason: Option<&str>) -> String {
    let body = body.trim();
    if body.is_empty() {
        return reason.unwrap_or("request failed").to_string();
    }
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(msg) = case_insensitive_get(&map, "message") {
            return match msg {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
        }
    }
    truncate_body(body)
}

pub fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    // Back off to a char boundary; vendors send non-ASCII error bodies.
    let mut cut = MAX;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &body[..cut])
}

/// Canonical records for one request, pre-populated across the vendor's
/// expected reporting grid so missing vendor data points surface as `None`
/// rather than being silently absent.
#[derive(Debug, Clone)]
pub struct RecordSet {
    station_id: String,
    request_datetime: String,
    records: Vec<StationReading>,
}

impl RecordSet {
    /// Build the expected-timestamp grid for the window: the first slot is the
    /// start rounded up to the vendor cadence, stepping inclusively to the end.
    pub fn grid(
        vendor: VendorId,
        station_id: &str,
        request_datetime: &str,
        window: &StationWindow,
    ) -> Self {
        let step = i64::from(vendor.cadence_minutes()) * 60;
        let end = window.end_utc.timestamp();
        let mut t = window.start_utc.timestamp();
        let rem = t.rem_euclid(step);
        if rem != 0 {
            t += step - rem;
        }

        let mut records = Vec::new();
        while t <= end {
            if let Some(dt) = DateTime::from_timestamp(t, 0) {
                records.push(StationReading {
                    station_id: station_id.to_string(),
                    request_datetime: request_datetime.to_string(),
                    data_datetime: timezone::format_utc(dt),
                    atemp: None,
                    pcpn: None,
                    relh: None,
                });
            }
            t += step;
        }

        Self {
            station_id: station_id.to_string(),
            request_datetime: request_datetime.to_string(),
            records,
        }
    }

    /// Merge vendor data into the record for `data_datetime`. Off-grid
    /// timestamps are appended rather than dropped.
    pub fn update(&mut self, data_datetime: &str, apply: impl FnOnce(&mut StationReading)) {
        if let Some(rec) = self.records.iter_mut().find(|r| r.data_datetime == data_datetime) {
            apply(rec);
            return;
        }
        let mut rec = StationReading {
            station_id: self.station_id.clone(),
            request_datetime: self.request_datetime.clone(),
            data_datetime: data_datetime.to_string(),
            atemp: None,
            pcpn: None,
            relh: None,
        };
        apply(&mut rec);
        self.records.push(rec);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<StationReading> {
        self.records
    }
}
