//! Shared domain models: the caller-facing request bag, the canonical
//! per-timestamp reading record, and the uniform raw-response envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParamError;
use crate::timezone::{self, StationWindow, TzCode};
use crate::transform;
use crate::vendor::VendorId;

/// One canonical reading: air temperature (°C), precipitation (mm) and
/// relative humidity (%), any of which may be absent for a given timestamp.
///
/// `data_datetime` is a UTC `YYYY-MM-DD HH:MM:SS` stamp and keys the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationReading {
    pub station_id: String,
    pub request_datetime: String,
    pub data_datetime: String,
    pub atemp: Option<f64>,
    pub pcpn: Option<f64>,
    pub relh: Option<f64>,
}

/// Uniform wrapper around a vendor response so callers can inspect
/// success/failure without vendor-specific branching.
///
/// `start_datetime`, `end_datetime` and `request_time` are rendered in the
/// station's local timezone; `api_output` holds the untouched vendor JSON
/// payload(s) — more than one for vendors that answer a window in chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingsEnvelope {
    pub vendor: String,
    pub station_id: String,
    pub timezone: String,
    pub start_datetime: String,
    pub end_datetime: String,
    pub request_time: String,
    pub binding_version: String,
    pub error_msg: String,
    pub status_code: u16,
    pub api_output: Vec<serde_json::Value>,
}

impl ReadingsEnvelope {
    pub fn new(
        vendor: VendorId,
        station_id: &str,
        window: &StationWindow,
        request_time: &str,
    ) -> Self {
        Self {
            vendor: vendor.to_string(),
            station_id: station_id.to_string(),
            timezone: window.tz.to_string(),
            start_datetime: timezone::format_local(window.start_local()),
            end_datetime: timezone::format_local(window.end_local()),
            request_time: request_time.to_string(),
            binding_version: crate::BINDING_VERSION.to_string(),
            error_msg: String::new(),
            status_code: 200,
            api_output: Vec::new(),
        }
    }

    /// Fold a non-success HTTP response into the envelope instead of failing.
    pub fn record_failure(&mut self, status: u16, body: &str, reason: Option<&str>) {
        self.status_code = status;
        self.error_msg = transform::error_message(body, reason);
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200 && self.error_msg.is_empty()
    }
}

/// The raw envelope paired with the canonical record set.
#[derive(Debug, Clone, Serialize)]
pub struct StationReadings {
    pub raw: ReadingsEnvelope,
    pub records: Vec<StationReading>,
}

/// Optional Onset sensor-serial routing: readings are matched to a canonical
/// field by the serial of the sensor that produced them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorMap {
    pub atemp: Option<String>,
    pub pcpn: Option<String>,
    pub relh: Option<String>,
}

/// Caller-supplied parameters, a superset over all six vendors. Each vendor's
/// parameter object validates the subset it needs and ignores the rest.
#[derive(Debug, Clone, Default)]
pub struct ReadingRequest {
    /// Device serial number (Zentra, Davis, Onset, Spectrum).
    pub sn: Option<String>,
    pub apikey: Option<String>,
    pub apisec: Option<String>,
    pub token: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub ret_form: Option<String>,
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub user_passwd: Option<String>,
    pub station_id: Option<String>,
    pub station_lid: Option<String>,
    pub sid: Option<String>,
    pub pid: Option<String>,
    pub mac: Option<String>,
    pub sensor_sn: Option<SensorMap>,
    pub interval: Option<u32>,
    pub count: Option<u32>,
    pub start_mrid: Option<i64>,
    pub end_mrid: Option<i64>,
    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
    /// Station timezone code, see [`TzCode`].
    pub tz: Option<String>,
}

impl ReadingRequest {
    /// Validate the requested window and timezone.
    pub fn window(&self) -> Result<StationWindow, ParamError> {
        let (Some(start), Some(end)) = (self.start_datetime, self.end_datetime) else {
            return Err(ParamError::MissingWindow);
        };
        let Some(tz) = non_empty(&self.tz) else {
            return Err(ParamError::MissingTimezone);
        };
        let tz = TzCode::try_from(tz.as_str())?;
        StationWindow::new(start, end, tz)
    }
}

/// Treat empty and whitespace-only strings like absent parameters.
pub(crate) fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window_request() -> ReadingRequest {
        ReadingRequest {
            start_datetime: Some(Utc.with_ymd_and_hms(2022, 2, 16, 13, 0, 0).unwrap()),
            end_datetime: Some(Utc.with_ymd_and_hms(2022, 2, 16, 14, 30, 0).unwrap()),
            tz: Some("ET".to_string()),
            ..ReadingRequest::default()
        }
    }

    #[test]
    fn window_requires_both_endpoints() {
        let mut req = window_request();
        req.end_datetime = None;
        assert_eq!(req.window().unwrap_err(), ParamError::MissingWindow);
    }

    #[test]
    fn window_requires_timezone() {
        let mut req = window_request();
        req.tz = Some("   ".to_string());
        assert_eq!(req.window().unwrap_err(), ParamError::MissingTimezone);
    }

    #[test]
    fn window_rejects_swapped_endpoints() {
        let mut req = window_request();
        std::mem::swap(&mut req.start_datetime, &mut req.end_datetime);
        assert_eq!(req.window().unwrap_err(), ParamError::WindowOrder);
    }

    #[test]
    fn window_renders_local_endpoints() {
        let window = window_request().window().unwrap();
        assert_eq!(timezone::format_local(window.start_local()), "2022-02-16 08:00:00");
        assert_eq!(timezone::format_local(window.end_local()), "2022-02-16 09:30:00");
    }

    #[test]
    fn envelope_starts_successful() {
        let window = window_request().window().unwrap();
        let env = ReadingsEnvelope::new(VendorId::Spectrum, "50400123", &window, "2022-02-16 09:31:02");
        assert!(env.is_success());
        assert_eq!(env.vendor, "spectrum");
        assert_eq!(env.timezone, "ET");
        assert_eq!(env.start_datetime, "2022-02-16 08:00:00");
        assert_eq!(env.binding_version, crate::BINDING_VERSION);
        assert!(env.api_output.is_empty());
    }

    #[test]
    fn record_failure_synthesizes_error() {
        let window = window_request().window().unwrap();
        let mut env =
            ReadingsEnvelope::new(VendorId::Spectrum, "50400123", &window, "2022-02-16 09:31:02");
        env.record_failure(403, r#"{"Message": "Invalid API key"}"#, Some("Forbidden"));
        assert!(!env.is_success());
        assert_eq!(env.status_code, 403);
        assert_eq!(env.error_msg, "Invalid API key");
    }

    #[test]
    fn non_empty_filters_blank_values() {
        assert_eq!(non_empty(&Some("  x ".to_string())), Some("x".to_string()));
        assert_eq!(non_empty(&Some("   ".to_string())), None);
        assert_eq!(non_empty(&None), None);
    }
}
