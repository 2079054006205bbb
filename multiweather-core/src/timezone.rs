//! Station timezone handling.
//!
//! Vendors accept and report wall-clock times in the station's local timezone,
//! while the canonical records are keyed by UTC. The supported timezones are a
//! fixed two-letter table covering the US reporting networks; conversions are
//! DST-aware via the tz database.

use chrono::offset::LocalResult;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::ParamError;

/// `YYYY-MM-DD HH:MM:SS`, the format used for envelope and record datetimes.
pub const FMT_SECONDS: &str = "%Y-%m-%d %H:%M:%S";

/// `YYYY-MM-DD HH:MM`, used by vendors that report minute-resolution stamps.
pub const FMT_MINUTES: &str = "%Y-%m-%d %H:%M";

/// Two-letter station timezone code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TzCode {
    Ht,
    At,
    Pt,
    Mt,
    Ct,
    Et,
}

impl TzCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TzCode::Ht => "HT",
            TzCode::At => "AT",
            TzCode::Pt => "PT",
            TzCode::Mt => "MT",
            TzCode::Ct => "CT",
            TzCode::Et => "ET",
        }
    }

    pub const fn all() -> &'static [TzCode] {
        &[TzCode::Ht, TzCode::At, TzCode::Pt, TzCode::Mt, TzCode::Ct, TzCode::Et]
    }

    fn tz(self) -> Tz {
        match self {
            TzCode::Ht => chrono_tz::US::Hawaii,
            TzCode::At => chrono_tz::US::Alaska,
            TzCode::Pt => chrono_tz::US::Pacific,
            TzCode::Mt => chrono_tz::US::Mountain,
            TzCode::Ct => chrono_tz::US::Central,
            TzCode::Et => chrono_tz::US::Eastern,
        }
    }
}

impl std::fmt::Display for TzCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TzCode {
    type Error = ParamError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_uppercase().as_str() {
            "HT" => Ok(TzCode::Ht),
            "AT" => Ok(TzCode::At),
            "PT" => Ok(TzCode::Pt),
            "MT" => Ok(TzCode::Mt),
            "CT" => Ok(TzCode::Ct),
            "ET" => Ok(TzCode::Et),
            _ => Err(ParamError::UnknownTimezone),
        }
    }
}

/// Convert a UTC instant to station-local wall-clock time.
pub fn utc_to_local(dt: DateTime<Utc>, code: TzCode) -> NaiveDateTime {
    dt.with_timezone(&code.tz()).naive_local()
}

/// Convert station-local wall-clock time back to UTC.
///
/// During a DST fall-back the earlier of the two candidate instants wins; a
/// wall-clock time inside the spring-forward gap is an error.
pub fn local_to_utc(local: NaiveDateTime, code: TzCode) -> Result<DateTime<Utc>, ParamError> {
    match code.tz().from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(ParamError::NonexistentLocalTime {
            local: local.format(FMT_SECONDS).to_string(),
            tz: code.to_string(),
        }),
    }
}

pub fn format_local(dt: NaiveDateTime) -> String {
    dt.format(FMT_SECONDS).to_string()
}

pub fn format_utc(dt: DateTime<Utc>) -> String {
    dt.naive_utc().format(FMT_SECONDS).to_string()
}

pub fn parse_seconds(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, FMT_SECONDS)
}

pub fn parse_minutes(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, FMT_MINUTES)
}

/// Accepts stamps with or without a seconds component.
pub fn parse_flexible(s: &str) -> Option<NaiveDateTime> {
    parse_seconds(s).ok().or_else(|| parse_minutes(s).ok())
}

/// A validated request window: UTC endpoints plus the station timezone used to
/// render vendor-local wire formats.
#[derive(Debug, Clone, Copy)]
pub struct StationWindow {
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
    pub tz: TzCode,
}

impl StationWindow {
    pub fn new(
        start_utc: DateTime<Utc>,
        end_utc: DateTime<Utc>,
        tz: TzCode,
    ) -> Result<Self, ParamError> {
        if start_utc >= end_utc {
            return Err(ParamError::WindowOrder);
        }
        Ok(Self { start_utc, end_utc, tz })
    }

    pub fn start_local(&self) -> NaiveDateTime {
        utc_to_local(self.start_utc, self.tz)
    }

    pub fn end_local(&self) -> NaiveDateTime {
        utc_to_local(self.end_utc, self.tz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn tz_code_roundtrip() {
        for code in TzCode::all() {
            let parsed = TzCode::try_from(code.as_str()).expect("roundtrip should succeed");
            assert_eq!(*code, parsed);
        }
    }

    #[test]
    fn tz_code_is_case_insensitive() {
        assert_eq!(TzCode::try_from("et").unwrap(), TzCode::Et);
    }

    #[test]
    fn unknown_tz_code_errors() {
        assert_eq!(TzCode::try_from("XX").unwrap_err(), ParamError::UnknownTimezone);
    }

    #[test]
    fn eastern_winter_offset_is_five_hours() {
        let local = utc_to_local(utc(2022, 2, 16, 13, 0), TzCode::Et);
        assert_eq!(format_local(local), "2022-02-16 08:00:00");
    }

    #[test]
    fn eastern_summer_offset_is_four_hours() {
        let local = utc_to_local(utc(2022, 7, 16, 13, 0), TzCode::Et);
        assert_eq!(format_local(local), "2022-07-16 09:00:00");
    }

    #[test]
    fn local_to_utc_inverts_utc_to_local() {
        let instant = utc(2022, 2, 16, 13, 0);
        let local = utc_to_local(instant, TzCode::Pt);
        assert_eq!(local_to_utc(local, TzCode::Pt).unwrap(), instant);
    }

    #[test]
    fn spring_forward_gap_is_rejected() {
        // 2022-03-13 02:30 does not exist in US/Eastern.
        let local = parse_seconds("2022-03-13 02:30:00").unwrap();
        let err = local_to_utc(local, TzCode::Et).unwrap_err();
        assert!(matches!(err, ParamError::NonexistentLocalTime { .. }));
    }

    #[test]
    fn window_rejects_reversed_endpoints() {
        let err = StationWindow::new(utc(2022, 2, 16, 14, 0), utc(2022, 2, 16, 13, 0), TzCode::Et)
            .unwrap_err();
        assert_eq!(err, ParamError::WindowOrder);
    }

    #[test]
    fn parse_flexible_handles_both_resolutions() {
        assert!(parse_flexible("2022-02-16 13:00:00").is_some());
        assert!(parse_flexible("2022-02-16 13:00").is_some());
        assert!(parse_flexible("not a date").is_none());
    }
}
