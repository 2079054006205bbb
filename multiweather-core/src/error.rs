use thiserror::Error;

/// Validation failures raised while turning a [`crate::ReadingRequest`] into a
/// vendor parameter object. Message texts are part of the public surface and
/// stay stable; callers match on them in scripts and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("\"vendor\" must be specified and in the approved vendor list")]
    UnknownVendor,

    #[error("start_datetime and end_datetime must both be specified")]
    MissingWindow,

    #[error("start_datetime must be earlier than end_datetime")]
    WindowOrder,

    #[error("if start_datetime or end_datetime is specified, tz must be specified")]
    MissingTimezone,

    #[error("time zone options: HT, AT, PT, MT, CT, ET")]
    UnknownTimezone,

    /// A pair of credential fields was missing or empty, e.g. `"sn" and "token"`.
    #[error("{0} parameters must both be included")]
    MissingCredentials(&'static str),

    /// A single required field was missing or empty, e.g. `"user_id"`.
    #[error("{0} parameter must be included")]
    MissingParameter(&'static str),

    #[error("ret_form must be specified and currently only '{0}' is supported")]
    UnsupportedFormat(&'static str),

    #[error("username and mac parameters must be included and same value")]
    UsernameMacMismatch,

    #[error("sid and pid parameters must be included and same value")]
    SidPidMismatch,

    /// The local wall-clock time falls into a DST gap for the station timezone.
    #[error("local time {local} does not exist in time zone {tz}")]
    NonexistentLocalTime { local: String, tz: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_message_lists_fields() {
        let err = ParamError::MissingCredentials("\"sn\" and \"token\"");
        assert_eq!(
            err.to_string(),
            "\"sn\" and \"token\" parameters must both be included"
        );
    }

    #[test]
    fn missing_parameter_message_is_singular() {
        let err = ParamError::MissingParameter("\"sn\"");
        assert_eq!(err.to_string(), "\"sn\" parameter must be included");
    }

    #[test]
    fn timezone_options_message_is_stable() {
        assert_eq!(
            ParamError::UnknownTimezone.to_string(),
            "time zone options: HT, AT, PT, MT, CT, ET"
        );
    }
}
