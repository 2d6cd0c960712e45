use serde_derive::{Deserialize, Serialize};

use mvkv::error::Error;

/// Response status over the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// The JSON object written back for every request line. `result` is present
/// on successful reads, `mesg` carries the human-readable reason on errors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: ResponseStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesg: Option<String>,
}

impl Response {
    /// A bare success, for writes and transaction control.
    pub fn ok() -> Self {
        Self { status: ResponseStatus::Ok, result: None, mesg: None }
    }

    /// A successful read carrying its value.
    pub fn result(value: String) -> Self {
        Self { status: ResponseStatus::Ok, result: Some(value), mesg: None }
    }

    /// An error response with the error's display form as the reason.
    pub fn error(err: &Error) -> Self {
        Self { status: ResponseStatus::Error, result: None, mesg: Some(err.to_string()) }
    }

    /// Serializes to a single JSON line (without the trailing newline).
    pub fn encode(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"status":"Error","mesg":"internal error"}"#.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encode_ok_omits_absent_fields() {
        assert_eq!(Response::ok().encode(), r#"{"status":"Ok"}"#);
        assert_eq!(
            Response::result("v".to_string()).encode(),
            r#"{"status":"Ok","result":"v"}"#
        );
    }

    #[test]
    fn encode_error_carries_the_reason() {
        assert_eq!(
            Response::error(&Error::KeyNotFound).encode(),
            r#"{"status":"Error","mesg":"key not found"}"#
        );
    }

    #[test]
    fn decode_round_trip() {
        let response = Response::result("Hello, World!".to_string());
        let decoded: Response = serde_json::from_str(&response.encode()).unwrap();
        assert_eq!(decoded, response);
    }
}
