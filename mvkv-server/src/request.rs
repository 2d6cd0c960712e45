use mvkv::error::{CResult, Error};

/// A single parsed line of the wire protocol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    Get(String),
    Put(String, String),
    Delete(String),
    Start,
    Commit,
    Rollback,
}

fn invalid() -> Error {
    Error::InvalidRequest("invalid request".to_string())
}

impl Request {
    /// Parses one request line. Tokens are separated by single spaces; the
    /// value of PUT is the remainder of the line after the second space and
    /// may itself contain spaces (but never newlines, which the line framing
    /// already stripped).
    pub fn parse(line: &str) -> CResult<Request> {
        if line.is_empty() {
            return Err(Error::InvalidRequest("no arguments specified".to_string()));
        }

        let mut parts = line.splitn(3, ' ');
        let command = parts.next().unwrap_or_default();
        let key = parts.next();
        let rest = parts.next();

        match command {
            "GET" => match (key, rest) {
                (Some(key), None) if !key.is_empty() => Ok(Request::Get(key.to_string())),
                _ => Err(invalid()),
            },
            "PUT" => match (key, rest) {
                (Some(key), Some(value)) if !key.is_empty() => {
                    Ok(Request::Put(key.to_string(), value.to_string()))
                }
                _ => Err(invalid()),
            },
            "DELETE" => match (key, rest) {
                (Some(key), None) if !key.is_empty() => Ok(Request::Delete(key.to_string())),
                _ => Err(invalid()),
            },
            "START" => match key {
                None => Ok(Request::Start),
                Some(_) => Err(invalid()),
            },
            "COMMIT" => match key {
                None => Ok(Request::Commit),
                Some(_) => Err(invalid()),
            },
            "ROLLBACK" => match key {
                None => Ok(Request::Rollback),
                Some(_) => Err(invalid()),
            },
            _ => Err(invalid()),
        }
    }
}
