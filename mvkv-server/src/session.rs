use std::sync::{Arc, Mutex};

use log::{debug, info};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use mvkv::error::{CResult, Error};
use mvkv::mvcc::engine::MVCC;
use mvkv::mvcc::Version;

use crate::request::Request;
use crate::response::Response;

/// One client connection: the shared engine plus the transaction bound to
/// the session by START, if any. Commands issued while a transaction is
/// bound run under it; otherwise each command runs in its own implicit
/// transaction.
pub struct Session {
    engine: Arc<Mutex<MVCC>>,
    txn: Option<Version>,
}

impl Session {
    pub fn new(engine: Arc<Mutex<MVCC>>) -> Self {
        Self { engine, txn: None }
    }

    /// Serves the connection until the client disconnects: one JSON response
    /// line per request line, in order.
    pub async fn serve(mut self, stream: TcpStream) -> CResult<()> {
        let peer = stream.peer_addr()?;
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        while let Some(line) = lines.next_line().await? {
            let response = self.handle(&line);
            let mut payload = response.encode();
            payload.push('\n');
            writer.write_all(payload.as_bytes()).await?;
        }

        info!("client disconnected: {}", peer);
        Ok(())
    }

    /// Handles one request line and produces exactly one response. Command
    /// errors are answered, never propagated: the connection stays up and
    /// the next line is handled normally.
    pub fn handle(&mut self, line: &str) -> Response {
        match self.execute(line) {
            Ok(Some(value)) => Response::result(value),
            Ok(None) => Response::ok(),
            Err(err) => Response::error(&err),
        }
    }

    fn execute(&mut self, line: &str) -> CResult<Option<String>> {
        let request = Request::parse(line)?;
        debug!("request: {:?}", request);

        let mut engine = self.engine.lock()?;
        match request {
            Request::Get(key) => match engine.get(key.as_bytes(), self.txn)? {
                Some(value) => Ok(Some(String::from_utf8_lossy(&value).into_owned())),
                None => Err(Error::KeyNotFound),
            },
            Request::Put(key, value) => {
                engine.set(key.as_bytes(), value.into_bytes(), self.txn)?;
                Ok(None)
            }
            Request::Delete(key) => {
                engine.delete(key.as_bytes(), self.txn)?;
                Ok(None)
            }
            Request::Start => {
                if self.txn.is_some() {
                    return Err(Error::InvalidRequest("transaction already started".to_string()));
                }
                let txn = engine.begin()?;
                self.txn = Some(txn);
                Ok(None)
            }
            Request::Commit => {
                // The binding clears no matter how the commit turns out: a
                // session never stays attached to a terminal transaction.
                let txn = self
                    .txn
                    .take()
                    .ok_or_else(|| Error::InvalidRequest("no transaction started".to_string()))?;
                engine.commit(txn)?;
                Ok(None)
            }
            Request::Rollback => {
                let txn = self
                    .txn
                    .take()
                    .ok_or_else(|| Error::InvalidRequest("no transaction started".to_string()))?;
                engine.rollback(txn)?;
                Ok(None)
            }
        }
    }
}
