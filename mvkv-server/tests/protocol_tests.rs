use std::sync::{Arc, Mutex};

use anyhow::Result;
use serde_json::Value;

use mvkv::clock::LogicalClock;
use mvkv::mvcc::engine::MVCC;
use mvkv_server::session::Session;

fn session() -> Session {
    Session::new(Arc::new(Mutex::new(MVCC::new(Box::new(LogicalClock::new())))))
}

fn roundtrip(session: &mut Session, line: &str) -> Result<Value> {
    Ok(serde_json::from_str(&session.handle(line).encode())?)
}

#[test]
fn every_response_is_a_json_object_with_a_status() -> Result<()> {
    let mut session = session();

    for line in ["PUT a 1", "GET a", "DELETE a", "START", "COMMIT", "", "junk", "GET missing"] {
        let value = roundtrip(&mut session, line)?;
        let object = value.as_object().expect("response must be a JSON object");
        let status = object.get("status").and_then(Value::as_str).expect("status must be a string");
        assert!(status == "Ok" || status == "Error", "line {:?} gave status {:?}", line, status);
    }

    Ok(())
}

#[test]
fn ok_responses_omit_mesg_and_errors_omit_result() -> Result<()> {
    let mut session = session();

    let value = roundtrip(&mut session, "PUT a 1")?;
    assert_eq!(value["status"], "Ok");
    assert!(value.get("result").is_none());
    assert!(value.get("mesg").is_none());

    let value = roundtrip(&mut session, "GET a")?;
    assert_eq!(value["status"], "Ok");
    assert_eq!(value["result"], "1");
    assert!(value.get("mesg").is_none());

    let value = roundtrip(&mut session, "GET missing")?;
    assert_eq!(value["status"], "Error");
    assert_eq!(value["mesg"], "key not found");
    assert!(value.get("result").is_none());

    Ok(())
}

#[test]
fn malformed_input_reasons() -> Result<()> {
    let mut session = session();

    let value = roundtrip(&mut session, "")?;
    assert_eq!(value["status"], "Error");
    assert_eq!(value["mesg"], "no arguments specified");

    for line in ["PUT k", "DELETE", "NOSUCH k"] {
        let value = roundtrip(&mut session, line)?;
        assert_eq!(value["status"], "Error", "line: {:?}", line);
        assert_eq!(value["mesg"], "invalid request", "line: {:?}", line);
    }

    Ok(())
}

#[test]
fn protocol_errors_leave_no_transaction_state_behind() -> Result<()> {
    let mut session = session();

    // Malformed lines are rejected before they reach the engine: a START
    // after any number of them still succeeds, and the bound transaction
    // behaves normally.
    assert_eq!(roundtrip(&mut session, "PUT k")?["status"], "Error");
    assert_eq!(roundtrip(&mut session, "")?["status"], "Error");

    assert_eq!(roundtrip(&mut session, "START")?["status"], "Ok");
    assert_eq!(roundtrip(&mut session, "PUT k v")?["status"], "Ok");
    assert_eq!(roundtrip(&mut session, "COMMIT")?["status"], "Ok");
    assert_eq!(roundtrip(&mut session, "GET k")?["result"], "v");

    Ok(())
}
