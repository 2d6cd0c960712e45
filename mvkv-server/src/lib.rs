//! `mvkv` network server. One TCP connection carries one session: a client
//! writes one request per line and reads back one JSON object per line.
//! [Author fengyang]
//!
//! ## Getting started
//!
//! ```doc
//! ❯ ./mvkv-server
//!
//! ███    ███ ██    ██ ██   ██ ██    ██
//! ████  ████ ██    ██ ██  ██  ██    ██
//! ██ ████ ██ ██    ██ █████   ██    ██  MVCC KV Storage
//! ██  ██  ██  ██  ██  ██  ██   ██  ██
//! ██      ██   ████   ██   ██   ████
//!
//! mvkv-server listening on 127.0.0.1:4000
//!
//! ❯ nc 127.0.0.1 4000
//! GET intro
//! {"status":"Ok","result":"Hello, World!"}
//!
//! START
//! {"status":"Ok"}
//!
//! PUT order_key some value with spaces
//! {"status":"Ok"}
//!
//! GET order_key
//! {"status":"Ok","result":"some value with spaces"}
//!
//! COMMIT
//! {"status":"Ok"}
//!
//! DEL order_key
//! {"status":"Error","mesg":"invalid request"}
//! ```

pub mod config;
pub mod request;
pub mod response;
pub mod session;
pub mod trace;
