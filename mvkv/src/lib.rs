//! `mvkv` is an in-memory multi-version (MVCC) key-value store. Writes never
//! overwrite: every put appends a new record version tagged with the writing
//! transaction, and deletes append a tombstoned copy of the prior version.
//! Readers select the version visible at their own start timestamp, so
//! readers never block writers and writers never block readers. [Author fengyang]
//!
//! ## Getting started
//!
//! ```rust
//! use mvkv::clock::SystemClock;
//! use mvkv::error::CResult;
//! use mvkv::mvcc::engine::MVCC;
//!
//! fn main() {
//!     run().unwrap();
//! }
//!
//! fn run() -> CResult<()> {
//!     let mut engine = MVCC::new(Box::new(SystemClock::new()));
//!
//!     // Single-statement operations run in implicit transactions.
//!     engine.set(b"a", vec![0x01], None)?;
//!     assert_eq!(engine.get(b"a", None)?, Some(vec![0x01]));
//!
//!     // Writes inside an explicit transaction stay private until commit.
//!     let txn = engine.begin()?;
//!     engine.set(b"a", vec![0x02], Some(txn))?;
//!     assert_eq!(engine.get(b"a", None)?, Some(vec![0x01]));
//!     assert_eq!(engine.get(b"a", Some(txn))?, Some(vec![0x02]));
//!     engine.commit(txn)?;
//!     assert_eq!(engine.get(b"a", None)?, Some(vec![0x02]));
//!
//!     engine.delete(b"a", None)?;
//!     assert_eq!(engine.get(b"a", None)?, None);
//!
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod error;
pub mod mvcc;
