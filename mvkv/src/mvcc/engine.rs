//! This mod implements the MVCC (Multi-Version Concurrency Control) engine.
//! It coordinates the transaction table and the version store so that
//! multiple transactions can read and write the same keys without blocking
//! each other on reads.
//!
//!
//! VERSIONS
//! ========
//! Every write appends a new record tagged with the writing transaction's
//! timestamp in `xmin`; deletes append a tombstone, a copy of the prior
//! record with the deleting transaction in `xmax`. For example, the chains
//! for keys a,b after this history (x marks a tombstone):
//!
//! Time
//! 4  a4
//! 3      x
//! 2      b2
//! 1  a1
//!    a   b   Keys
//!
//! * At time t1, a transaction writes a=a1 and commits.
//! * At t2, a transaction writes b=b2 and commits.
//! * At t3, a transaction deletes b and commits.
//! * At t4, a transaction writes a=a4 and commits.
//! * A transaction started at T=5 sees a=a4 and no b.
//! * A transaction started at T=3 sees a=a1 and b=b2, no matter how long it
//!   keeps reading: later committers are behind its snapshot horizon.
//!
//!
//! ISOLATION
//! =========
//! A reader T sees exactly the writes of transactions that committed strictly
//! before T started, plus T's own in-flight writes. Uncommitted peers,
//! rolled-back transactions, and failed transactions are invisible to
//! everyone but themselves. There is no write-write conflict detection: two
//! committed writers on the same key resolve by chain position, newest wins.
//!
//! A mutation that fails inside an explicit transaction poisons it: the
//! transaction transitions to AbortedFailed and the error propagates. Any
//! records the failed call already appended stay in the chains, but the
//! owning transaction is terminal-not-committed, so no reader ever selects
//! them. Nothing is rolled back record by record.
//!
//!
//! mvcc:
//!   Writers don't block readers.
//!   Readers don't block writers.

use log::debug;
use serde_derive::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::{CResult, Error};
use crate::mvcc::record::{Record, LIVE};
use crate::mvcc::store::VersionStore;
use crate::mvcc::transaction::{Transaction, TransactionState, TransactionTable};
use crate::mvcc::Version;

/// An MVCC-based transactional key-value engine. Operations take an optional
/// transaction id: with `Some(id)` they run inside that explicit transaction
/// and leave committing to the caller, with `None` they wrap themselves in an
/// implicit single-statement transaction (begin, execute, commit).
///
/// The engine is serial: all entry points take `&mut self` and never suspend
/// mid-call. Callers driving it from more than one thread must put it behind
/// a single exclusive lock.
pub struct MVCC {
    clock: Box<dyn Clock>,
    txns: TransactionTable,
    store: VersionStore,
}

impl MVCC {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self { clock, txns: TransactionTable::new(), store: VersionStore::new() }
    }

    /// Begins a transaction: allocates a clock timestamp, registers it as
    /// active, and returns it. The timestamp is the transaction id.
    pub fn begin(&mut self) -> CResult<Version> {
        let id = self.clock.now();
        self.txns.put(Transaction::new(id))?;
        debug!("begin txn {}", id);
        Ok(id)
    }

    /// Commits the transaction, making its writes visible to transactions
    /// that start afterwards. Fails with `TxnNotFound` for an unknown id and
    /// `TxnBadState` for a transaction already in a terminal state.
    pub fn commit(&mut self, txn: Version) -> CResult<()> {
        self.txns.set_state(txn, TransactionState::Committed)?;
        debug!("commit txn {}", txn);
        Ok(())
    }

    /// Rolls back the transaction. Its appended records stay in the version
    /// chains but become permanently invisible to every reader.
    pub fn rollback(&mut self, txn: Version) -> CResult<()> {
        self.txns.set_state(txn, TransactionState::Aborted)?;
        debug!("rollback txn {}", txn);
        Ok(())
    }

    /// Reads the value visible to the transaction, or None. An implicit read
    /// still begins and commits a fresh transaction to read at.
    pub fn get(&mut self, key: &[u8], txn: Option<Version>) -> CResult<Option<Vec<u8>>> {
        self.with_txn(txn, |engine, reader| {
            Ok(engine.read(key, reader)?.map(|record| record.value.clone()))
        })
    }

    /// Inserts or updates the key. An update tombstones the currently visible
    /// version first, then appends the new one, so the chain reads as
    /// delete-then-insert.
    ///
    /// Two transactions writing the same key are not checked against each
    /// other: whichever commits later simply has its version further down the
    /// chain, and later readers pick it up (no lost-update detection). The
    /// internal tombstoning step cannot miss, since the engine is serial and
    /// it runs only after a successful visibility check.
    pub fn set(&mut self, key: &[u8], value: Vec<u8>, txn: Option<Version>) -> CResult<()> {
        self.with_txn(txn, |engine, writer| engine.write(key, value, writer))
    }

    /// Deletes the key by appending a tombstone. Fails with `KeyNotFound`
    /// when the key has no chain at all, or no version visible to the caller.
    pub fn delete(&mut self, key: &[u8], txn: Option<Version>) -> CResult<()> {
        self.with_txn(txn, |engine, writer| engine.remove(key, writer))
    }

    /// The current lifecycle state of a transaction, if registered.
    pub fn txn_state(&self, txn: Version) -> Option<TransactionState> {
        self.txns.get(txn).map(|t| t.state)
    }

    /// Engine status, for startup/shutdown logging and tests.
    pub fn status(&self) -> Status {
        Status {
            txns: self.txns.len() as u64,
            active_txns: self.txns.active_count() as u64,
            keys: self.store.keys() as u64,
            versions: self.store.versions() as u64,
        }
    }

    /// Dispatches to the explicit or implicit execution pipeline.
    fn with_txn<T>(
        &mut self,
        txn: Option<Version>,
        body: impl FnOnce(&mut Self, Version) -> CResult<T>,
    ) -> CResult<T> {
        match txn {
            Some(id) => self.with_explicit(id, body),
            None => self.with_implicit(body),
        }
    }

    /// Runs `body` under an explicit transaction: validate that the id is
    /// registered and active, execute, and on any error poison the
    /// transaction to AbortedFailed before propagating. Validation failures
    /// themselves poison nothing, since the body never ran.
    fn with_explicit<T>(
        &mut self,
        txn: Version,
        body: impl FnOnce(&mut Self, Version) -> CResult<T>,
    ) -> CResult<T> {
        let entry = self.txns.get(txn).ok_or(Error::TxnNotFound(txn))?;
        if entry.state != TransactionState::Active {
            return Err(Error::TxnBadState(txn));
        }
        match body(self, txn) {
            Ok(value) => Ok(value),
            Err(err) => {
                debug!("txn {} failed: {}", txn, err);
                let _ = self.txns.set_state(txn, TransactionState::AbortedFailed);
                Err(err)
            }
        }
    }

    /// Runs `body` in an implicit single-statement transaction: begin, run
    /// the explicit pipeline under the fresh id, commit on success. On
    /// failure the fresh transaction was already poisoned by the pipeline.
    fn with_implicit<T>(
        &mut self,
        body: impl FnOnce(&mut Self, Version) -> CResult<T>,
    ) -> CResult<T> {
        let txn = self.begin()?;
        let value = self.with_explicit(txn, body)?;
        self.commit(txn)?;
        Ok(value)
    }

    /// Whether the writes of transaction `txn` are visible to a reader
    /// running at timestamp `reader`:
    /// - rolled-back and failed transactions are visible to no one,
    /// - a transaction always sees its own in-flight writes,
    /// - otherwise only writes committed strictly before the reader started.
    ///
    /// The strict `<` means a transaction committed at the reader's own
    /// timestamp is invisible unless it IS the reader; the clock never hands
    /// out the same timestamp twice, so the case cannot arise.
    fn visible(txn: &Transaction, reader: Version) -> bool {
        match txn.state {
            TransactionState::Aborted | TransactionState::AbortedFailed => false,
            _ if txn.id == reader => true,
            TransactionState::Committed => txn.id < reader,
            _ => false,
        }
    }

    /// Selects the record visible to `reader` for `key`, walking the chain
    /// newest-first. A visible tombstone ends the walk with no result: the
    /// tombstone for an older version always sits later in the chain, so it
    /// is encountered before the version it shadows. Records whose inserter
    /// is invisible are skipped.
    fn read(&self, key: &[u8], reader: Version) -> CResult<Option<&Record>> {
        let Some(chain) = self.store.chain(key) else {
            return Ok(None);
        };
        for record in chain.iter().rev() {
            if record.xmax != LIVE {
                let del = self.txns.get(record.xmax).ok_or_else(|| {
                    Error::Internal(format!("record xmax {} has no transaction entry", record.xmax))
                })?;
                if Self::visible(del, reader) {
                    return Ok(None);
                }
            }
            let ins = self.txns.get(record.xmin).ok_or_else(|| {
                Error::Internal(format!("record xmin {} has no transaction entry", record.xmin))
            })?;
            if !Self::visible(ins, reader) {
                continue;
            }
            return Ok(Some(record));
        }
        Ok(None)
    }

    /// Appends a new live version for the key, tombstoning the currently
    /// visible version first if there is one.
    fn write(&mut self, key: &[u8], value: Vec<u8>, writer: Version) -> CResult<()> {
        if self.read(key, writer)?.is_some() {
            self.remove(key, writer)?;
        }
        self.store.append(key, Record::for_insert(value, writer));
        Ok(())
    }

    /// Appends a tombstone: a copy of the visible record with `xmax` set to
    /// the writer. Fails with `KeyNotFound` when the key has no chain or no
    /// record visible to the writer.
    fn remove(&mut self, key: &[u8], writer: Version) -> CResult<()> {
        if !self.store.has_any(key) {
            return Err(Error::KeyNotFound);
        }
        let tombstone = match self.read(key, writer)? {
            Some(prior) => {
                let mut tombstone = prior.clone();
                tombstone.xmax = writer;
                tombstone
            }
            None => return Err(Error::KeyNotFound),
        };
        self.store.append(key, tombstone);
        Ok(())
    }
}

/// MVCC engine status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Status {
    /// Total transactions ever started, including implicit ones.
    pub txns: u64,
    /// Transactions currently active.
    pub active_txns: u64,
    /// The number of keys with at least one version.
    pub keys: u64,
    /// The total number of record versions across all chains.
    pub versions: u64,
}
