use std::collections::HashMap;

use serde_derive::{Deserialize, Serialize};

use crate::error::{CResult, Error};
use crate::mvcc::Version;

/// The lifecycle state of a transaction. `Active` is the only non-terminal
/// state; a transaction that has left it is never reactivated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionState {
    Active,
    Committed,
    Aborted,
    /// Aborted because a mutation inside the transaction failed. The
    /// visibility rule treats this exactly like `Aborted`, which is what
    /// keeps the failed transaction's partial writes hidden.
    AbortedFailed,
}

impl TransactionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionState::Active)
    }
}

/// A transaction entry. The id doubles as the creation timestamp: the clock
/// hands out strictly increasing versions, so ids order transactions by start
/// time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Version,
    pub state: TransactionState,
}

impl Transaction {
    /// A fresh transaction starts out active.
    pub fn new(id: Version) -> Self {
        Self { id, state: TransactionState::Active }
    }
}

/// The transaction table: every transaction the engine has ever started,
/// keyed by id. Record xmin/xmax fields reference entries here, and entries
/// are never removed, so the references stay resolvable for the process
/// lifetime.
#[derive(Debug, Default)]
pub struct TransactionTable {
    txns: HashMap<Version, Transaction>,
}

impl TransactionTable {
    pub fn new() -> Self {
        Self { txns: HashMap::new() }
    }

    /// Registers a new transaction. The zero sentinel is reserved, and a
    /// duplicate id means the clock handed out the same version twice; both
    /// are internal faults, not request errors.
    pub fn put(&mut self, txn: Transaction) -> CResult<()> {
        if txn.id == 0 {
            return Err(Error::Internal("transaction id 0 is reserved".to_string()));
        }
        if self.txns.contains_key(&txn.id) {
            return Err(Error::Internal(format!("duplicate transaction id {}", txn.id)));
        }
        self.txns.insert(txn.id, txn);
        Ok(())
    }

    pub fn get(&self, id: Version) -> Option<&Transaction> {
        self.txns.get(&id)
    }

    /// Transitions a transaction's state in place. Fails with `TxnNotFound`
    /// for an unregistered id and `TxnBadState` for a transaction already in
    /// a terminal state.
    pub fn set_state(&mut self, id: Version, state: TransactionState) -> CResult<()> {
        let txn = self.txns.get_mut(&id).ok_or(Error::TxnNotFound(id))?;
        if txn.state.is_terminal() {
            return Err(Error::TxnBadState(id));
        }
        txn.state = state;
        Ok(())
    }

    /// Total registered transactions.
    pub fn len(&self) -> usize {
        self.txns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.txns.is_empty()
    }

    /// Transactions currently active.
    pub fn active_count(&self) -> usize {
        self.txns.values().filter(|t| t.state == TransactionState::Active).count()
    }
}
