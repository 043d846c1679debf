use js_sys::Function;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomException, DomStringList, Event, IdbTransaction};

use crate::event::{decode, EventFuture, EventListener, TerminalEvents};
use crate::sys::TransactionExt;
use crate::{Database, Durability, Error, ObjectStore, Result, TransactionMode};

/// Lifecycle events fired on a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionEvent {
    Abort,
    Complete,
    Error,
}

impl TransactionEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionEvent::Abort => "abort",
            TransactionEvent::Complete => "complete",
            TransactionEvent::Error => "error",
        }
    }
}

/// Wrapper over an `IDBTransaction`.
///
/// Commit and abort are forwarded as-is; their outcome is reported through the `complete` and
/// `abort` events (or [`Transaction::done`]).
#[derive(Debug, Clone)]
pub struct Transaction {
    transaction: IdbTransaction,
}

impl Transaction {
    pub fn new(transaction: IdbTransaction) -> Self {
        Self { transaction }
    }

    pub fn as_raw(&self) -> &IdbTransaction {
        &self.transaction
    }

    pub fn into_raw(self) -> IdbTransaction {
        self.transaction
    }

    /// Owning database, freshly wrapped.
    pub fn db(&self) -> Database {
        Database::new(self.transaction.db())
    }

    pub fn mode(&self) -> Result<TransactionMode> {
        TransactionMode::from_raw(self.transaction.mode()?)
            .ok_or(Error::UnexpectedResult("a transaction mode"))
    }

    pub fn object_store_names(&self) -> DomStringList {
        self.transaction.object_store_names()
    }

    /// `None` on hosts that predate transaction durability.
    pub fn durability(&self) -> Option<Durability> {
        Durability::from_js(&self.transaction.unchecked_ref::<TransactionExt>().durability())
    }

    /// Reason the transaction aborted, once it has.
    pub fn error(&self) -> Option<DomException> {
        self.transaction.error()
    }

    pub fn abort(&self) -> Result<()> {
        Ok(self.transaction.abort()?)
    }

    pub fn commit(&self) -> Result<()> {
        Ok(self.transaction.commit()?)
    }

    /// Wraps a store in this transaction's scope. Fails with the host's `NotFoundError` for a
    /// store outside the scope and `InvalidStateError` once the transaction has finished.
    pub fn object_store(&self, name: &str) -> Result<ObjectStore> {
        Ok(ObjectStore::new(self.transaction.object_store(name)?))
    }

    pub fn add_event_listener(&self, kind: TransactionEvent, callback: &Function) -> Result<()> {
        Ok(self
            .transaction
            .add_event_listener_with_callback(kind.as_str(), callback)?)
    }

    pub fn remove_event_listener(&self, kind: TransactionEvent, callback: &Function) -> Result<()> {
        Ok(self
            .transaction
            .remove_event_listener_with_callback(kind.as_str(), callback)?)
    }

    /// Registers a Rust handler for `kind`; it stays registered until the returned listener is
    /// dropped.
    pub fn listen<F>(&self, kind: TransactionEvent, handler: F) -> Result<EventListener>
    where
        F: FnMut(Event) + 'static,
    {
        EventListener::new(self.transaction.as_ref(), kind.as_str(), handler)
    }

    /// Returns `false` if a listener cancelled the event.
    pub fn dispatch_event(&self, event: &Event) -> Result<bool> {
        Ok(self.transaction.dispatch_event(event)?)
    }

    /// Resolves once the transaction commits; rejects with the `abort` event otherwise.
    ///
    /// Only events fired after this call are observed, so call it before the transaction can
    /// finish (i.e. before yielding to the event loop).
    pub fn done(&self) -> EventFuture<()> {
        EventFuture::new(
            self.transaction.as_ref(),
            TerminalEvents::TRANSACTION,
            |_| Ok(JsValue::UNDEFINED),
            decode::unit,
        )
    }
}

impl From<IdbTransaction> for Transaction {
    fn from(transaction: IdbTransaction) -> Self {
        Self::new(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::TransactionEvent;

    #[test]
    fn transaction_event_names() {
        assert_eq!(TransactionEvent::Abort.as_str(), "abort");
        assert_eq!(TransactionEvent::Complete.as_str(), "complete");
        assert_eq!(TransactionEvent::Error.as_str(), "error");
    }
}
