use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomStringList, IdbDatabase};

use crate::sys::DatabaseExt;
use crate::{Result, Transaction, TransactionMode, TransactionOptions};

/// Wrapper over an open `IDBDatabase` connection.
#[derive(Debug, Clone)]
pub struct Database {
    db: IdbDatabase,
}

impl Database {
    pub fn new(db: IdbDatabase) -> Self {
        Self { db }
    }

    pub fn as_raw(&self) -> &IdbDatabase {
        &self.db
    }

    pub fn into_raw(self) -> IdbDatabase {
        self.db
    }

    pub fn name(&self) -> String {
        self.db.name()
    }

    pub fn version(&self) -> u64 {
        // The host only stores integral versions in `1..=2^53 - 1`.
        self.db.version() as u64
    }

    pub fn object_store_names(&self) -> DomStringList {
        self.db.object_store_names()
    }

    /// Closes the connection once its pending transactions finish. The host reports no
    /// completion for this.
    pub fn close(&self) {
        self.db.close();
    }

    /// Starts a read-only transaction over `store_names`.
    pub fn transaction<I, S>(&self, store_names: I) -> Result<Transaction>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.transaction_with_mode(store_names, TransactionMode::ReadOnly)
    }

    pub fn transaction_with_mode<I, S>(
        &self,
        store_names: I,
        mode: TransactionMode,
    ) -> Result<Transaction>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = store_name_array(store_names);
        let transaction = self
            .db
            .transaction_with_str_sequence_and_mode(&names, mode.to_raw())?;
        Ok(Transaction::new(transaction))
    }

    /// Starts a transaction with explicit [`TransactionOptions`]. Hosts that do not know an option
    /// ignore it.
    pub fn transaction_with_options<I, S>(
        &self,
        store_names: I,
        mode: TransactionMode,
        options: TransactionOptions,
    ) -> Result<Transaction>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = store_name_array(store_names);
        let transaction = self.db.unchecked_ref::<DatabaseExt>().transaction_with_options(
            &names,
            mode.as_str(),
            &options.to_js(),
        )?;
        Ok(Transaction::new(transaction))
    }
}

impl From<IdbDatabase> for Database {
    fn from(db: IdbDatabase) -> Self {
        Self::new(db)
    }
}

fn store_name_array<I, S>(store_names: I) -> JsValue
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    store_names
        .into_iter()
        .map(|name| JsValue::from_str(name.as_ref()))
        .collect::<js_sys::Array>()
        .into()
}
