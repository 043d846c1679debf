use wasm_bindgen::JsValue;
use web_sys::{DomStringList, IdbObjectStore};

use crate::event::{decode, EventFuture};
use crate::{Index, Result, Transaction};

/// Wrapper over an `IDBObjectStore` whose requests resolve as futures.
///
/// Every method issues its request immediately; the owning transaction must still be active or
/// the returned future fails with the host's `TransactionInactiveError`.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    store: IdbObjectStore,
}

impl ObjectStore {
    pub fn new(store: IdbObjectStore) -> Self {
        Self { store }
    }

    pub fn as_raw(&self) -> &IdbObjectStore {
        &self.store
    }

    pub fn into_raw(self) -> IdbObjectStore {
        self.store
    }

    pub fn name(&self) -> String {
        self.store.name()
    }

    pub fn index_names(&self) -> DomStringList {
        self.store.index_names()
    }

    pub fn key_path(&self) -> Result<JsValue> {
        Ok(self.store.key_path()?)
    }

    /// Owning transaction, freshly wrapped.
    pub fn transaction(&self) -> Transaction {
        Transaction::new(self.store.transaction())
    }

    pub fn auto_increment(&self) -> bool {
        self.store.auto_increment()
    }

    /// Inserts `value`, failing with `ConstraintError` if the key is taken. Resolves with the key
    /// the record was stored under.
    pub fn add(&self, value: &JsValue, key: Option<&JsValue>) -> EventFuture<JsValue> {
        let request = match key {
            Some(key) => self.store.add_with_key(value, key),
            None => self.store.add(value),
        };
        EventFuture::request(request, decode::value)
    }

    /// Inserts or overwrites `value`. Resolves with the record's key.
    pub fn put(&self, value: &JsValue, key: Option<&JsValue>) -> EventFuture<JsValue> {
        let request = match key {
            Some(key) => self.store.put_with_key(value, key),
            None => self.store.put(value),
        };
        EventFuture::request(request, decode::value)
    }

    /// Removes every record matching a key or key range. Matching nothing is not an error.
    pub fn delete(&self, query: &JsValue) -> EventFuture<()> {
        EventFuture::request(self.store.delete(query), decode::unit)
    }

    pub fn clear(&self) -> EventFuture<()> {
        EventFuture::request(self.store.clear(), decode::unit)
    }

    pub fn count(&self, query: Option<&JsValue>) -> EventFuture<u64> {
        let request = match query {
            Some(query) => self.store.count_with_key(query),
            None => self.store.count(),
        };
        EventFuture::request(request, decode::count)
    }

    pub fn get(&self, query: &JsValue) -> EventFuture<Option<JsValue>> {
        EventFuture::request(self.store.get(query), decode::optional)
    }

    pub fn get_all(
        &self,
        query: Option<&JsValue>,
        limit: Option<u32>,
    ) -> EventFuture<Vec<JsValue>> {
        let request = match (query, limit) {
            (None, None) => self.store.get_all(),
            (Some(query), None) => self.store.get_all_with_key(query),
            (query, Some(limit)) => self
                .store
                .get_all_with_key_and_limit(query.unwrap_or(&JsValue::UNDEFINED), limit),
        };
        EventFuture::request(request, decode::list)
    }

    pub fn get_all_keys(
        &self,
        query: Option<&JsValue>,
        limit: Option<u32>,
    ) -> EventFuture<Vec<JsValue>> {
        let request = match (query, limit) {
            (None, None) => self.store.get_all_keys(),
            (Some(query), None) => self.store.get_all_keys_with_key(query),
            (query, Some(limit)) => self
                .store
                .get_all_keys_with_key_and_limit(query.unwrap_or(&JsValue::UNDEFINED), limit),
        };
        EventFuture::request(request, decode::list)
    }

    pub fn get_key(&self, query: &JsValue) -> EventFuture<Option<JsValue>> {
        EventFuture::request(self.store.get_key(query), decode::optional)
    }

    /// Wraps the named index. Fails with the host's `NotFoundError` for an unknown name.
    pub fn index(&self, name: &str) -> Result<Index> {
        Ok(Index::new(self.store.index(name)?))
    }
}

impl From<IdbObjectStore> for ObjectStore {
    fn from(store: IdbObjectStore) -> Self {
        Self::new(store)
    }
}
