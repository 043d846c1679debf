use wasm_bindgen::JsValue;
use web_sys::IdbIndex;

use crate::event::{decode, EventFuture};
use crate::{ObjectStore, Result};

/// Read-only view over an `IDBIndex`.
#[derive(Debug, Clone)]
pub struct Index {
    index: IdbIndex,
}

impl Index {
    pub fn new(index: IdbIndex) -> Self {
        Self { index }
    }

    pub fn as_raw(&self) -> &IdbIndex {
        &self.index
    }

    pub fn into_raw(self) -> IdbIndex {
        self.index
    }

    pub fn name(&self) -> String {
        self.index.name()
    }

    /// Owning store. A new wrapper is built on every call.
    pub fn object_store(&self) -> ObjectStore {
        ObjectStore::new(self.index.object_store())
    }

    pub fn key_path(&self) -> Result<JsValue> {
        Ok(self.index.key_path()?)
    }

    pub fn multi_entry(&self) -> bool {
        self.index.multi_entry()
    }

    pub fn unique(&self) -> bool {
        self.index.unique()
    }

    /// Number of records whose index key matches `query` (all records when `None`).
    pub fn count(&self, query: Option<&JsValue>) -> EventFuture<u64> {
        let request = match query {
            Some(query) => self.index.count_with_key(query),
            None => self.index.count(),
        };
        EventFuture::request(request, decode::count)
    }

    /// First record in index order matching `query`, `None` if nothing matches.
    pub fn get(&self, query: &JsValue) -> EventFuture<Option<JsValue>> {
        EventFuture::request(self.index.get(query), decode::optional)
    }

    /// Matching records in index order, at most `limit` of them.
    pub fn get_all(
        &self,
        query: Option<&JsValue>,
        limit: Option<u32>,
    ) -> EventFuture<Vec<JsValue>> {
        let request = match (query, limit) {
            (None, None) => self.index.get_all(),
            (Some(query), None) => self.index.get_all_with_key(query),
            (query, Some(limit)) => self
                .index
                .get_all_with_key_and_limit(query.unwrap_or(&JsValue::UNDEFINED), limit),
        };
        EventFuture::request(request, decode::list)
    }

    /// Primary keys of matching records in index order, at most `limit` of them.
    pub fn get_all_keys(
        &self,
        query: Option<&JsValue>,
        limit: Option<u32>,
    ) -> EventFuture<Vec<JsValue>> {
        let request = match (query, limit) {
            (None, None) => self.index.get_all_keys(),
            (Some(query), None) => self.index.get_all_keys_with_key(query),
            (query, Some(limit)) => self
                .index
                .get_all_keys_with_key_and_limit(query.unwrap_or(&JsValue::UNDEFINED), limit),
        };
        EventFuture::request(request, decode::list)
    }

    /// Primary key of the first match, `None` if nothing matches.
    pub fn get_key(&self, query: &JsValue) -> EventFuture<Option<JsValue>> {
        EventFuture::request(self.index.get_key(query), decode::optional)
    }
}

impl From<IdbIndex> for Index {
    fn from(index: IdbIndex) -> Self {
        Self::new(index)
    }
}
