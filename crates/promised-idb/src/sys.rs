//! Bindings for the transaction options argument and `IDBTransaction.durability`, which `web-sys`
//! only exposes behind `web_sys_unstable_apis`.
//!
//! The extension types are only ever reached through `unchecked_ref` on the matching `web-sys`
//! handle.

use wasm_bindgen::prelude::*;
use web_sys::{IdbDatabase, IdbTransaction};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(extends = IdbDatabase, js_name = IDBDatabase)]
    pub(crate) type DatabaseExt;

    #[wasm_bindgen(method, catch, js_name = transaction)]
    pub(crate) fn transaction_with_options(
        this: &DatabaseExt,
        store_names: &JsValue,
        mode: &str,
        options: &JsValue,
    ) -> Result<IdbTransaction, JsValue>;

    #[wasm_bindgen(extends = IdbTransaction, js_name = IDBTransaction)]
    pub(crate) type TransactionExt;

    #[wasm_bindgen(method, getter, js_name = durability)]
    pub(crate) fn durability(this: &TransactionExt) -> JsValue;
}
