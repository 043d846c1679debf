use wasm_bindgen::JsCast;
use web_sys::{IdbFactory, Window, WorkerGlobalScope};

use crate::{Error, Result};

/// Looks up the `IDBFactory` of the current global scope (window or worker).
pub fn indexed_db() -> Result<IdbFactory> {
    let global = js_sys::global();
    let factory = if let Some(window) = global.dyn_ref::<Window>() {
        window.indexed_db()?
    } else if let Some(scope) = global.dyn_ref::<WorkerGlobalScope>() {
        scope.indexed_db()?
    } else {
        None
    };
    factory.ok_or(Error::IndexedDbUnavailable)
}
