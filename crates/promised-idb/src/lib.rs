//! Future-returning wrappers over the browser IndexedDB API.
//!
//! Each wrapper owns exactly one native handle ([`Database`], [`Transaction`], [`ObjectStore`],
//! [`Index`]) and mirrors its properties and methods. Methods that issue an `IDBRequest` return an
//! [`EventFuture`] that settles on the request's `success` or `error` event; errors are the host's
//! own event or exception, never reinterpreted. Storage, ordering and transaction semantics are
//! entirely the browser's.
//!
//! [`open_database`] is the entry point:
//!
//! ```no_run
//! # async fn demo() -> promised_idb::Result<()> {
//! use promised_idb::{open_database, TransactionMode};
//! use wasm_bindgen::JsValue;
//!
//! let db = open_database(
//!     "shop",
//!     1,
//!     |db, _old, _new| {
//!         let params = web_sys::IdbObjectStoreParameters::new();
//!         params.set_auto_increment(true);
//!         db.create_object_store_with_optional_parameters("items", &params)?;
//!         Ok(())
//!     },
//!     None,
//! )
//! .await?;
//!
//! let tx = db.transaction_with_mode(["items"], TransactionMode::ReadWrite)?;
//! let key = tx.object_store("items")?.add(&JsValue::from_str("pen"), None).await?;
//! # let _ = key;
//! # Ok(())
//! # }
//! ```

mod database;
mod error;
pub mod event;
mod index;
mod object_store;
mod open;
mod options;
pub mod platform;
mod sys;
mod transaction;

pub use crate::database::Database;
pub use crate::error::{Error, Result};
pub use crate::event::{EventFuture, EventListener, TerminalEvents};
pub use crate::index::Index;
pub use crate::object_store::ObjectStore;
pub use crate::open::{
    delete_database, delete_database_with_factory, open_database, open_database_with_factory,
    BlockedCallback, OpenRequest,
};
pub use crate::options::{Durability, TransactionMode, TransactionOptions};
pub use crate::transaction::{Transaction, TransactionEvent};
