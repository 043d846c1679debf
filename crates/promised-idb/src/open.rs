//! Opening and deleting databases.
//!
//! The migration callback receives the raw `IdbDatabase` rather than a [`Database`] wrapper:
//! schema changes (`createObjectStore`, `createIndex`, ...) must be made synchronously inside the
//! `upgradeneeded` dispatch against the upgrade transaction, which none of the wrappers mediate.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Event, EventTarget, IdbDatabase, IdbFactory, IdbOpenDbRequest, IdbRequest,
    IdbVersionChangeEvent,
};

use crate::event::{decode, EventFuture, EventListener};
use crate::{platform, Database, Error, Result};

/// Called with `(old_version, new_version)` when another connection blocks an open.
pub type BlockedCallback = Box<dyn FnMut(u64, Option<u64>)>;

/// Pending open request. Resolves with the connection once the host reports `success`.
///
/// Dropping it before the request settles does not cancel the open: the migration and blocked
/// callbacks stay attached until the host reports `success` or `error`, and the connection opened
/// on `success` is closed since nobody can receive it.
#[must_use = "the open request is already issued; await it to obtain the database"]
#[derive(Debug)]
pub struct OpenRequest {
    inner: EventFuture<IdbDatabase>,
    request: Option<IdbOpenDbRequest>,
    upgrade: Option<EventListener>,
    blocked: Option<EventListener>,
}

impl OpenRequest {
    fn failed(err: Error) -> Self {
        Self {
            inner: EventFuture::failed(err),
            request: None,
            upgrade: None,
            blocked: None,
        }
    }
}

impl Drop for OpenRequest {
    fn drop(&mut self) {
        let Some(request) = self.request.take() else {
            return;
        };
        match self.inner.try_take() {
            None => {}
            Some(Ok(db)) => {
                // Opened, but the future was dropped before anyone polled the result.
                db.close();
                return;
            }
            Some(Err(_)) => return,
        }

        tracing::debug!("open request dropped while pending, keeping callbacks until it settles");
        let listeners = (self.upgrade.take(), self.blocked.take());
        let source = request.clone();
        let release = Closure::once_into_js(move |_event: Event| {
            drop(listeners);
            if let Ok(db) = source.result().and_then(|db| db.dyn_into::<IdbDatabase>()) {
                db.close();
            }
        });
        // Exactly one of the two fires, so the once-closure is invoked at most once.
        let release = release.unchecked_ref::<js_sys::Function>();
        let _ = request.add_event_listener_with_callback("success", release);
        let _ = request.add_event_listener_with_callback("error", release);
    }
}

impl Future for OpenRequest {
    type Output = Result<Database>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().inner)
            .poll(cx)
            .map(|db| db.map(Database::new))
    }
}

/// Opens `name` at `version` using the factory of the current global scope.
///
/// `migration` runs inside `upgradeneeded` with `(db, old_version, new_version)`. Returning an
/// error aborts the upgrade transaction, which makes the open fail with the host's error event.
/// `blocked`, when given, is invoked for every `blocked` notification; it does not settle the
/// request.
pub fn open_database<M>(
    name: &str,
    version: u64,
    migration: M,
    blocked: Option<BlockedCallback>,
) -> OpenRequest
where
    M: FnMut(&IdbDatabase, u64, Option<u64>) -> std::result::Result<(), JsValue> + 'static,
{
    match platform::indexed_db() {
        Ok(factory) => open_database_with_factory(&factory, name, version, migration, blocked),
        Err(err) => OpenRequest::failed(err),
    }
}

pub fn open_database_with_factory<M>(
    factory: &IdbFactory,
    name: &str,
    version: u64,
    migration: M,
    blocked: Option<BlockedCallback>,
) -> OpenRequest
where
    M: FnMut(&IdbDatabase, u64, Option<u64>) -> std::result::Result<(), JsValue> + 'static,
{
    tracing::debug!(name, version, "opening IndexedDB database");
    factory
        .open_with_f64(name, version as f64)
        .map_err(Error::Js)
        .and_then(|request| attach(request, migration, blocked))
        .unwrap_or_else(OpenRequest::failed)
}

fn attach<M>(
    request: IdbOpenDbRequest,
    mut migration: M,
    blocked: Option<BlockedCallback>,
) -> Result<OpenRequest>
where
    M: FnMut(&IdbDatabase, u64, Option<u64>) -> std::result::Result<(), JsValue> + 'static,
{
    let target: &EventTarget = request.as_ref();

    let upgrade = {
        let source = request.clone();
        EventListener::new(target, "upgradeneeded", move |event: Event| {
            let (old, new) = versions(event);
            tracing::debug!(old, ?new, "running IndexedDB migration");
            let db = match source.result().and_then(|db| db.dyn_into::<IdbDatabase>()) {
                Ok(db) => db,
                Err(err) => {
                    tracing::warn!(?err, "upgradeneeded fired without a database");
                    return;
                }
            };
            if let Err(err) = migration(&db, old, new) {
                tracing::warn!(?err, old, ?new, "IndexedDB migration failed, aborting upgrade");
                if let Some(transaction) = source.transaction() {
                    let _ = transaction.abort();
                }
            }
        })?
    };

    let blocked = blocked
        .map(|mut callback| {
            EventListener::new(target, "blocked", move |event: Event| {
                let (old, new) = versions(event);
                tracing::debug!(old, ?new, "IndexedDB open blocked by another connection");
                callback(old, new);
            })
        })
        .transpose()?;

    let inner = EventFuture::request(Ok(IdbRequest::from(request.clone())), |value| {
        value
            .dyn_into::<IdbDatabase>()
            .map_err(|_| Error::UnexpectedResult("an IDBDatabase"))
    });

    Ok(OpenRequest {
        inner,
        request: Some(request),
        upgrade: Some(upgrade),
        blocked,
    })
}

fn versions(event: Event) -> (u64, Option<u64>) {
    let event = event.unchecked_into::<IdbVersionChangeEvent>();
    (
        event.old_version() as u64,
        event.new_version().map(|version| version as u64),
    )
}

/// Deletes `name` using the factory of the current global scope.
///
/// Stays pending while other connections to the database are open.
pub fn delete_database(name: &str) -> EventFuture<()> {
    match platform::indexed_db() {
        Ok(factory) => delete_database_with_factory(&factory, name),
        Err(err) => EventFuture::failed(err),
    }
}

pub fn delete_database_with_factory(factory: &IdbFactory, name: &str) -> EventFuture<()> {
    tracing::debug!(name, "deleting IndexedDB database");
    EventFuture::request(
        factory.delete_database(name).map(IdbRequest::from),
        decode::unit,
    )
}
