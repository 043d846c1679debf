//! Conversion of event-driven host requests into futures.
//!
//! IndexedDB reports the outcome of every request by firing exactly one of two events on the
//! request object. [`EventFuture`] listens for that pair once and settles with the payload or the
//! raw failure event. The same helper also drives open requests, database deletion and
//! transaction completion; only the event names and the payload decoding differ.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures_channel::oneshot;
use js_sys::Promise;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, EventTarget, IdbRequest};

use crate::{Error, Result};

/// A listener registered with `addEventListener`, removed again when dropped.
pub struct EventListener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    pub fn new<F>(target: &EventTarget, kind: &'static str, handler: F) -> Result<Self>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

impl std::fmt::Debug for EventListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventListener")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// The pair of events that settle an [`EventFuture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalEvents {
    pub settle: &'static str,
    pub fail: &'static str,
}

impl TerminalEvents {
    /// `IDBRequest` / `IDBOpenDBRequest`.
    pub const REQUEST: Self = Self {
        settle: "success",
        fail: "error",
    };

    /// `IDBTransaction` lifecycle.
    pub const TRANSACTION: Self = Self {
        settle: "complete",
        fail: "abort",
    };
}

type Outcome = Result<JsValue>;

enum State {
    Waiting {
        receiver: oneshot::Receiver<Outcome>,
        _listeners: [EventListener; 2],
    },
    Failed(Option<Error>),
}

/// Single-resolution future over one host request.
///
/// The request is issued before the future is returned, so requests keep the order in which the
/// methods were called. The future never times out and cannot cancel the request; dropping it only
/// detaches the listeners.
#[must_use = "the request is already issued; await the future to observe its outcome"]
pub struct EventFuture<T> {
    state: State,
    decode: fn(JsValue) -> Result<T>,
}

impl<T> EventFuture<T> {
    /// Listens on `target` for `events`.
    ///
    /// `read` produces the payload when the settle event fires. The fail event is forwarded
    /// unmodified as [`Error::Event`].
    pub fn new(
        target: &EventTarget,
        events: TerminalEvents,
        read: fn(&EventTarget) -> std::result::Result<JsValue, JsValue>,
        decode: fn(JsValue) -> Result<T>,
    ) -> Self {
        match Self::listen(target, events, read) {
            Ok(state) => Self { state, decode },
            Err(err) => Self::failed(err),
        }
    }

    /// Wraps a freshly issued request. A synchronous throw from the host call becomes the
    /// future's error.
    pub fn request(
        request: std::result::Result<IdbRequest, JsValue>,
        decode: fn(JsValue) -> Result<T>,
    ) -> Self {
        match request {
            Ok(request) => {
                Self::new(request.as_ref(), TerminalEvents::REQUEST, read_result, decode)
            }
            Err(err) => Self::failed(Error::Js(err)),
        }
    }

    /// A future that is already rejected with `err`.
    pub fn failed(err: Error) -> Self {
        Self {
            state: State::Failed(Some(err)),
            decode: |_| Err(Error::Detached),
        }
    }

    /// The outcome if the host has already settled the request, without registering a waker.
    /// `None` while the request is still pending.
    pub(crate) fn try_take(&mut self) -> Option<Result<T>> {
        match &mut self.state {
            State::Failed(err) => Some(Err(err.take().unwrap_or(Error::Detached))),
            State::Waiting { receiver, .. } => match receiver.try_recv() {
                Ok(None) => None,
                Ok(Some(outcome)) => Some(outcome.and_then(self.decode)),
                Err(oneshot::Canceled) => Some(Err(Error::Detached)),
            },
        }
    }

    fn listen(
        target: &EventTarget,
        events: TerminalEvents,
        read: fn(&EventTarget) -> std::result::Result<JsValue, JsValue>,
    ) -> Result<State> {
        let (sender, receiver) = oneshot::channel::<Outcome>();
        let sender = Rc::new(RefCell::new(Some(sender)));

        let on_settle = {
            let sender = sender.clone();
            let source = target.clone();
            EventListener::new(target, events.settle, move |_event| {
                if let Some(sender) = sender.borrow_mut().take() {
                    let _ = sender.send(read(&source).map_err(Error::Js));
                }
            })?
        };
        let on_fail = EventListener::new(target, events.fail, move |event| {
            if let Some(sender) = sender.borrow_mut().take() {
                let _ = sender.send(Err(Error::Event(event)));
            }
        })?;

        Ok(State::Waiting {
            receiver,
            _listeners: [on_settle, on_fail],
        })
    }
}

impl<T: Into<JsValue> + 'static> EventFuture<T> {
    /// Exposes the future to JavaScript as a `Promise`.
    ///
    /// Rejections carry the raw host value ([`Error::Event`] / [`Error::Js`]) so JS callers see
    /// what the native API would have given them.
    pub fn into_promise(self) -> Promise {
        wasm_bindgen_futures::future_to_promise(async move {
            self.await.map(Into::into).map_err(Into::into)
        })
    }
}

impl<T> Future for EventFuture<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match &mut this.state {
            State::Failed(err) => Poll::Ready(Err(err.take().unwrap_or(Error::Detached))),
            State::Waiting { receiver, .. } => match Pin::new(receiver).poll(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready(Ok(Ok(value))) => Poll::Ready((this.decode)(value)),
                Poll::Ready(Ok(Err(err))) => Poll::Ready(Err(err)),
                Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(Error::Detached)),
            },
        }
    }
}

impl<T> std::fmt::Debug for EventFuture<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            State::Waiting { .. } => "waiting",
            State::Failed(Some(_)) => "failed",
            State::Failed(None) => "taken",
        };
        f.debug_struct("EventFuture").field("state", &state).finish()
    }
}

fn read_result(target: &EventTarget) -> std::result::Result<JsValue, JsValue> {
    target.unchecked_ref::<IdbRequest>().result()
}

/// Payload decoders shared by the wrappers.
pub(crate) mod decode {
    use wasm_bindgen::{JsCast, JsValue};

    use crate::{Error, Result};

    pub fn unit(_: JsValue) -> Result<()> {
        Ok(())
    }

    pub fn value(value: JsValue) -> Result<JsValue> {
        Ok(value)
    }

    /// `undefined` is the host's "no match".
    pub fn optional(value: JsValue) -> Result<Option<JsValue>> {
        Ok((!value.is_undefined()).then_some(value))
    }

    pub fn count(value: JsValue) -> Result<u64> {
        value
            .as_f64()
            .and_then(whole_number)
            .ok_or(Error::UnexpectedResult("a count"))
    }

    /// Counts and versions arrive as JS numbers; anything that is not a non-negative integer in
    /// the exactly representable range is rejected instead of being truncated.
    pub fn whole_number(value: f64) -> Option<u64> {
        const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
        (value.fract() == 0.0 && (0.0..=MAX_SAFE_INTEGER).contains(&value)).then_some(value as u64)
    }

    pub fn list(value: JsValue) -> Result<Vec<JsValue>> {
        value
            .dyn_into::<js_sys::Array>()
            .map(|array| array.iter().collect())
            .map_err(|_| Error::UnexpectedResult("an array"))
    }
}
