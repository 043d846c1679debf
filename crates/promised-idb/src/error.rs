use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomException, Event, IdbRequest, IdbTransaction};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IndexedDB is not available in this context")]
    IndexedDbUnavailable,
    /// The host settled the request with its failure event. The event is kept exactly as it was
    /// delivered to the listener.
    #[error("indexeddb request failed: {0:?}")]
    Event(Event),
    /// A host call threw synchronously (inactive transaction, unknown store name, ...).
    #[error("indexeddb call failed: {0:?}")]
    Js(JsValue),
    #[error("indexeddb returned an unexpected result: expected {0}")]
    UnexpectedResult(&'static str),
    #[error("request listener was detached before the request settled")]
    Detached,
}

impl Error {
    /// The `DOMException` behind this error, if the host attached one.
    ///
    /// For [`Error::Event`] this reads `error` from the event's target (the failed request or the
    /// aborted transaction). The stored event itself is left untouched.
    pub fn dom_exception(&self) -> Option<DomException> {
        match self {
            Error::Event(event) => {
                let target = event.target()?;
                if let Some(request) = target.dyn_ref::<IdbRequest>() {
                    return request.error().ok().flatten();
                }
                target.dyn_ref::<IdbTransaction>().and_then(|tx| tx.error())
            }
            Error::Js(value) => value.dyn_ref::<DomException>().cloned(),
            _ => None,
        }
    }

    /// Name of the underlying `DOMException` (e.g. `"ConstraintError"`).
    pub fn name(&self) -> Option<String> {
        self.dom_exception().map(|ex| ex.name())
    }
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        Error::Js(value)
    }
}

/// Hands the host's own value back to JavaScript; crate-level failures become `Error` objects.
impl From<Error> for JsValue {
    fn from(err: Error) -> Self {
        match err {
            Error::Event(event) => event.into(),
            Error::Js(value) => value,
            other => js_sys::Error::new(&other.to_string()).into(),
        }
    }
}
