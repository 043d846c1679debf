use wasm_bindgen::JsValue;
use web_sys::IdbTransactionMode;

/// Access mode of a transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TransactionMode {
    #[default]
    ReadOnly,
    ReadWrite,
    /// Only produced by the host for the upgrade transaction of an open request.
    VersionChange,
}

impl TransactionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionMode::ReadOnly => "readonly",
            TransactionMode::ReadWrite => "readwrite",
            TransactionMode::VersionChange => "versionchange",
        }
    }

    pub fn from_raw(mode: IdbTransactionMode) -> Option<Self> {
        match mode {
            IdbTransactionMode::Readonly => Some(TransactionMode::ReadOnly),
            IdbTransactionMode::Readwrite => Some(TransactionMode::ReadWrite),
            IdbTransactionMode::Versionchange => Some(TransactionMode::VersionChange),
            _ => None,
        }
    }

    pub fn to_raw(self) -> IdbTransactionMode {
        match self {
            TransactionMode::ReadOnly => IdbTransactionMode::Readonly,
            TransactionMode::ReadWrite => IdbTransactionMode::Readwrite,
            TransactionMode::VersionChange => IdbTransactionMode::Versionchange,
        }
    }
}

/// Durability hint passed to the host (`IDBTransactionOptions.durability`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Durability {
    #[default]
    Default,
    Strict,
    Relaxed,
}

impl Durability {
    pub fn as_str(self) -> &'static str {
        match self {
            Durability::Default => "default",
            Durability::Strict => "strict",
            Durability::Relaxed => "relaxed",
        }
    }

    /// Parses the host's string value. Browsers without durability support report `undefined`.
    pub fn from_js(value: &JsValue) -> Option<Self> {
        match value.as_string()?.as_str() {
            "default" => Some(Durability::Default),
            "strict" => Some(Durability::Strict),
            "relaxed" => Some(Durability::Relaxed),
            _ => None,
        }
    }
}

/// Options accepted by [`crate::Database::transaction_with_options`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionOptions {
    pub durability: Durability,
}

impl TransactionOptions {
    pub(crate) fn to_js(self) -> JsValue {
        let options = js_sys::Object::new();
        // Setting a property on a fresh plain object cannot fail.
        let _ = js_sys::Reflect::set(
            &options,
            &JsValue::from_str("durability"),
            &JsValue::from_str(self.durability.as_str()),
        );
        options.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_mode_round_trips_through_web_sys() {
        for mode in [
            TransactionMode::ReadOnly,
            TransactionMode::ReadWrite,
            TransactionMode::VersionChange,
        ] {
            assert_eq!(TransactionMode::from_raw(mode.to_raw()), Some(mode));
        }
    }

    #[test]
    fn transaction_mode_strings_match_idl_enum() {
        assert_eq!(TransactionMode::ReadOnly.as_str(), "readonly");
        assert_eq!(TransactionMode::ReadWrite.as_str(), "readwrite");
        assert_eq!(TransactionMode::VersionChange.as_str(), "versionchange");
        assert_eq!(TransactionMode::default(), TransactionMode::ReadOnly);
    }

    #[test]
    fn durability_defaults_to_host_default() {
        let options = TransactionOptions::default();
        assert_eq!(options.durability, Durability::Default);
        assert_eq!(Durability::Relaxed.as_str(), "relaxed");
        assert_eq!(Durability::Strict.as_str(), "strict");
    }
}
