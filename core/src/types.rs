//! Domain records sent to the orders API.
//!
//! # Design
//! Records are insertion-ordered JSON objects rather than fixed structs. The
//! API accepts arbitrary extra keys and the client must serialize whatever it
//! is handed verbatim, keeping key order, so each record wraps a
//! `serde_json::Map` (built with `preserve_order`) and adds typed setters for
//! the documented fields. Nothing here validates values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

macro_rules! ordered_record {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Map<String, Value>);

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            /// Set `key` to `value`, keeping the key's position if it already exists.
            pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
                self.insert(key, value);
                self
            }

            /// Insert or overwrite a field. An existing key keeps its position;
            /// a new key is appended.
            pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
                self.0.insert(key.into(), value.into())
            }

            pub fn get(&self, key: &str) -> Option<&Value> {
                self.0.get(key)
            }

            pub fn keys(&self) -> impl Iterator<Item = &str> {
                self.0.keys().map(String::as_str)
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<Map<String, Value>> for $name {
            fn from(map: Map<String, Value>) -> Self {
                Self(map)
            }
        }
    };
}

ordered_record! {
    /// A single order as the API expects it: `email`, `provider`,
    /// `upstream_id`, monetary fields in minor currency units,
    /// `currency_code` and free-form `properties`.
    Order
}

ordered_record! {
    /// A refund against an order. The order id is not part of the record; it
    /// goes into the request path.
    Refund
}

impl Order {
    pub fn email(self, email: impl Into<String>) -> Self {
        self.with("email", email.into())
    }

    pub fn provider(self, provider: impl Into<String>) -> Self {
        self.with("provider", provider.into())
    }

    pub fn upstream_id(self, upstream_id: impl Into<String>) -> Self {
        self.with("upstream_id", upstream_id.into())
    }

    pub fn amount(self, amount: i64) -> Self {
        self.with("amount", amount)
    }

    pub fn tax(self, tax: i64) -> Self {
        self.with("tax", tax)
    }

    pub fn fees(self, fees: i64) -> Self {
        self.with("fees", fees)
    }

    pub fn discount(self, discount: i64) -> Self {
        self.with("discount", discount)
    }

    /// ISO 4217 code, passed through as given.
    pub fn currency_code(self, currency_code: impl Into<String>) -> Self {
        self.with("currency_code", currency_code.into())
    }

    pub fn properties(self, properties: Properties) -> Self {
        self.with("properties", Value::Object(properties.0))
    }
}

impl Refund {
    pub fn amount(self, amount: i64) -> Self {
        self.with("amount", amount)
    }

    pub fn upstream_id(self, upstream_id: impl Into<String>) -> Self {
        self.with("upstream_id", upstream_id.into())
    }

    pub fn note(self, note: impl Into<String>) -> Self {
        self.with("note", note.into())
    }

    /// ISO 8601 timestamp, e.g. `2013-06-22T10:41:11Z`.
    pub fn processed_at(self, processed_at: impl Into<String>) -> Self {
        self.with("processed_at", processed_at.into())
    }
}

/// Custom string attributes attached to an order, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(Map<String, Value>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), Value::String(value.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter().fold(Properties::new(), |props, (k, v)| props.with(k, v))
    }
}
