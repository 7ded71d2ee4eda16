//! Synchronous client core for the Drip orders API.
//!
//! # Overview
//! Turns three domain calls (upsert one order, upsert a batch of orders,
//! upsert a refund) into account-scoped JSON POSTs and folds whatever comes
//! back, including transport failures, into one `Response` type.
//!
//! # Design
//! - `RequestBuilder` is stateless apart from the account id and never does
//!   I/O; `build_*` produces an `HttpRequest`, `normalize` consumes the
//!   outcome. Hosts with their own HTTP stack use this half directly.
//! - `DripClient<T: Transport>` composes the two around a `Transport`:
//!   envelope → path → POST → `Response`.
//! - Records (`Order`, `Refund`) are insertion-ordered JSON objects so
//!   arbitrary fields pass through verbatim.
//! - A transport failure becomes `Response { status: 0, body: <error> }`;
//!   HTTP 4xx/5xx are ordinary responses.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod http;
pub mod response;
pub mod transport;
pub mod types;

pub use client::{DripClient, RequestBuilder};
pub use config::{ClientConfig, Credentials};
pub use endpoint::{resolve, Operation};
pub use envelope::{OrderBatch, RequestEnvelope};
pub use error::{ClientError, TransportError};
pub use http::{HttpRequest, HttpResponse};
pub use response::{normalize, Response, TRANSPORT_FAILURE_STATUS};
pub use transport::{Transport, UreqTransport};
pub use types::{Order, Properties, Refund};
