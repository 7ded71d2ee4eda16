//! Request building and the public operation facade.
//!
//! # Design
//! `RequestBuilder` holds only the account id. Each operation has a
//! `build_*` method that injects the positional argument into the record,
//! wraps it in its envelope, resolves the path and returns an `HttpRequest`
//! without touching the network. Hosts that run their own HTTP stack (the
//! FFI crate, for one) call these and feed the outcome to `normalize`.
//!
//! `DripClient` pairs a `RequestBuilder` with a `Transport` and runs the
//! straight line build → resolve → post → normalize. It returns `Err` only
//! for caller mistakes caught before the POST; every network or HTTP outcome
//! is an `Ok(Response)`.

use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::endpoint::{resolve, Operation};
use crate::envelope::RequestEnvelope;
use crate::error::ClientError;
use crate::http::HttpRequest;
use crate::response::{normalize, Response};
use crate::transport::{Transport, UreqTransport};
use crate::types::{Order, Refund};

/// Stateless builder for account-scoped order requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBuilder {
    account_id: String,
}

impl RequestBuilder {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// `email` overwrites any `email` already present in `options`.
    pub fn build_create_or_update_order(
        &self,
        email: &str,
        mut options: Order,
    ) -> Result<HttpRequest, ClientError> {
        options.insert("email", email);
        self.build(RequestEnvelope::single_order(options), None)
    }

    /// Each order must already carry its own email; nothing is injected.
    pub fn build_create_or_update_orders(&self, orders: Vec<Order>) -> Result<HttpRequest, ClientError> {
        self.build(RequestEnvelope::order_batch(orders), None)
    }

    /// `amount` overwrites any `amount` already present in `options`.
    /// An empty `order_id` fails with `ClientError::MissingParameter`.
    pub fn build_create_or_update_refund(
        &self,
        order_id: &str,
        amount: i64,
        mut options: Refund,
    ) -> Result<HttpRequest, ClientError> {
        options.insert("amount", amount);
        self.build(RequestEnvelope::refund(options), Some(order_id))
    }

    fn build(&self, envelope: RequestEnvelope, order_id: Option<&str>) -> Result<HttpRequest, ClientError> {
        let path = resolve(envelope.operation(), &self.account_id, order_id)?;
        Ok(HttpRequest::post_json(path, envelope.to_json()?))
    }
}

/// Client for the orders API of one account.
///
/// Safe to share across threads when `T` is; no state changes between calls.
#[derive(Debug, Clone)]
pub struct DripClient<T> {
    requests: RequestBuilder,
    transport: T,
}

impl DripClient<UreqTransport> {
    /// Validate `config` and build a client over a ureq transport.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        Ok(Self::new(config.account_id.clone(), UreqTransport::new(config)))
    }
}

impl<T: Transport> DripClient<T> {
    pub fn new(account_id: impl Into<String>, transport: T) -> Self {
        Self {
            requests: RequestBuilder::new(account_id),
            transport,
        }
    }

    pub fn account_id(&self) -> &str {
        self.requests.account_id()
    }

    #[instrument(skip(self, email, options), fields(account_id = %self.account_id()))]
    pub fn create_or_update_order(&self, email: &str, options: Order) -> Result<Response, ClientError> {
        let request = self.requests.build_create_or_update_order(email, options)?;
        Ok(self.send(Operation::CreateOrUpdateOrder, &request))
    }

    #[instrument(skip_all, fields(account_id = %self.account_id(), orders = orders.len()))]
    pub fn create_or_update_orders(&self, orders: Vec<Order>) -> Result<Response, ClientError> {
        let request = self.requests.build_create_or_update_orders(orders)?;
        Ok(self.send(Operation::CreateOrUpdateOrders, &request))
    }

    #[instrument(skip(self, options), fields(account_id = %self.account_id()))]
    pub fn create_or_update_refund(
        &self,
        order_id: &str,
        amount: i64,
        options: Refund,
    ) -> Result<Response, ClientError> {
        let request = self
            .requests
            .build_create_or_update_refund(order_id, amount, options)?;
        Ok(self.send(Operation::CreateOrUpdateRefund, &request))
    }

    fn send(&self, operation: Operation, request: &HttpRequest) -> Response {
        debug!(
            operation = operation.as_str(),
            path = %request.path,
            bytes = request.body.len(),
            "posting envelope"
        );
        let response = normalize(self.transport.post(&request.path, &request.body));
        debug!(operation = operation.as_str(), status = response.status, "request complete");
        response
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::{json, Value};

    use super::*;
    use crate::error::TransportError;
    use crate::http::HttpResponse;
    use crate::response::TRANSPORT_FAILURE_STATUS;
    use crate::types::Properties;

    /// Records every POST and answers with a fixed outcome.
    struct RecordingTransport {
        outcome: Result<HttpResponse, TransportError>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl RecordingTransport {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                outcome: Ok(HttpResponse {
                    status,
                    headers: Vec::new(),
                    body: body.to_string(),
                }),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(err: TransportError) -> Self {
            Self {
                outcome: Err(err),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Transport for RecordingTransport {
        fn post(&self, path: &str, body: &str) -> Result<HttpResponse, TransportError> {
            self.calls.lock().unwrap().push((path.to_string(), body.to_string()));
            self.outcome.clone()
        }
    }

    fn sent_body(transport: &RecordingTransport) -> Value {
        let calls = transport.calls();
        assert_eq!(calls.len(), 1, "expected exactly one POST");
        serde_json::from_str(&calls[0].1).unwrap()
    }

    #[test]
    fn build_order_sets_path_header_and_body() {
        let req = RequestBuilder::new("12345")
            .build_create_or_update_order("drippy@drip.com", Order::new().amount(4900))
            .unwrap();
        assert_eq!(req.path, "12345/orders");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/vnd.api+json".to_string())]
        );
        assert_eq!(req.body, r#"{"orders":[{"amount":4900,"email":"drippy@drip.com"}]}"#);
    }

    #[test]
    fn order_email_argument_overwrites_options_in_place() {
        let options = Order::new().email("stale@drip.com").provider("shopify");
        let req = RequestBuilder::new("12345")
            .build_create_or_update_order("drippy@drip.com", options)
            .unwrap();
        assert_eq!(
            req.body,
            r#"{"orders":[{"email":"drippy@drip.com","provider":"shopify"}]}"#
        );
    }

    #[test]
    fn batch_does_not_inject_email() {
        let req = RequestBuilder::new("12345")
            .build_create_or_update_orders(vec![Order::new().amount(1)])
            .unwrap();
        assert_eq!(req.path, "12345/orders/batches");
        assert_eq!(req.body, r#"{"batches":[{"orders":[{"amount":1}]}]}"#);
    }

    #[test]
    fn refund_amount_argument_overwrites_options() {
        let options = Refund::new().amount(1).note("Incorrect size");
        let req = RequestBuilder::new("12345")
            .build_create_or_update_refund("98457h", 4900, options)
            .unwrap();
        assert_eq!(req.path, "12345/orders/98457h/refunds");
        assert_eq!(req.body, r#"{"refunds":[{"amount":4900,"note":"Incorrect size"}]}"#);
    }

    #[test]
    fn create_or_update_order_returns_transport_response() {
        let transport = RecordingTransport::replying(202, "{}");
        let client = DripClient::new("12345", &transport);
        let options = Order::new()
            .email("drippy@drip.com")
            .provider("shopify")
            .upstream_id("abcdef")
            .amount(4900)
            .tax(100)
            .fees(0)
            .discount(0)
            .currency_code("USD")
            .properties(Properties::new().with("size", "medium").with("color", "red"));

        let response = client.create_or_update_order("drippy@drip.com", options).unwrap();

        assert_eq!(response, Response::new(202, "{}"));
        assert_eq!(transport.calls()[0].0, "12345/orders");
        assert_eq!(
            sent_body(&transport),
            json!({"orders": [{
                "email": "drippy@drip.com",
                "provider": "shopify",
                "upstream_id": "abcdef",
                "amount": 4900,
                "tax": 100,
                "fees": 0,
                "discount": 0,
                "currency_code": "USD",
                "properties": {"size": "medium", "color": "red"}
            }]})
        );
    }

    #[test]
    fn empty_batch_is_still_posted() {
        let transport = RecordingTransport::replying(202, "");
        let client = DripClient::new("12345", &transport);
        let response = client.create_or_update_orders(Vec::new()).unwrap();
        assert_eq!(response.status, 202);
        assert_eq!(sent_body(&transport), json!({"batches": [{"orders": []}]}));
    }

    #[test]
    fn refund_without_order_id_fails_before_posting() {
        let transport = RecordingTransport::replying(202, "");
        let client = DripClient::new("12345", &transport);
        let err = client
            .create_or_update_refund("", 4900, Refund::new())
            .unwrap_err();
        assert!(matches!(err, ClientError::MissingParameter("order_id")));
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn http_error_status_is_returned_as_response() {
        let transport = RecordingTransport::replying(401, r#"{"errors":[{"code":"authentication_error"}]}"#);
        let client = DripClient::new("12345", &transport);
        let response = client.create_or_update_orders(vec![Order::new()]).unwrap();
        assert_eq!(response.status, 401);
        assert!(!response.is_success());
    }

    #[test]
    fn transport_failure_is_returned_as_sentinel_response() {
        let transport = RecordingTransport::failing(TransportError::Timeout("30s elapsed".to_string()));
        let client = DripClient::new("12345", &transport);
        let response = client
            .create_or_update_refund("98457h", 4900, Refund::new())
            .unwrap();
        assert_eq!(response.status, TRANSPORT_FAILURE_STATUS);
        assert_eq!(response.body, "request timed out: 30s elapsed");
        assert_eq!(transport.calls().len(), 1);
    }

    #[test]
    fn from_config_rejects_invalid_config() {
        let err = DripClient::from_config(&ClientConfig::new("")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidConfig(_)));
    }

    #[test]
    fn client_is_shareable_across_threads() {
        fn assert_send_sync<S: Send + Sync>() {}
        assert_send_sync::<DripClient<UreqTransport>>();
    }
}
