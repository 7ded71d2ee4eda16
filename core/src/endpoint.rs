//! Account-scoped endpoint paths.
//!
//! Paths carry no scheme or host; the transport prefixes its base URL.
//! Identifiers are interpolated literally. Callers supply ids that need no
//! escaping.

use crate::error::ClientError;

/// The three write operations the client performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateOrUpdateOrder,
    CreateOrUpdateOrders,
    CreateOrUpdateRefund,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::CreateOrUpdateOrder => "create_or_update_order",
            Operation::CreateOrUpdateOrders => "create_or_update_orders",
            Operation::CreateOrUpdateRefund => "create_or_update_refund",
        }
    }
}

/// Resolve the request path for `operation`.
///
/// `order_id` is only read for refunds, where it is required: an absent or
/// empty id fails with `ClientError::MissingParameter("order_id")`.
pub fn resolve(
    operation: Operation,
    account_id: &str,
    order_id: Option<&str>,
) -> Result<String, ClientError> {
    match operation {
        Operation::CreateOrUpdateOrder => Ok(format!("{account_id}/orders")),
        Operation::CreateOrUpdateOrders => Ok(format!("{account_id}/orders/batches")),
        Operation::CreateOrUpdateRefund => match order_id {
            Some(id) if !id.is_empty() => Ok(format!("{account_id}/orders/{id}/refunds")),
            _ => Err(ClientError::MissingParameter("order_id")),
        },
    }
}
