//! Request envelopes: the JSON bodies the orders API accepts.
//!
//! Records are always wrapped in an outer array, even when there is only
//! one. A batch call produces exactly one batch group; the client never
//! splits a large sequence across groups.

use serde::Serialize;

use crate::endpoint::Operation;
use crate::error::ClientError;
use crate::types::{Order, Refund};

/// One group inside a batch envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderBatch {
    pub orders: Vec<Order>,
}

/// The wire-level body for each operation.
///
/// Serializes to exactly one of:
/// - `{"orders": [<order>]}`
/// - `{"batches": [{"orders": [<order>, ...]}]}`
/// - `{"refunds": [<refund>]}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestEnvelope {
    Orders { orders: Vec<Order> },
    Batches { batches: Vec<OrderBatch> },
    Refunds { refunds: Vec<Refund> },
}

impl RequestEnvelope {
    pub fn single_order(order: Order) -> Self {
        RequestEnvelope::Orders { orders: vec![order] }
    }

    /// Wrap `orders` in a single batch group. Order is preserved; duplicates
    /// and an empty sequence are accepted as-is.
    pub fn order_batch(orders: Vec<Order>) -> Self {
        RequestEnvelope::Batches {
            batches: vec![OrderBatch { orders }],
        }
    }

    pub fn refund(refund: Refund) -> Self {
        RequestEnvelope::Refunds { refunds: vec![refund] }
    }

    pub fn operation(&self) -> Operation {
        match self {
            RequestEnvelope::Orders { .. } => Operation::CreateOrUpdateOrder,
            RequestEnvelope::Batches { .. } => Operation::CreateOrUpdateOrders,
            RequestEnvelope::Refunds { .. } => Operation::CreateOrUpdateRefund,
        }
    }

    pub fn to_json(&self) -> Result<String, ClientError> {
        Ok(serde_json::to_string(self)?)
    }
}
