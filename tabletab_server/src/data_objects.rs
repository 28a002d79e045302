use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tabletab_engine::db_types::{LineRequest, OrderSubmission};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

/// The order submission payload as it arrives from table-side devices. The customer token
/// travels in the `customer_id_write` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSubmissionRequest {
    #[serde(rename = "customer_id_write")]
    pub customer_id: String,
    pub name: String,
    pub table_number: String,
    #[serde(default)]
    pub mobile_number: Option<String>,
    pub items: Vec<LineRequest>,
}

impl From<OrderSubmissionRequest> for OrderSubmission {
    fn from(req: OrderSubmissionRequest) -> Self {
        OrderSubmission {
            customer_id: req.customer_id,
            name: req.name,
            table_number: req.table_number,
            mobile_number: req.mobile_number,
            items: req.items,
        }
    }
}

/// A kitchen decision payload. The status is kept as a string so that unknown values can be
/// answered with a proper validation message rather than a bare deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemStatusParams {
    pub status: String,
    #[serde(default)]
    pub preparation_time: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderListQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
}
