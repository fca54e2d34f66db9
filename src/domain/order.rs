use crate::core::{FieldValue, Record, RecordId, Result};
use crate::schema::{FieldSchema, FieldSchemaEntry, SelectOption, lenient_number};
use crate::table::{ColumnSpec, currency};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const RESOURCE: &str = "orders";

/// Status identifier of orders waiting to be delivered.
pub const AWAITING_DELIVERY: i64 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatus {
    pub id: String,
    pub identifier: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub order_number: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub delivery_date: Option<String>,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub is_delivered: bool,
    pub order_status: OrderStatus,
}

impl Record for Order {
    fn id(&self) -> RecordId {
        self.id.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

pub fn schema() -> Result<FieldSchema> {
    FieldSchema::new(vec![
        FieldSchemaEntry::date("delivery_date", "Data de entrega"),
        FieldSchemaEntry::select(
            "payment_method",
            "Forma de pagamento",
            vec![
                SelectOption::new("pix", "PIX"),
                SelectOption::new("cash", "Dinheiro"),
                SelectOption::new("card", "Cartão"),
            ],
        )
        .required(),
        FieldSchemaEntry::text("notes", "Observações").max_length(500),
    ])
}

pub fn columns() -> Vec<ColumnSpec<Order>> {
    vec![
        ColumnSpec::field("order_number", "Nº").always_visible(),
        ColumnSpec::field("customer_name", "Cliente"),
        ColumnSpec::field("total", "Total").cell(currency("R$")),
        ColumnSpec::new("status", "Status", |o: &Order| {
            FieldValue::from(o.order_status.name.as_str())
        }),
        ColumnSpec::field("delivery_date", "Entrega"),
    ]
}

/// Keeps only orders waiting for delivery.
pub fn awaiting_delivery(order: &Order) -> bool {
    order.order_status.identifier == AWAITING_DELIVERY
}

/// Ascending by order number; numbers that do not parse count as `0`.
pub fn by_order_number(a: &Order, b: &Order) -> Ordering {
    let left = lenient_number(&a.order_number);
    let right = lenient_number(&b.order_number);
    left.partial_cmp(&right).unwrap_or(Ordering::Equal)
}
