use crate::domain::order::{Money, Order, OrderItem};
use crate::domain::status::OrderStatus;
use crate::error::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Incoming order payload for create and full-replace update.
///
/// Totals are carried as given; `to_entity` only checks the structural
/// invariants (non-negative money, total arithmetic, item quantities).
#[derive(Debug, Clone, Deserialize)]
pub struct OrderInput {
    /// Client-supplied id; generated when absent.
    #[serde(default)]
    pub id: Option<Uuid>,
    pub attendance_token: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    pub items: Vec<OrderItemInput>,
    pub subtotal: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemInput {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    #[serde(default)]
    pub unit_discount: Decimal,
}

impl OrderItemInput {
    pub fn to_entity(&self) -> Result<OrderItem> {
        OrderItem::new(
            self.product_id.clone(),
            self.quantity,
            Money::new(self.unit_price)?,
            Money::new(self.unit_discount)?,
        )
    }
}

impl OrderInput {
    /// Builds a fresh `Pendente` order from this input.
    pub fn to_entity(&self) -> Result<Order> {
        let items = self
            .items
            .iter()
            .map(OrderItemInput::to_entity)
            .collect::<Result<Vec<_>>>()?;
        Order::new(
            self.id.unwrap_or_else(Uuid::new_v4),
            self.attendance_token.clone(),
            self.customer_id.clone(),
            items,
            Money::new(self.subtotal)?,
            Money::new(self.discount)?,
            Money::new(self.total)?,
        )
    }
}

/// Outgoing order representation, including the payment redirect URL
/// when the provider issued one.
#[derive(Debug, Clone, Serialize)]
pub struct OrderOutput {
    pub id: Uuid,
    pub ticket_code: String,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub redirect_url: Option<String>,
}

impl OrderOutput {
    pub fn from_entity(order: &Order, redirect_url: Option<String>) -> Self {
        Self {
            id: order.id,
            ticket_code: order.ticket_code.clone(),
            status: order.status,
            subtotal: order.subtotal.value(),
            discount: order.discount.value(),
            total: order.total.value(),
            created_at: order.created_at,
            redirect_url,
        }
    }
}
