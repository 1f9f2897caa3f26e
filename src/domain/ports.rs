use super::order::{Money, Order};
use super::status::OrderStatus;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn create(&self, order: Order) -> Result<Order>;
    async fn get(&self, id: Uuid) -> Result<Option<Order>>;
    async fn list(&self) -> Result<Vec<Order>>;
    async fn replace(&self, order: Order) -> Result<()>;
    async fn set_status(&self, id: Uuid, status: OrderStatus) -> Result<()>;
}

pub type OrderStoreBox = Box<dyn OrderStore>;

/// One line of a payment order, in the provider's vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentOrderItem {
    pub id: String,
    pub title: String,
    pub quantity: u32,
    pub unit_price: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentOrderRequest {
    pub order_id: Uuid,
    pub client_id: String,
    pub items: Vec<PaymentOrderItem>,
}

/// Provider response to a payment-order request.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentOrder {
    pub id: String,
    pub status: String,
    pub redirect_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Requests a payment order from the external provider.
    ///
    /// Single blocking request-response; no retry. Failures surface as
    /// `PaymentProviderUnavailable`.
    async fn create_payment_order(&self, request: PaymentOrderRequest) -> Result<PaymentOrder>;
}

pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
