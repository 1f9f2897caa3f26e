use crate::domain::order::Order;
use crate::domain::ports::OrderStore;
use crate::domain::status::OrderStatus;
use crate::error::{OrderError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A thread-safe in-memory order store.
///
/// Uses `Arc<RwLock<HashMap<Uuid, Order>>>` to allow shared concurrent
/// access. Ideal for testing or single-process runs where persistence is
/// not required.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
}

impl InMemoryOrderStore {
    /// Creates a new, empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(&self, order: Order) -> Result<Order> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.values().cloned().collect())
    }

    async fn replace(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        if !orders.contains_key(&order.id) {
            return Err(OrderError::OrderNotFound(order.id));
        }
        orders.insert(order.id, order);
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: OrderStatus) -> Result<()> {
        let mut orders = self.orders.write().await;
        match orders.get_mut(&id) {
            Some(order) => {
                order.status = status;
                Ok(())
            }
            None => Err(OrderError::OrderNotFound(id)),
        }
    }
}
