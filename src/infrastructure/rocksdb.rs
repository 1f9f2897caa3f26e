use crate::domain::order::Order;
use crate::domain::ports::OrderStore;
use crate::domain::status::OrderStatus;
use crate::error::{OrderError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Column Family for storing order aggregates.
pub const CF_ORDERS: &str = "orders";

/// A persistent order store implementation using RocksDB.
///
/// Orders are serialized as JSON under their 16-byte UUID key in a
/// dedicated Column Family.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBOrderStore {
    db: Arc<DB>,
}

impl RocksDBOrderStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "orders" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_orders = ColumnFamilyDescriptor::new(CF_ORDERS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_orders])
            .map_err(|e| OrderError::InternalError(Box::new(e)))?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_ORDERS).ok_or_else(|| {
            OrderError::InternalError(Box::new(std::io::Error::other(
                "orders column family not found",
            )))
        })
    }

    fn put(&self, order: &Order) -> Result<()> {
        let cf = self.cf()?;
        let value = serde_json::to_vec(order)?;
        self.db
            .put_cf(cf, order.id.as_bytes(), value)
            .map_err(|e| OrderError::InternalError(Box::new(e)))
    }

    fn fetch(&self, id: Uuid) -> Result<Option<Order>> {
        let cf = self.cf()?;
        let result = self
            .db
            .get_cf(cf, id.as_bytes())
            .map_err(|e| OrderError::InternalError(Box::new(e)))?;
        match result {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl OrderStore for RocksDBOrderStore {
    async fn create(&self, order: Order) -> Result<Order> {
        self.put(&order)?;
        Ok(order)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Order>> {
        self.fetch(id)
    }

    async fn list(&self) -> Result<Vec<Order>> {
        let cf = self.cf()?;
        let mut orders = Vec::new();
        let iter = self.db.iterator_cf(cf, rocksdb::IteratorMode::Start);

        for item in iter {
            let (_key, value) = item.map_err(|e| OrderError::InternalError(Box::new(e)))?;
            orders.push(serde_json::from_slice(&value)?);
        }

        Ok(orders)
    }

    async fn replace(&self, order: Order) -> Result<()> {
        if self.fetch(order.id)?.is_none() {
            return Err(OrderError::OrderNotFound(order.id));
        }
        self.put(&order)
    }

    async fn set_status(&self, id: Uuid, status: OrderStatus) -> Result<()> {
        let mut order = self.fetch(id)?.ok_or(OrderError::OrderNotFound(id))?;
        order.status = status;
        self.put(&order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{Money, OrderItem};
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn sample_order() -> Order {
        let item = OrderItem::new(
            "X-BURGER".to_string(),
            2,
            Money::new(dec!(10.00)).unwrap(),
            Money::ZERO,
        )
        .unwrap();
        Order::new(
            Uuid::new_v4(),
            "token-1".to_string(),
            None,
            vec![item],
            Money::new(dec!(20.00)).unwrap(),
            Money::ZERO,
            Money::new(dec!(20.00)).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDBOrderStore::open(dir.path()).expect("Failed to open RocksDB");

        assert!(store.db.cf_handle(CF_ORDERS).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_order_round_trip() {
        let dir = tempdir().unwrap();
        let store = RocksDBOrderStore::open(dir.path()).unwrap();

        let order = sample_order();
        store.create(order.clone()).await.unwrap();

        let retrieved = store.get(order.id).await.unwrap().unwrap();
        assert_eq!(retrieved, order);

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], order);

        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rocksdb_set_status_persists() {
        let dir = tempdir().unwrap();
        let store = RocksDBOrderStore::open(dir.path()).unwrap();

        let order = sample_order();
        store.create(order.clone()).await.unwrap();
        store
            .set_status(order.id, OrderStatus::Recebido)
            .await
            .unwrap();

        let retrieved = store.get(order.id).await.unwrap().unwrap();
        assert_eq!(retrieved.status, OrderStatus::Recebido);

        let missing = store.set_status(Uuid::new_v4(), OrderStatus::Recebido).await;
        assert!(matches!(missing, Err(OrderError::OrderNotFound(_))));
    }
}
