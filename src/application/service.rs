use crate::application::dto::{OrderInput, OrderOutput};
use crate::domain::order::Order;
use crate::domain::payment;
use crate::domain::ports::{OrderStoreBox, PaymentGatewayBox, PaymentOrderItem, PaymentOrderRequest};
use crate::domain::status::OrderStatus;
use crate::error::{OrderError, Result};
use uuid::Uuid;

/// The main entry point for the ordering backend.
///
/// `OrderService` owns the order store and the optional payment gateway.
/// It is the only component that mutates order status: the translator and
/// staff actions compute a candidate status and delegate to
/// [`OrderService::update_status`].
pub struct OrderService {
    store: OrderStoreBox,
    gateway: Option<PaymentGatewayBox>,
    payment_client_id: Option<String>,
}

impl OrderService {
    /// Creates a new `OrderService` instance.
    ///
    /// The gateway is an explicit optional dependency: without it (or
    /// with an empty client id) orders are still created, just without
    /// payment initiation.
    pub fn new(
        store: OrderStoreBox,
        gateway: Option<PaymentGatewayBox>,
        payment_client_id: Option<String>,
    ) -> Self {
        Self {
            store,
            gateway,
            payment_client_id,
        }
    }

    /// Creates an order in `Pendente` and, when a gateway is configured,
    /// requests a payment order for it.
    ///
    /// The order is committed before the gateway call: a
    /// `PaymentProviderUnavailable` error from this method means "order
    /// created, payment pending", not order failure.
    pub async fn create_order(&self, input: &OrderInput) -> Result<OrderOutput> {
        let order = input.to_entity()?;
        let order = self.store.create(order).await?;
        tracing::info!(order_id = %order.id, ticket = %order.ticket_code, "order created");

        let redirect_url = self.request_payment(&order).await?;
        Ok(OrderOutput::from_entity(&order, redirect_url))
    }

    async fn request_payment(&self, order: &Order) -> Result<Option<String>> {
        let client_id = self
            .payment_client_id
            .as_deref()
            .filter(|id| !id.is_empty());
        let (Some(gateway), Some(client_id)) = (&self.gateway, client_id) else {
            return Ok(None);
        };

        let request = PaymentOrderRequest {
            order_id: order.id,
            client_id: client_id.to_string(),
            items: order
                .items
                .iter()
                .map(|item| PaymentOrderItem {
                    id: item.product_id.clone(),
                    title: format!("Produto {}", item.product_id),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                })
                .collect(),
        };

        let payment_order = gateway.create_payment_order(request).await?;
        tracing::info!(order_id = %order.id, payment_order_id = %payment_order.id, "payment order created");
        Ok(payment_order.redirect_url)
    }

    /// Full-replace update of an existing order's items, totals and
    /// customer reference. Identity, ticket code, status and creation
    /// time are preserved.
    pub async fn update_order(&self, input: &OrderInput) -> Result<OrderOutput> {
        let id = input.id.ok_or_else(|| {
            OrderError::ValidationError("order update requires an id".to_string())
        })?;
        let existing = self
            .store
            .get(id)
            .await?
            .ok_or(OrderError::OrderNotFound(id))?;

        let mut order = input.to_entity()?;
        order.id = existing.id;
        order.ticket_code = existing.ticket_code;
        order.status = existing.status;
        order.created_at = existing.created_at;

        self.store.replace(order.clone()).await?;
        Ok(OrderOutput::from_entity(&order, None))
    }

    pub async fn get_order(&self, id: Uuid) -> Result<OrderOutput> {
        let order = self
            .store
            .get(id)
            .await?
            .ok_or(OrderError::OrderNotFound(id))?;
        Ok(OrderOutput::from_entity(&order, None))
    }

    /// Persists `status` as the order's current status.
    ///
    /// Idempotent; does not validate transition legality, which is
    /// enforced by the translator and the staff-action callers.
    pub async fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<()> {
        self.store.set_status(id, status).await?;
        tracing::info!(order_id = %id, status = %status, "order status updated");
        Ok(())
    }

    /// Reconciles an asynchronous provider notification with the order.
    ///
    /// Unrecognized or transient provider statuses are no-ops with no
    /// store call. A translated status is applied unless it would move a
    /// terminal order or regress the workflow; `Cancelado` re-delivery is
    /// absorbed silently.
    pub async fn apply_payment_notification(
        &self,
        id: Uuid,
        provider_status: Option<&str>,
    ) -> Result<()> {
        let Some(next) = payment::translate(provider_status) else {
            return Ok(());
        };

        let order = self
            .store
            .get(id)
            .await?
            .ok_or(OrderError::OrderNotFound(id))?;

        if order.status.is_terminal() || order.status.has_progressed_past(next) {
            tracing::warn!(
                order_id = %id,
                current = %order.status,
                proposed = %next,
                "stale payment notification ignored"
            );
            return Ok(());
        }

        self.update_status(id, next).await
    }

    pub async fn start_preparation(&self, id: Uuid) -> Result<()> {
        self.staff_transition(id, OrderStatus::EmPreparacao).await
    }

    pub async fn finish_preparation(&self, id: Uuid) -> Result<()> {
        self.staff_transition(id, OrderStatus::Pronto).await
    }

    pub async fn finalize(&self, id: Uuid) -> Result<()> {
        self.staff_transition(id, OrderStatus::Finalizado).await
    }

    /// Cancels an order. Cancelling an already-cancelled order is a
    /// no-op; a finalized order can no longer be cancelled.
    pub async fn cancel(&self, id: Uuid) -> Result<()> {
        let order = self
            .store
            .get(id)
            .await?
            .ok_or(OrderError::OrderNotFound(id))?;
        if order.status == OrderStatus::Cancelado {
            return Ok(());
        }
        if order.status == OrderStatus::Finalizado {
            return Err(OrderError::ValidationError(
                "finalized order cannot be cancelled".to_string(),
            ));
        }
        self.update_status(id, OrderStatus::Cancelado).await
    }

    async fn staff_transition(&self, id: Uuid, target: OrderStatus) -> Result<()> {
        let order = self
            .store
            .get(id)
            .await?
            .ok_or(OrderError::OrderNotFound(id))?;
        if order.status == target {
            return Ok(());
        }
        if order.status.is_terminal() {
            return Err(OrderError::ValidationError(format!(
                "order is {} and accepts no further transitions",
                order.status
            )));
        }
        self.update_status(id, target).await
    }

    /// Consumes the service and returns the final state of all orders,
    /// oldest first.
    pub async fn into_orders(self) -> Result<Vec<Order>> {
        let mut orders = self.store.list().await?;
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::OrderItemInput;
    use crate::domain::ports::{OrderStore, PaymentGateway, PaymentOrder};
    use crate::infrastructure::in_memory::InMemoryOrderStore;
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticGateway {
        redirect_url: Option<String>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PaymentGateway for StaticGateway {
        async fn create_payment_order(
            &self,
            request: PaymentOrderRequest,
        ) -> Result<PaymentOrder> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(PaymentOrder {
                id: format!("po-{}", request.order_id),
                status: "pending".to_string(),
                redirect_url: self.redirect_url.clone(),
                created_at: Utc::now(),
            })
        }
    }

    struct FailingGateway;

    #[async_trait]
    impl PaymentGateway for FailingGateway {
        async fn create_payment_order(
            &self,
            _request: PaymentOrderRequest,
        ) -> Result<PaymentOrder> {
            Err(OrderError::PaymentProviderUnavailable(
                "connection refused".to_string(),
            ))
        }
    }

    /// Store decorator that counts status writes.
    struct CountingStore {
        inner: InMemoryOrderStore,
        set_status_calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl OrderStore for CountingStore {
        async fn create(&self, order: Order) -> Result<Order> {
            self.inner.create(order).await
        }
        async fn get(&self, id: Uuid) -> Result<Option<Order>> {
            self.inner.get(id).await
        }
        async fn list(&self) -> Result<Vec<Order>> {
            self.inner.list().await
        }
        async fn replace(&self, order: Order) -> Result<()> {
            self.inner.replace(order).await
        }
        async fn set_status(&self, id: Uuid, status: OrderStatus) -> Result<()> {
            self.set_status_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.set_status(id, status).await
        }
    }

    fn input_with_id(id: Uuid) -> OrderInput {
        OrderInput {
            id: Some(id),
            attendance_token: "token-1".to_string(),
            customer_id: None,
            items: vec![OrderItemInput {
                product_id: "X-BURGER".to_string(),
                quantity: 2,
                unit_price: dec!(10.00),
                unit_discount: dec!(0.00),
            }],
            subtotal: dec!(20.00),
            discount: dec!(0.00),
            total: dec!(20.00),
        }
    }

    fn service_without_gateway() -> OrderService {
        OrderService::new(Box::new(InMemoryOrderStore::new()), None, None)
    }

    #[tokio::test]
    async fn test_create_without_gateway_has_no_redirect() {
        let service = service_without_gateway();
        let out = service.create_order(&input_with_id(Uuid::new_v4())).await.unwrap();

        assert_eq!(out.status, OrderStatus::Pendente);
        assert!(out.redirect_url.is_none());
    }

    #[tokio::test]
    async fn test_create_with_gateway_attaches_redirect() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gateway = StaticGateway {
            redirect_url: Some("https://pay.example/checkout/1".to_string()),
            calls: calls.clone(),
        };
        let service = OrderService::new(
            Box::new(InMemoryOrderStore::new()),
            Some(Box::new(gateway)),
            Some("client-1".to_string()),
        );

        let out = service.create_order(&input_with_id(Uuid::new_v4())).await.unwrap();
        assert_eq!(
            out.redirect_url.as_deref(),
            Some("https://pay.example/checkout/1")
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_client_id_skips_payment_initiation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gateway = StaticGateway {
            redirect_url: Some("https://pay.example/checkout/1".to_string()),
            calls: calls.clone(),
        };
        let service = OrderService::new(
            Box::new(InMemoryOrderStore::new()),
            Some(Box::new(gateway)),
            Some(String::new()),
        );

        let out = service.create_order(&input_with_id(Uuid::new_v4())).await.unwrap();
        assert!(out.redirect_url.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_gateway_failure_still_commits_order() {
        let store = InMemoryOrderStore::new();
        let id = Uuid::new_v4();
        let service = OrderService::new(
            Box::new(store.clone()),
            Some(Box::new(FailingGateway)),
            Some("client-1".to_string()),
        );

        let result = service.create_order(&input_with_id(id)).await;
        assert!(matches!(
            result,
            Err(OrderError::PaymentProviderUnavailable(_))
        ));

        // The order is committed before the gateway call.
        let stored = store.get(id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Pendente);
    }

    #[tokio::test]
    async fn test_paid_notification_moves_order_to_recebido() {
        let service = service_without_gateway();
        let id = Uuid::new_v4();
        service.create_order(&input_with_id(id)).await.unwrap();

        service
            .apply_payment_notification(id, Some("paid"))
            .await
            .unwrap();
        assert_eq!(service.get_order(id).await.unwrap().status, OrderStatus::Recebido);
    }

    #[tokio::test]
    async fn test_pending_notification_makes_no_store_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let store = CountingStore {
            inner: InMemoryOrderStore::new(),
            set_status_calls: calls.clone(),
        };
        let id = Uuid::new_v4();
        let service = OrderService::new(Box::new(store), None, None);
        service.create_order(&input_with_id(id)).await.unwrap();

        service
            .apply_payment_notification(id, Some("pending"))
            .await
            .unwrap();
        service.apply_payment_notification(id, None).await.unwrap();
        service
            .apply_payment_notification(id, Some("garbage"))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(service.get_order(id).await.unwrap().status, OrderStatus::Pendente);
    }

    #[tokio::test]
    async fn test_paid_notification_is_idempotent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let store = CountingStore {
            inner: InMemoryOrderStore::new(),
            set_status_calls: calls.clone(),
        };
        let id = Uuid::new_v4();
        let service = OrderService::new(Box::new(store), None, None);
        service.create_order(&input_with_id(id)).await.unwrap();

        service
            .apply_payment_notification(id, Some("paid"))
            .await
            .unwrap();
        service
            .apply_payment_notification(id, Some("paid"))
            .await
            .unwrap();

        // One logical update per call, same observable state after both.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(service.get_order(id).await.unwrap().status, OrderStatus::Recebido);
    }

    #[tokio::test]
    async fn test_stale_paid_notification_does_not_regress() {
        let service = service_without_gateway();
        let id = Uuid::new_v4();
        service.create_order(&input_with_id(id)).await.unwrap();
        service.apply_payment_notification(id, Some("paid")).await.unwrap();
        service.start_preparation(id).await.unwrap();

        // Re-delivered "paid" must not pull the order back to Recebido.
        service.apply_payment_notification(id, Some("paid")).await.unwrap();
        assert_eq!(
            service.get_order(id).await.unwrap().status,
            OrderStatus::EmPreparacao
        );
    }

    #[tokio::test]
    async fn test_refunded_notification_cancels() {
        let service = service_without_gateway();
        let id = Uuid::new_v4();
        service.create_order(&input_with_id(id)).await.unwrap();

        service
            .apply_payment_notification(id, Some("refunded"))
            .await
            .unwrap();
        assert_eq!(service.get_order(id).await.unwrap().status, OrderStatus::Cancelado);

        // Re-delivery of the rejection is absorbed.
        service
            .apply_payment_notification(id, Some("failed"))
            .await
            .unwrap();
        assert_eq!(service.get_order(id).await.unwrap().status, OrderStatus::Cancelado);
    }

    #[tokio::test]
    async fn test_notification_for_unknown_order() {
        let service = service_without_gateway();
        let result = service
            .apply_payment_notification(Uuid::new_v4(), Some("paid"))
            .await;
        assert!(matches!(result, Err(OrderError::OrderNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_status_unknown_order() {
        let service = service_without_gateway();
        let result = service
            .update_status(Uuid::new_v4(), OrderStatus::Recebido)
            .await;
        assert!(matches!(result, Err(OrderError::OrderNotFound(_))));
    }

    #[tokio::test]
    async fn test_staff_workflow_to_finalizado() {
        let service = service_without_gateway();
        let id = Uuid::new_v4();
        service.create_order(&input_with_id(id)).await.unwrap();
        service.apply_payment_notification(id, Some("paid")).await.unwrap();

        service.start_preparation(id).await.unwrap();
        service.finish_preparation(id).await.unwrap();
        service.finalize(id).await.unwrap();
        assert_eq!(
            service.get_order(id).await.unwrap().status,
            OrderStatus::Finalizado
        );

        // Terminal: no further workflow transitions, no cancellation.
        assert!(service.start_preparation(id).await.is_err());
        assert!(service.cancel(id).await.is_err());
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let service = service_without_gateway();
        let id = Uuid::new_v4();
        service.create_order(&input_with_id(id)).await.unwrap();

        service.cancel(id).await.unwrap();
        service.cancel(id).await.unwrap();
        assert_eq!(service.get_order(id).await.unwrap().status, OrderStatus::Cancelado);
    }

    #[tokio::test]
    async fn test_update_order_replaces_items_and_totals() {
        let service = service_without_gateway();
        let id = Uuid::new_v4();
        let created = service.create_order(&input_with_id(id)).await.unwrap();

        let mut updated = input_with_id(id);
        updated.items[0].quantity = 3;
        updated.subtotal = dec!(30.00);
        updated.discount = dec!(5.00);
        updated.total = dec!(25.00);

        let out = service.update_order(&updated).await.unwrap();
        assert_eq!(out.total, dec!(25.00));
        assert_eq!(out.ticket_code, created.ticket_code);
        assert_eq!(out.status, OrderStatus::Pendente);
    }

    #[tokio::test]
    async fn test_update_order_requires_known_id() {
        let service = service_without_gateway();
        let result = service.update_order(&input_with_id(Uuid::new_v4())).await;
        assert!(matches!(result, Err(OrderError::OrderNotFound(_))));

        let mut no_id = input_with_id(Uuid::new_v4());
        no_id.id = None;
        assert!(matches!(
            service.update_order(&no_id).await,
            Err(OrderError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_into_orders_returns_all() {
        let service = service_without_gateway();
        for _ in 0..3 {
            service.create_order(&input_with_id(Uuid::new_v4())).await.unwrap();
        }
        let orders = service.into_orders().await.unwrap();
        assert_eq!(orders.len(), 3);
    }
}
