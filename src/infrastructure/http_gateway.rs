use crate::domain::ports::{PaymentGateway, PaymentOrder, PaymentOrderRequest};
use crate::error::{OrderError, Result};
use async_trait::async_trait;

/// Payment-gateway adapter talking JSON over HTTP to the provider.
///
/// One request per call, no retry: any transport failure or non-success
/// status surfaces as `PaymentProviderUnavailable` and the caller decides
/// what to do with the already-created order.
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPaymentGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/checkout/payment-orders",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_payment_order(&self, request: PaymentOrderRequest) -> Result<PaymentOrder> {
        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| OrderError::PaymentProviderUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(OrderError::PaymentProviderUnavailable(format!(
                "provider returned {}",
                response.status()
            )));
        }

        response
            .json::<PaymentOrder>()
            .await
            .map_err(|e| OrderError::PaymentProviderUnavailable(e.to_string()))
    }
}
