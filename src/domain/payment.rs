use crate::domain::status::OrderStatus;
use crate::error::{OrderError, Result};
use serde::Deserialize;

/// The only notification kind this backend accepts, matched exactly.
pub const NOTIFICATION_KIND_PAYMENT: &str = "payment";

/// Inbound payment webhook payload.
///
/// Field names (`type`, `signature`, `status`) are the provider's wire
/// contract and must not be renamed. The `signature` is carried as an
/// opaque value and is not verified.
// TODO: verify `signature` against the provider's signing secret before
// exposing the webhook publicly.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentNotification {
    pub r#type: String,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Gatekeeps inbound webhook calls before any translation happens.
///
/// Only the exact literal `payment` passes; case variants and unrelated
/// kinds fail with `InvalidNotificationKind`.
pub fn validate_kind(kind: &str) -> Result<()> {
    if kind == NOTIFICATION_KIND_PAYMENT {
        Ok(())
    } else {
        Err(OrderError::InvalidNotificationKind)
    }
}

/// Maps a provider payment status to an order-status transition.
///
/// Case-insensitive, total and deterministic. Unrecognized, empty or
/// absent statuses translate to `None` (preserve the current status);
/// they are never errors.
pub fn translate(provider_status: Option<&str>) -> Option<OrderStatus> {
    match provider_status?.to_ascii_lowercase().as_str() {
        "paid" => Some(OrderStatus::Recebido),
        "failed" | "cancelled" | "refunded" => Some(OrderStatus::Cancelado),
        _ => None,
    }
}

/// True when the provider reports the payment as settled.
pub fn is_approved(provider_status: &str) -> bool {
    provider_status.eq_ignore_ascii_case("paid")
}

/// True when the provider reports the payment as lost.
///
/// Also covers `error`, which `translate` maps to a no-op: callers can
/// react to a rejected payment without forcing a status transition.
pub fn is_rejected(provider_status: &str) -> bool {
    matches!(
        provider_status.to_ascii_lowercase().as_str(),
        "failed" | "cancelled" | "refunded" | "error"
    )
}
