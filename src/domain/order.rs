use crate::domain::status::OrderStatus;
use crate::error::{OrderError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use uuid::Uuid;

/// Non-negative monetary value with fixed-point precision.
///
/// Wrapper around `rust_decimal::Decimal` so that order totals and item
/// prices cannot go negative by construction.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self> {
        if value >= Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(OrderError::ValidationError(
                "monetary value must not be negative".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Money {
    type Error = OrderError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One line of an order, owned exclusively by the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub unit_discount: Money,
}

impl OrderItem {
    pub fn new(
        product_id: String,
        quantity: u32,
        unit_price: Money,
        unit_discount: Money,
    ) -> Result<Self> {
        if product_id.is_empty() {
            return Err(OrderError::ValidationError(
                "item product reference must not be empty".to_string(),
            ));
        }
        if quantity == 0 {
            return Err(OrderError::ValidationError(
                "item quantity must be positive".to_string(),
            ));
        }
        if unit_discount > unit_price {
            return Err(OrderError::ValidationError(
                "item discount must not exceed unit price".to_string(),
            ));
        }
        Ok(Self {
            product_id,
            quantity,
            unit_price,
            unit_discount,
        })
    }

    /// `quantity * (unit_price - unit_discount)`; non-negative because the
    /// discount is capped at the unit price.
    pub fn line_total(&self) -> Money {
        let unit = self.unit_price.value() - self.unit_discount.value();
        Money(unit * Decimal::from(self.quantity))
    }
}

/// The order aggregate root.
///
/// Totals are carried from the caller (pre-validated by the pricing
/// collaborator) but must satisfy `total = subtotal - discount`. Line
/// items are set at creation or replaced wholesale; there is no partial
/// item mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub attendance_token: String,
    pub customer_id: Option<String>,
    pub items: Vec<OrderItem>,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub ticket_code: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new order in `Pendente` with a ticket code derived from
    /// its id.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Uuid,
        attendance_token: String,
        customer_id: Option<String>,
        items: Vec<OrderItem>,
        subtotal: Money,
        discount: Money,
        total: Money,
    ) -> Result<Self> {
        if attendance_token.is_empty() {
            return Err(OrderError::ValidationError(
                "attendance token must not be empty".to_string(),
            ));
        }
        if items.is_empty() {
            return Err(OrderError::ValidationError(
                "order must have at least one item".to_string(),
            ));
        }
        if total.value() != subtotal.value() - discount.value() {
            return Err(OrderError::ValidationError(
                "total must equal subtotal minus discount".to_string(),
            ));
        }
        let ticket_code = Self::ticket_code_for(id);
        Ok(Self {
            id,
            attendance_token,
            customer_id,
            items,
            subtotal,
            discount,
            total,
            ticket_code,
            status: OrderStatus::Pendente,
            created_at: Utc::now(),
        })
    }

    /// Short code the customer uses to pick the order up at the counter.
    fn ticket_code_for(id: Uuid) -> String {
        id.simple().to_string()[..6].to_uppercase()
    }
}
