//! Domain layer: the order aggregate, its lifecycle states, the
//! payment-status translator and the storage/gateway ports.

pub mod order;
pub mod payment;
pub mod ports;
pub mod status;
