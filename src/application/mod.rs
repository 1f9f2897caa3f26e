//! Application layer containing the core business logic orchestration.
//!
//! This module defines the `OrderService` which creates orders, initiates
//! payment with the optional gateway, reconciles asynchronous payment
//! notifications and applies staff-driven workflow transitions.

pub mod dto;
pub mod service;
