//! Webhook Ingest - Payment Gateway Webhook Receiver
//!
//! This crate accepts payment-gateway webhook deliveries, verifies the
//! HMAC-SHA256 signature over the raw request body, and persists the parsed
//! payment event as an immutable transaction record.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
