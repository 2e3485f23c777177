//! Domain layer - webhook verification and transaction assembly.

pub mod transaction;
pub mod webhook;
