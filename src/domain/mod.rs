//! Domain model of the custody chain: entities, value objects, status
//! lifecycles and the ports the application layer depends on.

pub mod money;
pub mod payment;
pub mod ports;
pub mod receipt;
pub mod reconciliation;
pub mod settlement;
pub mod statement;
pub mod status;
