//! Contrato del almacén de estados (gateway) y backend en memoria.

mod memory;
mod traits;

pub use memory::{GatewayCall, GatewayOp, InMemoryStatusGateway, InMemoryStatusStore};
pub use traits::{GatewayProvider, StatusGateway};
