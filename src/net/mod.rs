//! Network layer: wire types, the transport seam, and the authenticated gateway.

pub mod gateway;
pub mod transport;
pub mod types;
