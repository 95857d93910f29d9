// Domain layer: record model and ports. Nothing here knows about a concrete store.

pub mod model;
pub mod ports;
