// Domain layer: Horizon payloads, the exported row, and the ports the pipeline runs against.

pub mod model;
pub mod ports;
