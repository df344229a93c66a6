// Domain layer: the progress snapshot, post and chart values, and the ports the
// engine drives. No I/O here.

pub mod model;
pub mod ports;
