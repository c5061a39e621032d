// Domain layer: article models and ports. Only serde beyond std.

pub mod model;
pub mod ports;
