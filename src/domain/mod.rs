// Domain layer: 資料模型與對外的 ports（trait）。

pub mod model;
pub mod ports;
