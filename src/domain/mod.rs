// Domain layer: core record types and ports (interfaces). No knowledge of
// HTTP, CSV or XML lives here.

pub mod model;
pub mod ports;
