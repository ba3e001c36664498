// Domain layer: patient/drug models, the catalog port and rule matching.

pub mod model;
pub mod ports;
pub mod rules;
