pub mod rounding;
pub mod services;
