pub mod cart;
pub mod errors;
pub mod lifecycle;
pub mod order;
pub mod ports;
pub mod tracking;
