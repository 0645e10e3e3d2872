pub mod checkout;
pub mod order_service;
pub mod tracker;
