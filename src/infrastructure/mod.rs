pub mod memory;
pub mod models;
pub mod order_repo;

pub use memory::InMemoryOrderGateway;
pub use order_repo::DieselOrderGateway;
