pub mod products;
pub mod transfer;
