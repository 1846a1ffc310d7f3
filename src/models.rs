pub mod history;
pub mod product;
