pub mod cart;
pub mod loyalty;
