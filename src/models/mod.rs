pub mod booking;
pub mod order;
pub mod order_item;
pub mod product;
pub mod profile;
pub mod service;
