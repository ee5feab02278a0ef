pub mod admin;
pub mod bookings;
pub mod cart;
pub mod catalog;
pub mod orders;
pub mod points;
pub mod profile;
