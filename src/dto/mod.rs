pub mod auth;
pub mod cart;
pub mod clothes;
pub mod users;
