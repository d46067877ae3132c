pub mod auth_service;
pub mod cart_service;
pub mod clothes_service;
pub mod user_service;
