pub mod auth;
pub mod deals;
pub mod events;
pub mod users;
