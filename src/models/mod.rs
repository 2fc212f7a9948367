pub mod store;
pub mod user;
