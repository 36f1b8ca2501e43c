pub mod auth;
pub mod buy_boxes;
pub mod connection;
pub mod deals;

pub use connection::{init_db, Database};
