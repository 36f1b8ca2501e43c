pub mod magic;
pub mod sessions;
pub mod token;
