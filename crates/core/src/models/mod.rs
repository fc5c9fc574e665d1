//! Data models for UserDesk

mod user;

pub use user::*;
