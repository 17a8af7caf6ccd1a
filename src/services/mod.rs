pub mod admin;
pub mod notice;
