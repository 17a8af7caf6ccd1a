pub mod announcement;
pub mod day;
pub mod notice;
