pub mod catalog;
pub mod reply;
