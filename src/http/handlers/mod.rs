pub mod core;
pub mod students;
pub mod upload;
