pub mod core;
pub mod exams;
pub mod students;
