pub mod constants;
pub mod homework;

pub use homework::{HomeworkRecord, HomeworkStatus};
