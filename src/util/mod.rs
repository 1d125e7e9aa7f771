pub mod human;
pub mod report;
