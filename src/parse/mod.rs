pub mod fields;
pub mod line;
pub mod list;
pub mod status;
pub mod topology;
