pub mod collections;
pub mod core;
pub mod dashboard;
pub mod setup;
pub mod students;
pub mod view;
