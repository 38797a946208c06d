pub mod categories;
pub mod config;
pub mod report;
pub mod session;
pub mod settings;
pub mod timer;
