pub mod actor;
pub mod job;
pub mod profile;
