pub mod assessments;
pub mod filter;
pub mod handlers;
pub mod pagination;
pub mod stats;
pub mod store;
