pub mod entities;
pub mod analytics;
