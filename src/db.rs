pub mod schema;
pub mod entity_repo;
pub use entity_repo::EntityRepository;
pub mod analytics_repo;
pub use analytics_repo::AnalyticsRepository;
