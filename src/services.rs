pub mod entity_service;
pub use entity_service::EntityService;
pub mod analytics_service;
pub use analytics_service::AnalyticsService;
pub mod report_math;
