pub mod aggregator;
pub mod dashboard_handlers;
pub mod dashboard_service;

pub use aggregator::{DashboardSummary, DashboardTask, PriorityTotal};
pub use dashboard_handlers::{dashboard_statistics, DashboardResponse};
pub use dashboard_service::DashboardService;
