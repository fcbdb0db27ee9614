pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod view;

pub use config::Config;
pub use dashboard::Dashboard;
pub use error::{ApiError, ApiResult, DashboardError, DashboardResult};
