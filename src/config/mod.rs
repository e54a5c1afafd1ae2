//! Environment-driven configuration

mod dashboard;

pub use dashboard::{DashboardConfig, LoginCredentials, SectionQueries};
