pub mod assignment;
pub mod auth;
pub mod dashboard_service;
pub mod lead_service;
