pub mod user_repo;
pub use user_repo::UserRepository;
pub mod lead_repo;
pub use lead_repo::LeadRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
