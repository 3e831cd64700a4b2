pub mod client;
pub mod dashboard;
pub mod document;
pub mod family;
pub mod insurance;
pub mod reminder;

pub use client::ClientService;
pub use dashboard::DashboardService;
pub use document::DocumentService;
pub use family::FamilyContactService;
pub use insurance::InsuranceService;
pub use reminder::ReminderService;
