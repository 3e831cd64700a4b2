pub mod models;
pub mod handlers;
pub mod router;
pub mod services;

pub use router::{admin_routes, staff_assignment_routes};
