pub mod models;
pub mod handlers;
pub mod router;
pub mod services;

pub use router::{auth_routes, auth_routes_with_notifier};
