pub mod assignment;
pub mod preference;

pub use assignment::AssignmentService;
pub use preference::PreferenceService;
