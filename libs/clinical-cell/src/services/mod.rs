pub mod assessment;
pub mod note;

pub use assessment::AssessmentService;
pub use note::NoteService;
