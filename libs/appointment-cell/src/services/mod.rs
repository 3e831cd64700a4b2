pub mod appointment;
pub mod telehealth;

pub use appointment::AppointmentService;
pub use telehealth::TelehealthService;
