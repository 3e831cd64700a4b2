//! Scheduling rules shared by the appointment, staff and clinical cells:
//! date-range conflicts between staff assignments, existence checks on
//! referenced clients and staff, and consistency between appointments and
//! the records that point at them.

pub mod models;
pub mod services;

pub use models::{AssignmentProposal, DateInterval, EntityKind, SchedulingError};
pub use services::{overlaps, EntityStore, ReferentialValidator, SchedulingValidator, SupabaseEntityStore};
