pub mod consistency;
pub mod overlap;
pub mod referential;
pub mod store;

pub use consistency::SchedulingValidator;
pub use overlap::overlaps;
pub use referential::ReferentialValidator;
pub use store::{EntityStore, SupabaseEntityStore};
