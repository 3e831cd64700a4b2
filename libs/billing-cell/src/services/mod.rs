pub mod claim;
pub mod invoice;

pub use claim::ClaimService;
pub use invoice::InvoiceService;
