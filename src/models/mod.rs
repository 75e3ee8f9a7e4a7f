pub mod listing;
pub mod report;
pub mod search;

pub use listing::{FieldValue, ListingDetails, ListingHandle};
pub use report::{ApplicationRecord, PageOutcome, Quota, SessionReport, Termination};
pub use search::{SearchFilters, SearchQuery};
