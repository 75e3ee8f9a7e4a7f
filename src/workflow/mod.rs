pub mod listing_ctx;
pub mod wizard;

pub use listing_ctx::ListingCtx;
pub use wizard::{FailureReason, WizardOutcome, WizardState, WizardStepExecutor};
