pub mod recalculation;
pub mod server;
pub mod submission;

pub use recalculation::{RatingDrift, RecalculationReport, RecalculationService};
pub use server::ServerService;
pub use submission::SubmissionService;
