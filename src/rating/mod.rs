pub mod exchange;
pub mod stats;
pub mod trajectory;
pub mod types;

pub use exchange::{Settlement, compute_transfer, settle};
pub use stats::{HeadToHead, HeadToHeadSide, PlayerStats, head_to_head};
pub use trajectory::{RatingTrajectory, TrajectoryPoint, rating_trajectory};
pub use types::{Outcome, PlayerId, RatingValue, STARTING_RATING, Side, TeamStrength};
