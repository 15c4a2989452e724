pub mod models;

pub use models::{
    MatchRecord, MatchSubmission, NewMatchRecord, PendingMatch, Player, RecordedMatch, ValidMatch,
    normalize_display_name,
};
