use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::database::LadderRepository;

pub mod matches;
pub mod players;
pub mod rules;

pub type SharedRepository = Arc<dyn LadderRepository + Send + Sync>;

pub struct AppState {
    pub repository: SharedRepository,
    pub config: AppConfig,
}
