#[derive(Debug, Clone)]
pub struct LadderSettings {
    pub recent_matches_default: usize,
    pub recent_matches_max: usize,
    pub compare_suggestions: usize,
}

impl Default for LadderSettings {
    fn default() -> Self {
        Self {
            recent_matches_default: 10,
            recent_matches_max: 100,
            compare_suggestions: 10,
        }
    }
}

impl LadderSettings {
    /// Clamps a requested match log length into the allowed range.
    pub fn recent_matches_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.recent_matches_default)
            .clamp(1, self.recent_matches_max)
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "match_ladder.db".to_string(),
        }
    }
}

impl DatabaseSettings {
    /// Reads `DATABASE_PATH`, falling back to the default file name.
    pub fn from_env() -> Self {
        std::env::var("DATABASE_PATH")
            .map(|path| Self { path })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ladder: LadderSettings,
    pub database: DatabaseSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            ladder: LadderSettings::default(),
            database: DatabaseSettings::from_env(),
        }
    }
}
