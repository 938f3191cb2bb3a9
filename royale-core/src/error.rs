//! Error types shared by the simulation crates

/// Errors raised by precondition failures in the simulation
#[derive(Debug, thiserror::Error)]
pub enum RoyaleError {
    #[error("no prize table found for tournament type '{0}'")]
    UnknownTournamentType(String),

    #[error("unknown tournament template '{0}'")]
    UnknownTemplate(String),

    #[error("unknown config key '{0}'")]
    UnknownConfigKey(String),

    #[error("invalid value '{value}' for config key '{key}'")]
    InvalidConfigValue { key: String, value: String },

    #[error("no player pool found for region '{0}'")]
    UnknownRegion(String),
}

pub type Result<T> = std::result::Result<T, RoyaleError>;
