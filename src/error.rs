use thiserror::Error;

/// Startup-time configuration failures. These abort engine construction
/// rather than being recovered at runtime.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("difficulty {difficulty}: {pairs} pairs exceed a pool of {pool} symbols")]
    PoolTooSmall {
        difficulty: &'static str,
        pairs: usize,
        pool: usize,
    },
}
