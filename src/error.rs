use std::path::PathBuf;

/// Problems with session parameters, raised before a match is created.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    ZeroInterval { field: &'static str },
    #[error("{field} = {value} ms is not a multiple of the {step} ms simulation step")]
    UnalignedInterval {
        field: &'static str,
        value: u32,
        step: u32,
    },
    #[error("boss_health must be at least 1")]
    ZeroBossHealth,
    #[error("failed to read parameter file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed parameter file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
