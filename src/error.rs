use thiserror::Error;

#[derive(Error, Debug)]
pub enum OnegoError {
    #[error("{0}")]
    Usage(String),

    #[error("VM not found: {0}")]
    VmNotFound(String),

    #[error("VM name '{name}' is ambiguous, matching ids: {ids}")]
    VmNameAmbiguous { name: String, ids: String },

    #[error("Unable to find IP.")]
    IpNotFound,

    #[error("OpenNebula API error: {0}")]
    Api(String),

    #[error("OpenNebula transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed XML: {0}")]
    XmlParse(String),

    #[error("ssh not ready (vm failed: {state}).")]
    VmFailed { state: String },

    #[error("ssh not ready after {attempts} attempts.")]
    SshNotReady { attempts: u32 },

    #[error("ssh executable not found.")]
    SshNotFound,

    #[error("Failed to execute ssh: {0}")]
    SshExec(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OnegoError>;
