//! Types d'erreurs pour pmoxspf

/// Erreurs de lecture, de construction et d'écriture XSPF
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing trackList element in XSPF namespace")]
    MissingTrackList,

    #[error("Track has no duration")]
    MissingDuration,

    #[error("Invalid duration: {value:?}")]
    InvalidDuration { value: String },

    #[error("Unknown track field: {0}")]
    UnknownField(String),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] xmltree::ParseError),

    #[error("XML write error: {0}")]
    XmlWrite(#[from] xmltree::Error),

    #[error("Invalid writer configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Type Result spécialisé pour pmoxspf
pub type Result<T> = std::result::Result<T, Error>;
