pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] clap::Error),

    #[error("Invalid listen address: {0}")]
    InvalidAddress(#[from] std::net::AddrParseError),

    #[error("Database error: {0}")]
    Database(#[from] movies_dal::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
