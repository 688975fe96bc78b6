use clap::Args;
use std::{fs, path::PathBuf};

use crate::poster::{PosterPolicy, DEFAULT_POSTER_MAX_SIZE};

#[derive(Debug, Clone, Args)]
pub struct PosterConfig {
    #[arg(
        long = "poster-max-size",
        env = "MOVIES_POSTER_MAX_SIZE",
        default_value_t = DEFAULT_POSTER_MAX_SIZE,
        help = "Maximum poster size in bytes"
    )]
    pub max_size: u64,

    #[arg(
        long = "poster-extensions",
        env = "MOVIES_POSTER_EXTENSIONS",
        value_delimiter = ',',
        default_value = ".png,.jpg",
        help = "Comma separated list of allowed poster file extensions"
    )]
    pub extensions: Vec<String>,
}

impl From<&PosterConfig> for PosterPolicy {
    fn from(config: &PosterConfig) -> Self {
        PosterPolicy::new(&config.extensions, config.max_size)
    }
}

pub fn default_data_dir() -> String {
    let dir = dirs::data_dir()
        .map(|p| p.join("movies"))
        .unwrap_or_else(|| PathBuf::from("movies"));

    if !fs::exists(&dir).expect("Failed to check if data directory exists") {
        fs::create_dir_all(&dir).expect("Failed to create data directory");
    } else if !dir.is_dir() {
        panic!("Data directory is not a directory",)
    }

    dir.to_string_lossy().to_string()
}
