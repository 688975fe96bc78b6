use serde::{Deserialize, Serialize};

use crate::utils::{file_ext, human_size};

pub const DEFAULT_POSTER_MAX_SIZE: u64 = 1_048_576;
pub const DEFAULT_POSTER_EXTENSIONS: &[&str] = &["png", "jpg"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PosterError {
    #[error("only {0} are allowed!")]
    InvalidExtension(String),
    #[error("Max allowed size for poster is {0}")]
    TooLarge(String),
}

/// Constraints applied to uploaded poster images.
///
/// Extensions are kept lowercased and without the leading dot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterPolicy {
    allowed_extensions: Vec<String>,
    max_size: u64,
}

impl Default for PosterPolicy {
    fn default() -> Self {
        PosterPolicy::new(DEFAULT_POSTER_EXTENSIONS, DEFAULT_POSTER_MAX_SIZE)
    }
}

impl PosterPolicy {
    pub fn new<I, S>(allowed_extensions: I, max_size: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_extensions = allowed_extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        PosterPolicy {
            allowed_extensions,
            max_size,
        }
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    pub fn check_extension(&self, file_name: &str) -> Result<(), PosterError> {
        match file_ext(file_name) {
            Some(ext) if self.allowed_extensions.contains(&ext) => Ok(()),
            _ => Err(PosterError::InvalidExtension(self.extensions_list())),
        }
    }

    pub fn check_size(&self, size: u64) -> Result<(), PosterError> {
        if size > self.max_size {
            Err(PosterError::TooLarge(human_size(self.max_size)))
        } else {
            Ok(())
        }
    }

    /// Extension check comes first, size second.
    pub fn check(&self, file_name: &str, size: u64) -> Result<(), PosterError> {
        self.check_extension(file_name)?;
        self.check_size(size)
    }

    fn extensions_list(&self) -> String {
        let dotted: Vec<String> = self
            .allowed_extensions
            .iter()
            .map(|e| format!(".{e}"))
            .collect();
        match dotted.split_last() {
            None => "no extensions".to_string(),
            Some((last, [])) => last.clone(),
            Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
        }
    }
}
