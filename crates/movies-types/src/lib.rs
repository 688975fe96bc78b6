pub mod config;
pub mod poster;
pub mod utils;

pub use poster::{PosterError, PosterPolicy};
