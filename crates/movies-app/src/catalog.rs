use std::future::Future;

use axum::extract::FromRequestParts;
use bytes::Bytes;
use http::request::Parts;
use movies_dal::{
    genre::GenreRepository,
    movie::{Movie, MovieRepository, NewMovie, UpdateMovie},
    Pool,
};
use movies_types::{PosterError, PosterPolicy};
use tracing::{debug, info};

use crate::state::AppState;

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("No Movie Was Found With ID: {0}")]
    NotFound(i64),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(#[from] movies_dal::Error),
}

impl From<PosterError> for CatalogError {
    fn from(value: PosterError) -> Self {
        CatalogError::InvalidInput(value.to_string())
    }
}

fn missing_as_not_found(id: i64) -> impl FnOnce(movies_dal::Error) -> CatalogError {
    move |e| match e {
        movies_dal::Error::RecordNotFound(_) => CatalogError::NotFound(id),
        e => CatalogError::Storage(e),
    }
}

/// Scalar movie fields as supplied by a client.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieInput {
    pub genre_id: u8,
    pub title: String,
    pub rate: f64,
    pub storyline: String,
    pub year: i32,
}

/// Uploaded poster file.
///
/// `size` is the uploaded size, `data` is empty when the upload was over the
/// poster size limit and was not kept.
#[derive(Debug, Clone)]
pub struct Poster {
    pub file_name: String,
    pub data: Bytes,
    size: u64,
}

impl Poster {
    pub fn new(file_name: impl Into<String>, data: Bytes) -> Self {
        let size = data.len() as u64;
        Poster {
            file_name: file_name.into(),
            data,
            size,
        }
    }

    pub fn discarded(file_name: impl Into<String>, size: u64) -> Self {
        Poster {
            file_name: file_name.into(),
            data: Bytes::new(),
            size,
        }
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

pub struct MovieCatalog {
    movies: MovieRepository,
    genres: GenreRepository,
    policy: PosterPolicy,
}

impl MovieCatalog {
    pub fn new(pool: Pool, policy: PosterPolicy) -> Self {
        MovieCatalog {
            movies: MovieRepository::new(pool.clone()),
            genres: GenreRepository::new(pool),
            policy,
        }
    }

    pub async fn list_all(&self) -> CatalogResult<Vec<Movie>> {
        let movies = self.movies.list_all().await?;
        Ok(movies)
    }

    pub async fn get(&self, id: i64) -> CatalogResult<Movie> {
        self.movies
            .find(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    pub async fn list_by_genre(&self, genre_id: u8) -> CatalogResult<Vec<Movie>> {
        let movies = self.movies.list_by_genre(genre_id).await?;
        debug!("Found {} movies of genre {genre_id}", movies.len());
        Ok(movies)
    }

    pub async fn create(&self, input: MovieInput, poster: Poster) -> CatalogResult<Movie> {
        self.check_poster(&poster)?;
        self.check_genre(input.genre_id).await?;

        let movie = self
            .movies
            .create(NewMovie {
                genre_id: input.genre_id,
                title: input.title,
                poster: poster.data.to_vec(),
                rate: input.rate,
                storyline: input.storyline,
                year: input.year,
            })
            .await?;
        info!("Created movie {} ({})", movie.id, movie.title);
        Ok(movie)
    }

    pub async fn update(
        &self,
        id: i64,
        input: MovieInput,
        poster: Option<Poster>,
    ) -> CatalogResult<Movie> {
        if self.movies.find(id).await?.is_none() {
            return Err(CatalogError::NotFound(id));
        }
        self.check_genre(input.genre_id).await?;
        if let Some(ref poster) = poster {
            self.check_poster(poster)?;
        }

        let movie = self
            .movies
            .update(
                id,
                UpdateMovie {
                    genre_id: input.genre_id,
                    title: input.title,
                    poster: poster.map(|p| p.data.to_vec()),
                    rate: input.rate,
                    storyline: input.storyline,
                    year: input.year,
                },
            )
            .await
            .map_err(missing_as_not_found(id))?;
        info!("Updated movie {id}");
        Ok(movie)
    }

    pub async fn delete(&self, id: i64) -> CatalogResult<Movie> {
        let movie = self
            .movies
            .delete(id)
            .await
            .map_err(missing_as_not_found(id))?;
        info!("Deleted movie {id}");
        Ok(movie)
    }

    fn check_poster(&self, poster: &Poster) -> CatalogResult<()> {
        self.policy
            .check(&poster.file_name, poster.size())
            .inspect_err(|e| debug!("Rejected poster {}: {e}", poster.file_name))?;
        Ok(())
    }

    async fn check_genre(&self, genre_id: u8) -> CatalogResult<()> {
        if self.genres.exists(genre_id).await? {
            Ok(())
        } else {
            debug!("Unknown genre {genre_id}");
            Err(CatalogError::InvalidInput("Invalid Genre ID".to_string()))
        }
    }
}

impl FromRequestParts<AppState> for MovieCatalog {
    type Rejection = http::StatusCode;

    fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        futures::future::ready(Ok(MovieCatalog::new(
            state.pool().clone(),
            state.config().poster.clone(),
        )))
    }
}
