use crate::{
    catalog::{CatalogError, MovieCatalog},
    error::{ApiError, ApiResult},
    form::{MovieForm, MultipartForm},
    state::AppState,
    validate::Garde,
};
use axum::{
    extract::{DefaultBodyLimit, Json, Path, Query},
    response::IntoResponse,
    routing::get,
};
use http::StatusCode;
#[cfg_attr(not(feature = "openapi"), allow(unused_imports))]
use movies_dal::movie::Movie;
use serde::Deserialize;
use tracing::debug;

#[cfg(feature = "openapi")]
#[derive(serde::Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(unused)]
struct MovieFormDoc {
    title: String,
    genre_id: u8,
    rate: f64,
    storyline: String,
    year: i32,
    /// Required on create, optional on update
    #[schema(value_type = String, format = Binary, content_media_type = "application/octet-stream")]
    poster: String,
}

#[cfg(feature = "openapi")]
#[derive(utoipa::OpenApi)]
#[openapi(paths(list_all, get_by_id, get_by_genre, create, update, delete))]
struct ModuleDocs;

#[cfg(feature = "openapi")]
pub fn api_docs() -> utoipa::openapi::OpenApi {
    use utoipa::OpenApi as _;
    ModuleDocs::openapi()
}

/// Update and delete report a missing movie as 400, existing clients rely on it.
fn missing_as_bad_request(e: CatalogError) -> ApiError {
    match e {
        CatalogError::NotFound(_) => ApiError::InvalidRequest(e.to_string()),
        e => e.into(),
    }
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct GenreQuery {
    #[serde(rename = "genreId", default)]
    pub genre_id: u8,
}

#[cfg_attr(feature = "openapi",  utoipa::path(get, path = "", tag = "Movie", operation_id = "listMovies",
    responses((status = StatusCode::OK, description = "All movies sorted by title", body = Vec<Movie>))))]
pub async fn list_all(catalog: MovieCatalog) -> ApiResult<impl IntoResponse> {
    let movies = catalog.list_all().await?;
    Ok((StatusCode::OK, Json(movies)))
}

#[cfg_attr(feature = "openapi",  utoipa::path(get, path = "/{id}", tag = "Movie", operation_id = "getMovie",
    params(("id" = i64, Path, description = "Movie id")),
    responses((status = StatusCode::OK, description = "Movie", body = Movie),
    (status = StatusCode::NOT_FOUND, description = "No such movie"))))]
pub async fn get_by_id(
    Path(id): Path<i64>,
    catalog: MovieCatalog,
) -> ApiResult<impl IntoResponse> {
    let movie = catalog.get(id).await?;
    Ok((StatusCode::OK, Json(movie)))
}

#[cfg_attr(feature = "openapi",  utoipa::path(get, path = "/GetByGenreId", tag = "Movie", operation_id = "listMoviesByGenre",
    params(GenreQuery),
    responses((status = StatusCode::OK, description = "Movies of genre sorted by rate, best first", body = Vec<Movie>))))]
pub async fn get_by_genre(
    Query(query): Query<GenreQuery>,
    catalog: MovieCatalog,
) -> ApiResult<impl IntoResponse> {
    debug!("Listing movies of genre {}", query.genre_id);
    let movies = catalog.list_by_genre(query.genre_id).await?;
    Ok((StatusCode::OK, Json(movies)))
}

#[cfg_attr(feature = "openapi",  utoipa::path(post, path = "", tag = "Movie", operation_id = "createMovie",
    request_body(content = MovieFormDoc, content_type = "multipart/form-data"),
    responses((status = StatusCode::OK, description = "Created movie", body = Movie),
    (status = StatusCode::BAD_REQUEST, description = "Invalid poster or genre", body = String))))]
pub async fn create(
    catalog: MovieCatalog,
    Garde(MultipartForm(form)): Garde<MultipartForm<MovieForm>>,
) -> ApiResult<impl IntoResponse> {
    let (input, poster) = form.into_parts();
    let poster = poster.ok_or_else(|| ApiError::InvalidRequest("Missing poster file".into()))?;
    let movie = catalog.create(input, poster).await?;
    Ok((StatusCode::OK, Json(movie)))
}

#[cfg_attr(feature = "openapi",  utoipa::path(put, path = "/{id}", tag = "Movie", operation_id = "updateMovie",
    params(("id" = i64, Path, description = "Movie id")),
    request_body(content = MovieFormDoc, content_type = "multipart/form-data"),
    responses((status = StatusCode::OK, description = "Updated movie", body = Movie),
    (status = StatusCode::BAD_REQUEST, description = "Unknown movie, invalid poster or genre", body = String))))]
pub async fn update(
    Path(id): Path<i64>,
    catalog: MovieCatalog,
    Garde(MultipartForm(form)): Garde<MultipartForm<MovieForm>>,
) -> ApiResult<impl IntoResponse> {
    let (input, poster) = form.into_parts();
    let movie = catalog
        .update(id, input, poster)
        .await
        .map_err(missing_as_bad_request)?;
    Ok((StatusCode::OK, Json(movie)))
}

#[cfg_attr(feature = "openapi",  utoipa::path(delete, path = "/{id}", tag = "Movie", operation_id = "deleteMovie",
    params(("id" = i64, Path, description = "Movie id")),
    responses((status = StatusCode::OK, description = "Deleted movie", body = Movie),
    (status = StatusCode::BAD_REQUEST, description = "Unknown movie", body = String))))]
pub async fn delete(
    Path(id): Path<i64>,
    catalog: MovieCatalog,
) -> ApiResult<impl IntoResponse> {
    let movie = catalog.delete(id).await.map_err(missing_as_bad_request)?;
    Ok((StatusCode::OK, Json(movie)))
}

pub fn router(limit_mb: usize) -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(list_all).post(create))
        .route("/GetByGenreId", get(get_by_genre))
        .route("/{id}", get(get_by_id).put(update).delete(delete))
        .layer(DefaultBodyLimit::max(1024 * 1024 * limit_mb))
}
