use crate::{error::ApiResult, repository_from_request, state::AppState, validate::Garde};
use axum::{extract::Json, response::IntoResponse, routing::get};
use http::StatusCode;
#[cfg_attr(not(feature = "openapi"), allow(unused_imports))]
use movies_dal::genre::{CreateGenre, Genre, GenreRepository};

repository_from_request!(GenreRepository);

#[cfg(feature = "openapi")]
#[derive(utoipa::OpenApi)]
#[openapi(paths(list_genres, create_genre))]
struct ModuleDocs;

#[cfg(feature = "openapi")]
pub fn api_docs() -> utoipa::openapi::OpenApi {
    use utoipa::OpenApi as _;
    ModuleDocs::openapi()
}

#[cfg_attr(feature = "openapi",  utoipa::path(get, path = "", tag = "Genre", operation_id = "listGenres",
    responses((status = StatusCode::OK, description = "All genres sorted by name", body = Vec<Genre>))))]
pub async fn list_genres(repository: GenreRepository) -> ApiResult<impl IntoResponse> {
    let genres = repository.list().await?;
    Ok((StatusCode::OK, Json(genres)))
}

#[cfg_attr(feature = "openapi",  utoipa::path(post, path = "", tag = "Genre", operation_id = "createGenre",
    request_body = CreateGenre,
    responses((status = StatusCode::CREATED, description = "Created genre", body = Genre))))]
pub async fn create_genre(
    repository: GenreRepository,
    Garde(Json(payload)): Garde<Json<CreateGenre>>,
) -> ApiResult<impl IntoResponse> {
    let genre = repository.create(payload).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/", get(list_genres).post(create_genre))
}
