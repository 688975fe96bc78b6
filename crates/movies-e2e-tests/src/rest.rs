use anyhow::Result;
use movies_dal::{genre::Genre, movie::Movie};
use reqwest::{Url, multipart};
use serde_json::json;
use tracing::info;

pub async fn create_genre(client: &reqwest::Client, base_url: &Url, name: &str) -> Result<Genre> {
    let payload = json!({"name": name});
    let api_url = base_url.join("genres")?;

    let response = client.post(api_url).json(&payload).send().await?;
    assert!(response.status().is_success());
    assert!(response.status().as_u16() == 201);

    let new_genre: Genre = response.json().await?;
    Ok(new_genre)
}

pub struct MovieFields<'a> {
    pub title: &'a str,
    pub genre_id: u8,
    pub rate: f64,
    pub storyline: &'a str,
    pub year: i32,
}

/// Multipart form as sent by clients, poster is optional.
pub fn movie_form(fields: &MovieFields, poster: Option<(&str, Vec<u8>)>) -> multipart::Form {
    let form = multipart::Form::new()
        .text("title", fields.title.to_string())
        .text("genreId", fields.genre_id.to_string())
        .text("rate", fields.rate.to_string())
        .text("storyline", fields.storyline.to_string())
        .text("year", fields.year.to_string());
    match poster {
        Some((file_name, data)) => form.part(
            "poster",
            multipart::Part::bytes(data).file_name(file_name.to_string()),
        ),
        None => form,
    }
}

pub async fn create_movie(
    client: &reqwest::Client,
    base_url: &Url,
    fields: &MovieFields<'_>,
    poster_name: &str,
    poster: Vec<u8>,
) -> Result<Movie> {
    let api_url = base_url.join("movies")?;
    let form = movie_form(fields, Some((poster_name, poster)));

    let response = client.post(api_url).multipart(form).send().await?;
    info!("Response: {:#?}", response);
    assert!(response.status().is_success());
    assert!(response.status().as_u16() == 200);

    let new_movie: Movie = response.json().await?;
    Ok(new_movie)
}
