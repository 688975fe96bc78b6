use base64::{Engine as _, engine::general_purpose::STANDARD};
use movies_dal::movie::Movie;
use movies_e2e_tests::{
    extend_url, launch_env, prepare_env,
    rest::{MovieFields, create_genre, create_movie, movie_form},
};
use tracing::info;
use tracing_test::traced_test;

const INCEPTION: MovieFields = MovieFields {
    title: "Inception",
    genre_id: 1,
    rate: 8.8,
    storyline: "A thief who steals corporate secrets through dream-sharing",
    year: 2010,
};

#[tokio::test]
#[traced_test]
async fn test_movie_lifecycle() {
    let (args, _config_guard) = prepare_env("test_movies").await.unwrap();
    let base_url = args.base_url.clone();
    let (client, _state) = launch_env(args).await.unwrap();

    let sci_fi = create_genre(&client, &base_url, "Sci-Fi").await.unwrap();
    assert_eq!(sci_fi.id, 1);
    let drama = create_genre(&client, &base_url, "Drama").await.unwrap();

    let poster = vec![0x42u8; 2048];
    let movie = create_movie(&client, &base_url, &INCEPTION, "inception.jpg", poster.clone())
        .await
        .unwrap();
    assert!(movie.id > 0);
    assert_eq!(movie.title, "Inception");
    assert_eq!(movie.rate, 8.8);
    assert_eq!(movie.year, 2010);
    assert_eq!(movie.poster.len(), 2048);
    assert_eq!(movie.genre.as_ref().unwrap().name, "Sci-Fi");

    let api_url = base_url.join("movies").unwrap();
    let record_url = extend_url(&api_url, movie.id);

    let response = client.get(record_url.clone()).send().await.unwrap();
    info!("Response: {:#?}", response);
    assert!(response.status().is_success());
    let value: serde_json::Value = response.json().await.unwrap();
    let encoded = value["poster"].as_str().unwrap();
    assert_eq!(STANDARD.decode(encoded).unwrap(), poster);
    let loaded: Movie = serde_json::from_value(value).unwrap();
    assert_eq!(loaded, movie);

    // update without poster keeps the stored one
    let fields = MovieFields {
        title: "Inception (Director's cut)",
        genre_id: drama.id,
        rate: 9.0,
        ..INCEPTION
    };
    let response = client
        .put(record_url.clone())
        .multipart(movie_form(&fields, None))
        .send()
        .await
        .unwrap();
    info!("Response: {:#?}", response);
    assert_eq!(response.status().as_u16(), 200);
    let updated: Movie = response.json().await.unwrap();
    assert_eq!(updated.title, "Inception (Director's cut)");
    assert_eq!(updated.genre_id, drama.id);
    assert_eq!(updated.poster, poster);

    let response = client.delete(record_url.clone()).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let deleted: Movie = response.json().await.unwrap();
    assert_eq!(deleted.id, movie.id);

    let response = client.get(record_url.clone()).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let response = client.delete(record_url.clone()).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(
        response.text().await.unwrap(),
        format!("No Movie Was Found With ID: {}", movie.id)
    );
}

#[tokio::test]
#[traced_test]
async fn test_movie_rejections() {
    let (args, _config_guard) = prepare_env("test_movie_rejections").await.unwrap();
    let base_url = args.base_url.clone();
    let (client, _state) = launch_env(args).await.unwrap();
    create_genre(&client, &base_url, "Sci-Fi").await.unwrap();

    let api_url = base_url.join("movies").unwrap();

    let form = movie_form(&INCEPTION, Some(("big.jpg", vec![0u8; 2 * 1024 * 1024])));
    let response = client.post(api_url.clone()).multipart(form).send().await.unwrap();
    info!("Response: {:#?}", response);
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(
        response.text().await.unwrap(),
        "Max allowed size for poster is 1MB"
    );

    let form = movie_form(&INCEPTION, Some(("poster.webp", vec![0u8; 10])));
    let response = client.post(api_url.clone()).multipart(form).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(
        response.text().await.unwrap(),
        "only .png and .jpg are allowed!"
    );

    let fields = MovieFields {
        genre_id: 99,
        ..INCEPTION
    };
    let form = movie_form(&fields, Some(("poster.png", vec![0u8; 10])));
    let response = client.post(api_url.clone()).multipart(form).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(response.text().await.unwrap(), "Invalid Genre ID");

    let unknown_url = extend_url(&api_url, 777);
    let form = movie_form(&INCEPTION, None);
    let response = client.put(unknown_url).multipart(form).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(
        response.text().await.unwrap(),
        "No Movie Was Found With ID: 777"
    );

    let response = client.get(api_url.clone()).send().await.unwrap();
    assert!(response.status().is_success());
    let movies: Vec<Movie> = response.json().await.unwrap();
    assert!(movies.is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_movies_by_genre() {
    let (args, _config_guard) = prepare_env("test_movies_by_genre").await.unwrap();
    let base_url = args.base_url.clone();
    let (client, _state) = launch_env(args).await.unwrap();
    let sci_fi = create_genre(&client, &base_url, "Sci-Fi").await.unwrap();
    let drama = create_genre(&client, &base_url, "Drama").await.unwrap();

    for (title, genre_id, rate) in [
        ("Gattaca", sci_fi.id, 7.7),
        ("Amelie", drama.id, 8.3),
        ("Blade Runner", sci_fi.id, 8.1),
        ("Primer", sci_fi.id, 6.9),
    ] {
        let fields = MovieFields {
            title,
            genre_id,
            rate,
            ..INCEPTION
        };
        create_movie(&client, &base_url, &fields, "p.png", vec![1, 2, 3])
            .await
            .unwrap();
    }

    let mut genre_url = base_url.join("movies/GetByGenreId").unwrap();
    genre_url.set_query(Some(&format!("genreId={}", sci_fi.id)));
    let response = client.get(genre_url).send().await.unwrap();
    assert!(response.status().is_success());
    let movies: Vec<Movie> = response.json().await.unwrap();
    let titles: Vec<_> = movies.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, ["Blade Runner", "Gattaca", "Primer"]);

    let response = client
        .get(base_url.join("movies").unwrap())
        .send()
        .await
        .unwrap();
    let movies: Vec<Movie> = response.json().await.unwrap();
    let titles: Vec<_> = movies.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, ["Amelie", "Blade Runner", "Gattaca", "Primer"]);
}
