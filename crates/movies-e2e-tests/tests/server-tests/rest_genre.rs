use movies_dal::genre::Genre;
use movies_e2e_tests::{launch_env, prepare_env, rest::create_genre};
use serde_json::json;
use tracing::info;
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_genres() {
    let (args, _config_guard) = prepare_env("test_genres").await.unwrap();
    let base_url = args.base_url.clone();
    let (client, _state) = launch_env(args).await.unwrap();

    for name in ["Drama", "Comedy", "Action"] {
        let genre = create_genre(&client, &base_url, name).await.unwrap();
        assert_eq!(genre.name, name);
    }

    let api_url = base_url.join("genres").unwrap();
    let response = client.get(api_url.clone()).send().await.unwrap();
    info! {"Response: {:#?}", response};
    assert!(response.status().is_success());
    let genres: Vec<Genre> = response.json().await.unwrap();
    let names: Vec<_> = genres.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, ["Action", "Comedy", "Drama"]);

    let response = client
        .post(api_url)
        .json(&json!({"name": ""}))
        .send()
        .await
        .unwrap();
    info! {"Response: {:#?}", response};
    assert_eq!(response.status().as_u16(), 400);
}
