use futures::TryStreamExt as _;
use movies_dal::{
    Error,
    genre::{CreateGenre, GenreRepositoryImpl},
    movie::{MovieRepositoryImpl, NewMovie, UpdateMovie},
};
use sqlx::Executor;

const TEST_DATA: &str = r#"
INSERT INTO genre (id, name) VALUES (1, 'sci-fi');
INSERT INTO genre (id, name) VALUES (2, 'crime');
INSERT INTO genre (id, name) VALUES (3, 'animation');

INSERT INTO movie (id, genre_id, title, poster, rate, storyline, year)
VALUES (1, 1, 'Solaris', x'0102', 8.1, 'Ocean planet', 1972);
INSERT INTO movie (id, genre_id, title, poster, rate, storyline, year)
VALUES (2, 2, 'Heat', x'0304', 8.3, 'Bank robbery', 1995);
INSERT INTO movie (id, genre_id, title, poster, rate, storyline, year)
VALUES (3, 1, 'Alien', x'0506', 8.5, 'In space', 1979);
INSERT INTO movie (id, genre_id, title, poster, rate, storyline, year)
VALUES (4, 1, 'Dune', x'0708', 7.9, 'Spice', 2021);
"#;

async fn init_db() -> sqlx::Pool<sqlx::Sqlite> {
    const DB_URL: &str = "sqlite::memory:";
    let conn = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect(DB_URL)
        .await
        .unwrap();
    movies_dal::migrate(&conn).await.unwrap();

    conn.execute_many(TEST_DATA)
        .try_collect::<Vec<_>>()
        .await
        .unwrap();

    conn
}

#[tokio::test]
async fn test_list_all_sorted_by_title() {
    let conn = init_db().await;
    let repo = MovieRepositoryImpl::new(conn);

    let movies = repo.list_all().await.unwrap();
    let titles: Vec<_> = movies.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, ["Alien", "Dune", "Heat", "Solaris"]);
    assert_eq!(movies[2].genre.as_ref().unwrap().name, "crime");
}

#[tokio::test]
async fn test_list_by_genre_sorted_by_rate() {
    let conn = init_db().await;
    let repo = MovieRepositoryImpl::new(conn);

    let movies = repo.list_by_genre(1).await.unwrap();
    let ids: Vec<_> = movies.iter().map(|m| m.id).collect();
    assert_eq!(ids, [3, 1, 4]);
    assert!(movies.iter().all(|m| m.genre_id == 1));

    let movies = repo.list_by_genre(3).await.unwrap();
    assert!(movies.is_empty());
}

#[tokio::test]
async fn test_movie_create() {
    let conn = init_db().await;
    let repo = MovieRepositoryImpl::new(conn);

    let new_movie = NewMovie {
        genre_id: 3,
        title: "Spirited Away".to_string(),
        poster: vec![0xff; 2048],
        rate: 8.6,
        storyline: "Bathhouse of spirits".to_string(),
        year: 2001,
    };

    let movie = repo.create(new_movie).await.unwrap();
    assert!(movie.id > 4);
    assert_eq!(movie.title, "Spirited Away");
    assert_eq!(movie.poster.len(), 2048);
    assert_eq!(movie.genre.as_ref().unwrap().name, "animation");

    let loaded = repo.get(movie.id).await.unwrap();
    assert_eq!(loaded, movie);
}

#[tokio::test]
async fn test_movie_update_keeps_poster() {
    let conn = init_db().await;
    let repo = MovieRepositoryImpl::new(conn);

    let update = UpdateMovie {
        genre_id: 2,
        title: "Solaris (1972)".to_string(),
        poster: None,
        rate: 8.0,
        storyline: "Psychologist visits a station".to_string(),
        year: 1972,
    };
    let updated = repo.update(1, update.clone()).await.unwrap();
    assert_eq!(updated.title, "Solaris (1972)");
    assert_eq!(updated.genre_id, 2);
    assert_eq!(updated.poster, vec![1, 2]);

    let update = UpdateMovie {
        poster: Some(vec![9, 9, 9]),
        ..update
    };
    let updated = repo.update(1, update).await.unwrap();
    assert_eq!(updated.poster, vec![9, 9, 9]);
}

#[tokio::test]
async fn test_movie_update_missing() {
    let conn = init_db().await;
    let repo = MovieRepositoryImpl::new(conn);

    let update = UpdateMovie {
        genre_id: 1,
        title: "Nothing".to_string(),
        poster: None,
        rate: 1.0,
        storyline: String::new(),
        year: 2000,
    };
    let res = repo.update(999, update).await;
    assert!(matches!(res, Err(Error::RecordNotFound(_))));
}

#[tokio::test]
async fn test_movie_delete() {
    let conn = init_db().await;
    let repo = MovieRepositoryImpl::new(conn);

    let deleted = repo.delete(2).await.unwrap();
    assert_eq!(deleted.title, "Heat");
    assert!(repo.find(2).await.unwrap().is_none());

    let res = repo.delete(2).await;
    assert!(matches!(res, Err(Error::RecordNotFound(_))));
    assert_eq!(repo.list_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_genres() {
    let conn = init_db().await;
    let repo = GenreRepositoryImpl::new(conn);

    assert!(repo.exists(1).await.unwrap());
    assert!(!repo.exists(42).await.unwrap());

    let genre = repo
        .create(CreateGenre {
            name: "western".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(genre.id, 4);
    assert!(repo.exists(genre.id).await.unwrap());

    let names: Vec<_> = repo
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, ["animation", "crime", "sci-fi", "western"]);

    let res = repo.get(200).await;
    assert!(matches!(res, Err(Error::RecordNotFound(_))));
}
