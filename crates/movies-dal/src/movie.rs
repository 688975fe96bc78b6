use crate::{ChosenRow, Error, FromRowPrefixed, error::Result, genre::Genre};
use futures::TryStreamExt as _;
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Row as _};
use tracing::debug;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub genre_id: u8,
    pub title: String,
    #[serde(with = "poster_base64")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Byte))]
    pub poster: Vec<u8>,
    pub rate: f64,
    pub storyline: String,
    pub year: i32,
    pub genre: Option<Genre>,
}

impl sqlx::FromRow<'_, ChosenRow> for Movie {
    fn from_row(row: &ChosenRow) -> Result<Self, sqlx::Error> {
        let genre = if row.try_get::<Option<String>, _>("genre_name")?.is_some() {
            Some(Genre::from_row_prefixed(row)?)
        } else {
            None
        };
        Ok(Movie {
            id: row.try_get("id")?,
            genre_id: row.try_get("genre_id")?,
            title: row.try_get("title")?,
            poster: row.try_get("poster")?,
            rate: row.try_get("rate")?,
            storyline: row.try_get("storyline")?,
            year: row.try_get("year")?,
            genre,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewMovie {
    pub genre_id: u8,
    pub title: String,
    pub poster: Vec<u8>,
    pub rate: f64,
    pub storyline: String,
    pub year: i32,
}

/// Scalar fields are always overwritten, poster only when present.
#[derive(Debug, Clone)]
pub struct UpdateMovie {
    pub genre_id: u8,
    pub title: String,
    pub poster: Option<Vec<u8>>,
    pub rate: f64,
    pub storyline: String,
    pub year: i32,
}

mod poster_base64 {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde::{Deserialize as _, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

const SELECT_MOVIE: &str = r#"
SELECT m.id, m.genre_id, m.title, m.poster, m.rate, m.storyline, m.year,
g.name AS genre_name
FROM movie m
LEFT JOIN genre g ON m.genre_id = g.id
"#;

pub type MovieRepository = MovieRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct MovieRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> MovieRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn list_all(&self) -> Result<Vec<Movie>> {
        let sql = format!("{SELECT_MOVIE} ORDER BY m.title, m.id");
        let records = sqlx::query_as::<_, Movie>(&sql)
            .fetch(&self.executor)
            .try_collect::<Vec<_>>()
            .await?;
        Ok(records)
    }

    pub async fn list_by_genre(&self, genre_id: u8) -> Result<Vec<Movie>> {
        let sql = format!("{SELECT_MOVIE} WHERE m.genre_id = ? ORDER BY m.rate DESC, m.id");
        let records = sqlx::query_as::<_, Movie>(&sql)
            .bind(genre_id)
            .fetch(&self.executor)
            .try_collect::<Vec<_>>()
            .await?;
        Ok(records)
    }

    pub async fn find(&self, id: i64) -> Result<Option<Movie>> {
        let sql = format!("{SELECT_MOVIE} WHERE m.id = ?");
        let record = sqlx::query_as::<_, Movie>(&sql)
            .bind(id)
            .fetch_optional(&self.executor)
            .await?;
        Ok(record)
    }

    pub async fn get(&self, id: i64) -> Result<Movie> {
        self.find(id)
            .await?
            .ok_or_else(|| Error::RecordNotFound(format!("Movie {id}")))
    }

    pub async fn create(&self, payload: NewMovie) -> Result<Movie> {
        let result = sqlx::query(
            "INSERT INTO movie (genre_id, title, poster, rate, storyline, year) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(payload.genre_id)
        .bind(&payload.title)
        .bind(&payload.poster)
        .bind(payload.rate)
        .bind(&payload.storyline)
        .bind(payload.year)
        .execute(&self.executor)
        .await?;

        let id = result.last_insert_rowid();
        debug!("Created movie {id}");
        self.get(id).await
    }

    pub async fn update(&self, id: i64, payload: UpdateMovie) -> Result<Movie> {
        let result = sqlx::query(
            r#"UPDATE movie SET genre_id = ?, title = ?, poster = COALESCE(?, poster), rate = ?,
            storyline = ?, year = ? WHERE id = ?"#,
        )
        .bind(payload.genre_id)
        .bind(&payload.title)
        .bind(payload.poster.as_deref())
        .bind(payload.rate)
        .bind(&payload.storyline)
        .bind(payload.year)
        .bind(id)
        .execute(&self.executor)
        .await?;

        if result.rows_affected() == 0 {
            Err(Error::RecordNotFound(format!("Movie {id}")))
        } else {
            self.get(id).await
        }
    }

    /// Removes the movie and returns the record as it was before deletion.
    pub async fn delete(&self, id: i64) -> Result<Movie> {
        let record = self.get(id).await?;
        let res = sqlx::query("DELETE FROM movie WHERE id = ?")
            .bind(id)
            .execute(&self.executor)
            .await?;

        if res.rows_affected() == 0 {
            Err(Error::RecordNotFound(format!("Movie {id}")))
        } else {
            Ok(record)
        }
    }
}
