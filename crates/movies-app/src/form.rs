use std::{collections::HashMap, ops::Deref, str::FromStr};

use axum::extract::{multipart::Field, FromRequest, Multipart, Request};
use bytes::BytesMut;
use garde::Validate;
use http::StatusCode;
use tracing::debug;

use crate::{
    catalog::{MovieInput, Poster},
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Field names are matched case-insensitively and `genre_id` equals `genreId`.
fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Multipart request body with text fields and files kept apart.
#[derive(Debug, Default)]
pub struct RawForm {
    fields: HashMap<String, String>,
    files: HashMap<String, Poster>,
}

impl RawForm {
    /// Reads all parts. File contents are kept only up to `file_limit` bytes,
    /// bigger files are drained and recorded with their size only.
    pub async fn read(mut multipart: Multipart, file_limit: u64) -> ApiResult<Self> {
        let mut form = RawForm::default();
        while let Some(mut field) = multipart.next_field().await? {
            let Some(name) = field.name().map(normalize_name) else {
                continue;
            };
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let upload = read_file(&mut field, file_limit).await?;
                    let size = upload.size();
                    // browsers send empty part when no file was chosen
                    if file_name.is_empty() && size == 0 {
                        continue;
                    }
                    debug!("Received file {file_name} of {size} bytes");
                    let cut_short = upload.cut_short;
                    form.files.insert(name, upload.into_poster(file_name));
                    if cut_short {
                        // body stream is unusable after hitting the limit
                        break;
                    }
                }
                None => {
                    let value = field.text().await?;
                    form.fields.insert(name, value);
                }
            }
        }
        Ok(form)
    }

    pub fn text(&self, name: &str) -> ApiResult<&str> {
        self.fields
            .get(&normalize_name(name))
            .map(String::as_str)
            .ok_or_else(|| ApiError::InvalidRequest(format!("Missing field {name}")))
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> ApiResult<T> {
        self.text(name)?
            .trim()
            .parse()
            .map_err(|_| ApiError::InvalidRequest(format!("Invalid value of field {name}")))
    }

    pub fn take_file(&mut self, name: &str) -> Option<Poster> {
        self.files.remove(&normalize_name(name))
    }
}

struct FileUpload {
    data: BytesMut,
    size: u64,
    kept: bool,
    cut_short: bool,
}

impl FileUpload {
    fn size(&self) -> u64 {
        self.size
    }

    fn into_poster(self, file_name: String) -> Poster {
        if self.kept {
            Poster::new(file_name, self.data.freeze())
        } else {
            Poster::discarded(file_name, self.size)
        }
    }
}

async fn read_file(field: &mut Field<'_>, limit: u64) -> ApiResult<FileUpload> {
    let mut upload = FileUpload {
        data: BytesMut::new(),
        size: 0,
        kept: true,
        cut_short: false,
    };
    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => {
                upload.size += chunk.len() as u64;
                if upload.kept && upload.size <= limit {
                    upload.data.extend_from_slice(&chunk);
                } else if upload.kept {
                    debug!("File is over {limit} bytes, discarding content");
                    upload.kept = false;
                    upload.data = BytesMut::new();
                }
            }
            Ok(None) => return Ok(upload),
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                debug!("Request body limit reached while reading file: {e}");
                upload.kept = false;
                upload.data = BytesMut::new();
                upload.size = upload.size.max(limit.saturating_add(1));
                upload.cut_short = true;
                return Ok(upload);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Extractor for types built from a multipart body.
#[derive(Debug)]
pub struct MultipartForm<T>(pub T);

impl<T> Deref for MultipartForm<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> FromRequest<AppState> for MultipartForm<T>
where
    T: TryFrom<RawForm, Error = ApiError> + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
        let raw = RawForm::read(multipart, state.config().poster.max_size()).await?;
        Ok(MultipartForm(T::try_from(raw)?))
    }
}

fn finite(value: &f64, _ctx: &()) -> garde::Result {
    if value.is_finite() {
        Ok(())
    } else {
        Err(garde::Error::new("must be a finite number"))
    }
}

#[derive(Debug, Validate)]
pub struct MovieForm {
    #[garde(length(min = 1, max = 250))]
    pub title: String,
    #[garde(skip)]
    pub genre_id: u8,
    #[garde(custom(finite))]
    pub rate: f64,
    #[garde(length(max = 2500))]
    pub storyline: String,
    #[garde(skip)]
    pub year: i32,
    #[garde(skip)]
    pub poster: Option<Poster>,
}

impl MovieForm {
    pub fn into_parts(self) -> (MovieInput, Option<Poster>) {
        (
            MovieInput {
                genre_id: self.genre_id,
                title: self.title,
                rate: self.rate,
                storyline: self.storyline,
                year: self.year,
            },
            self.poster,
        )
    }
}

impl TryFrom<RawForm> for MovieForm {
    type Error = ApiError;

    fn try_from(mut form: RawForm) -> Result<Self, Self::Error> {
        Ok(MovieForm {
            title: form.text("title")?.to_string(),
            genre_id: form.parse("genreId")?,
            rate: form.parse("rate")?,
            storyline: form.text("storyline")?.to_string(),
            year: form.parse("year")?,
            poster: form.take_file("poster"),
        })
    }
}
