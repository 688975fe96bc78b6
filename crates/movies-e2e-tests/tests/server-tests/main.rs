mod rest_genre;
mod rest_movie;
mod server_health;
