use serde::Serialize;

use crate::models::MediaType;

/// A genre as listed by `GET /genres`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Genre {
    pub id: u32,
    pub name: &'static str,
}

const MOVIE_GENRES: &[(u32, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

const TV_GENRES: &[(u32, &str)] = &[
    (10759, "Action & Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (10762, "Kids"),
    (9648, "Mystery"),
    (10763, "News"),
    (10764, "Reality"),
    (10765, "Sci-Fi & Fantasy"),
    (10766, "Soap"),
    (10767, "Talk"),
    (10768, "War & Politics"),
    (37, "Western"),
];

fn table(media_type: MediaType) -> &'static [(u32, &'static str)] {
    match media_type {
        MediaType::Movie => MOVIE_GENRES,
        MediaType::Tv => TV_GENRES,
    }
}

pub fn genre_name(media_type: MediaType, id: u32) -> Option<&'static str> {
    table(media_type)
        .iter()
        .find(|(genre_id, _)| *genre_id == id)
        .map(|(_, name)| *name)
}

/// Maps genre IDs to names in the given order; unknown IDs are dropped
pub fn genre_names(media_type: MediaType, ids: &[u32]) -> Vec<String> {
    ids.iter()
        .filter_map(|id| {
            let name = genre_name(media_type, *id);
            if name.is_none() {
                tracing::debug!(genre_id = id, media_type = %media_type, "Unknown genre id");
            }
            name.map(str::to_string)
        })
        .collect()
}

pub fn genres_for(media_type: MediaType) -> Vec<Genre> {
    table(media_type)
        .iter()
        .map(|(id, name)| Genre { id: *id, name })
        .collect()
}
