use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Kind of title tracked by the metadata provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaType::Movie),
            "tv" => Ok(MediaType::Tv),
            other => Err(format!("unknown media type '{}'", other)),
        }
    }
}

/// A movie or TV show as returned by title search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaSummary {
    pub tmdb_id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub release_year: Option<i32>,
    pub genres: Vec<String>,
    pub vote_average: Option<f32>,
}

/// A billed cast member
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub name: String,
    pub character: Option<String>,
}

/// Full title details combined with credits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaDetails {
    #[serde(flatten)]
    pub summary: MediaSummary,
    pub tagline: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub number_of_seasons: Option<u32>,
    pub directors: Vec<String>,
    pub cast: Vec<CastMember>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Response envelope of `GET /search/multi`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub results: Vec<TmdbSearchResult>,
}

/// One multi-search hit; movies, TV shows and people share this shape
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResult {
    pub id: u64,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub vote_average: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPerson {
    pub name: String,
}

/// Response of `GET /movie/{id}` and `GET /tv/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbDetails {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub created_by: Vec<TmdbPerson>,
}

/// Response of `GET /{movie|tv}/{id}/credits`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<TmdbCastCredit>,
    #[serde(default)]
    pub crew: Vec<TmdbCrewCredit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCastCredit {
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCrewCredit {
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_serde() {
        assert_eq!(serde_json::to_string(&MediaType::Tv).unwrap(), "\"tv\"");
        let parsed: MediaType = serde_json::from_str("\"movie\"").unwrap();
        assert_eq!(parsed, MediaType::Movie);
    }

    #[test]
    fn test_media_type_from_str() {
        assert_eq!("tv".parse::<MediaType>(), Ok(MediaType::Tv));
        assert!("person".parse::<MediaType>().is_err());
    }

    #[test]
    fn test_search_result_tolerates_missing_fields() {
        let json = r#"{"id": 17419, "media_type": "person", "name": "Bryan Cranston"}"#;
        let result: TmdbSearchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.media_type.as_deref(), Some("person"));
        assert!(result.genre_ids.is_empty());
        assert_eq!(result.poster_path, None);
    }
}
