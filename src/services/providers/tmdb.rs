/// TMDB (The Movie Database) v3 provider
///
/// API Flow:
/// 1. Title Search: /search/multi → movies, TV shows and people; people are dropped
/// 2. Details: /{movie|tv}/{id} plus /{movie|tv}/{id}/credits for directors and cast
///
/// Search results only carry genre IDs, which are mapped to names through the
/// static genre table. Details responses carry genre names directly.
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        CastMember, MediaDetails, MediaSummary, MediaType, TmdbCredits, TmdbDetails,
        TmdbSearchResponse, TmdbSearchResult,
    },
    services::{genres::genre_names, providers::MediaProvider},
};

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const DETAILS_CACHE_TTL: u64 = 86_400; // 1 day
const MAX_CAST: usize = 10;

/// Year from a `YYYY-MM-DD` date; TMDB sends empty strings for unknown dates
pub fn release_year(date: Option<&str>) -> Option<i32> {
    let year = date?.get(..4)?;
    if year.chars().all(|c| c.is_ascii_digit()) {
        year.parse().ok()
    } else {
        None
    }
}

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    language: String,
    image_base_url: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(
        cache: Cache,
        api_key: Option<String>,
        api_url: String,
        language: String,
        image_base_url: String,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    fn poster_url(&self, poster_path: Option<String>) -> Option<String> {
        poster_path
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}{}", self.image_base_url, p))
    }

    /// Converts a multi-search hit; returns `None` for people and unknown kinds
    fn convert_search_result(&self, result: TmdbSearchResult) -> Option<MediaSummary> {
        let media_type: MediaType = result.media_type.as_deref()?.parse().ok()?;

        let (title, original_title, date) = match media_type {
            MediaType::Movie => (result.title, result.original_title, result.release_date),
            MediaType::Tv => (result.name, result.original_name, result.first_air_date),
        };

        Some(MediaSummary {
            tmdb_id: result.id,
            media_type,
            title: title.unwrap_or_default(),
            original_title,
            overview: result.overview.filter(|o| !o.is_empty()),
            poster_url: self.poster_url(result.poster_path),
            release_year: release_year(date.as_deref()),
            genres: genre_names(media_type, &result.genre_ids),
            vote_average: result.vote_average,
        })
    }

    fn convert_details(
        &self,
        media_type: MediaType,
        details: TmdbDetails,
        credits: TmdbCredits,
    ) -> MediaDetails {
        let (title, original_title, date) = match media_type {
            MediaType::Movie => (details.title, details.original_title, details.release_date),
            MediaType::Tv => (details.name, details.original_name, details.first_air_date),
        };

        let runtime_minutes = match media_type {
            MediaType::Movie => details.runtime,
            MediaType::Tv => details.episode_run_time.first().copied(),
        }
        .filter(|m| *m > 0);

        let crew_directors: Vec<String> = credits
            .crew
            .iter()
            .filter(|c| c.job.as_deref() == Some("Director"))
            .map(|c| c.name.clone())
            .collect();

        let directors = match media_type {
            MediaType::Tv if !details.created_by.is_empty() => {
                details.created_by.into_iter().map(|p| p.name).collect()
            }
            _ => crew_directors,
        };

        let mut cast = credits.cast;
        cast.sort_by_key(|c| c.order.unwrap_or(u32::MAX));
        let cast = cast
            .into_iter()
            .take(MAX_CAST)
            .map(|c| CastMember {
                name: c.name,
                character: c.character.filter(|ch| !ch.is_empty()),
            })
            .collect();

        MediaDetails {
            summary: MediaSummary {
                tmdb_id: details.id,
                media_type,
                title: title.unwrap_or_default(),
                original_title,
                overview: details.overview.filter(|o| !o.is_empty()),
                poster_url: self.poster_url(details.poster_path),
                release_year: release_year(date.as_deref()),
                genres: details.genres.into_iter().map(|g| g.name).collect(),
                vote_average: details.vote_average,
            },
            tagline: details.tagline.filter(|t| !t.is_empty()),
            runtime_minutes,
            number_of_seasons: details.number_of_seasons,
            directors,
            cast,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        api_key: &str,
        path: &str,
        params: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);
        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", api_key), ("language", self.language.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(AppError::NotFound(format!("TMDB resource {} not found", path)));
            }
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    async fn search_api(&self, api_key: &str, query: &str) -> AppResult<Vec<MediaSummary>> {
        let response: TmdbSearchResponse = self
            .get_json(
                api_key,
                "/search/multi",
                &[("query", query), ("include_adult", "false"), ("page", "1")],
            )
            .await?;

        let titles: Vec<MediaSummary> = response
            .results
            .into_iter()
            .filter_map(|r| self.convert_search_result(r))
            .collect();

        tracing::info!(
            query = %query,
            results = titles.len(),
            provider = "tmdb",
            "Title search completed"
        );

        Ok(titles)
    }

    async fn details_api(
        &self,
        api_key: &str,
        media_type: MediaType,
        tmdb_id: u64,
    ) -> AppResult<MediaDetails> {
        let path = format!("/{}/{}", media_type, tmdb_id);
        let details: TmdbDetails = self.get_json(api_key, &path, &[]).await?;

        let credits_path = format!("{}/credits", path);
        let credits = match self
            .get_json::<TmdbCredits>(api_key, &credits_path, &[])
            .await
        {
            Ok(credits) => credits,
            Err(e) => {
                tracing::warn!(error = %e, tmdb_id, media_type = %media_type, "Credits lookup failed");
                TmdbCredits::default()
            }
        };

        tracing::info!(tmdb_id, media_type = %media_type, provider = "tmdb", "Details fetched");

        Ok(self.convert_details(media_type, details, credits))
    }
}

/// Stand-in search results used when no API key is configured
pub fn placeholder_search(query: &str) -> Vec<MediaSummary> {
    vec![
        placeholder_details(MediaType::Movie, 1, format!("Sample movie - {}", query)).summary,
        placeholder_details(MediaType::Tv, 2, format!("Sample series - {}", query)).summary,
    ]
}

fn placeholder_details(media_type: MediaType, tmdb_id: u64, title: String) -> MediaDetails {
    let genre = match media_type {
        MediaType::Movie => "Drama",
        MediaType::Tv => "Comedy",
    };

    MediaDetails {
        summary: MediaSummary {
            tmdb_id,
            media_type,
            title,
            original_title: None,
            overview: Some("Placeholder entry; configure TMDB_API_KEY for real data.".to_string()),
            poster_url: None,
            release_year: Some(2024),
            genres: vec![genre.to_string()],
            vote_average: None,
        },
        tagline: None,
        runtime_minutes: None,
        number_of_seasons: None,
        directors: Vec::new(),
        cast: Vec::new(),
    }
}

#[async_trait::async_trait]
impl MediaProvider for TmdbProvider {
    async fn search(&self, query: &str) -> AppResult<Vec<MediaSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let Some(api_key) = self.api_key.as_deref() else {
            tracing::warn!(query = %query, "TMDB API key not configured, using placeholder results");
            return Ok(placeholder_search(query));
        };

        cached!(
            self.cache,
            CacheKey::MediaSearch(query.to_string()),
            SEARCH_CACHE_TTL,
            async move { self.search_api(api_key, query).await }
        )
    }

    async fn details(&self, media_type: MediaType, tmdb_id: u64) -> AppResult<MediaDetails> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::warn!(tmdb_id, "TMDB API key not configured, using placeholder details");
            return Ok(placeholder_details(
                media_type,
                tmdb_id,
                format!("Sample {} {}", media_type, tmdb_id),
            ));
        };

        cached!(
            self.cache,
            CacheKey::MediaDetails(media_type, tmdb_id),
            DETAILS_CACHE_TTL,
            async move { self.details_api(api_key, media_type, tmdb_id).await }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TmdbCastCredit, TmdbCrewCredit, TmdbGenre, TmdbPerson};
    use httpmock::prelude::*;
    use serde_json::json;

    fn provider(api_key: Option<&str>, api_url: String) -> TmdbProvider {
        let (cache, _handle) = Cache::disabled();
        TmdbProvider::new(
            cache,
            api_key.map(str::to_string),
            api_url,
            "en-US".to_string(),
            "https://image.tmdb.org/t/p/w500".to_string(),
        )
    }

    fn details_fixture() -> TmdbDetails {
        TmdbDetails {
            id: 1396,
            title: None,
            name: Some("Breaking Bad".to_string()),
            original_title: None,
            original_name: Some("Breaking Bad".to_string()),
            overview: Some("A chemistry teacher turns to crime.".to_string()),
            tagline: Some(String::new()),
            poster_path: Some("/ggFHVNu6YYI5L9pCfOacjizRGt.jpg".to_string()),
            release_date: None,
            first_air_date: Some("2008-01-20".to_string()),
            genres: vec![TmdbGenre {
                id: 18,
                name: "Drama".to_string(),
            }],
            vote_average: Some(8.9),
            runtime: None,
            episode_run_time: vec![47, 45],
            number_of_seasons: Some(5),
            created_by: vec![TmdbPerson {
                name: "Vince Gilligan".to_string(),
            }],
        }
    }

    #[test]
    fn test_release_year() {
        assert_eq!(release_year(Some("1999-03-31")), Some(1999));
        assert_eq!(release_year(Some("")), None);
        assert_eq!(release_year(Some("n/a")), None);
        assert_eq!(release_year(None), None);
    }

    #[test]
    fn test_convert_search_result_movie() {
        let p = provider(None, "http://unused".to_string());
        let result = TmdbSearchResult {
            id: 603,
            media_type: Some("movie".to_string()),
            title: Some("The Matrix".to_string()),
            name: None,
            original_title: Some("The Matrix".to_string()),
            original_name: None,
            overview: Some(String::new()),
            poster_path: Some("/matrix.jpg".to_string()),
            release_date: Some("1999-03-31".to_string()),
            first_air_date: None,
            genre_ids: vec![28, 878],
            vote_average: Some(8.2),
        };

        let summary = p.convert_search_result(result).unwrap();
        assert_eq!(summary.media_type, MediaType::Movie);
        assert_eq!(summary.title, "The Matrix");
        assert_eq!(summary.release_year, Some(1999));
        assert_eq!(summary.genres, vec!["Action", "Science Fiction"]);
        assert_eq!(summary.overview, None);
        assert_eq!(
            summary.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/matrix.jpg")
        );
    }

    #[test]
    fn test_convert_search_result_drops_people() {
        let p = provider(None, "http://unused".to_string());
        let person = TmdbSearchResult {
            id: 17419,
            media_type: Some("person".to_string()),
            title: None,
            name: Some("Bryan Cranston".to_string()),
            original_title: None,
            original_name: None,
            overview: None,
            poster_path: None,
            release_date: None,
            first_air_date: None,
            genre_ids: Vec::new(),
            vote_average: None,
        };
        assert!(p.convert_search_result(person).is_none());
    }

    #[test]
    fn test_convert_details_tv_prefers_creators() {
        let p = provider(None, "http://unused".to_string());
        let credits = TmdbCredits {
            cast: vec![
                TmdbCastCredit {
                    name: "Aaron Paul".to_string(),
                    character: Some("Jesse Pinkman".to_string()),
                    order: Some(1),
                },
                TmdbCastCredit {
                    name: "Bryan Cranston".to_string(),
                    character: Some("Walter White".to_string()),
                    order: Some(0),
                },
            ],
            crew: vec![TmdbCrewCredit {
                name: "Michelle MacLaren".to_string(),
                job: Some("Director".to_string()),
            }],
        };

        let details = p.convert_details(MediaType::Tv, details_fixture(), credits);
        assert_eq!(details.summary.title, "Breaking Bad");
        assert_eq!(details.summary.release_year, Some(2008));
        assert_eq!(details.summary.genres, vec!["Drama"]);
        assert_eq!(details.runtime_minutes, Some(47));
        assert_eq!(details.tagline, None);
        assert_eq!(details.directors, vec!["Vince Gilligan"]);
        assert_eq!(details.cast[0].name, "Bryan Cranston");
        assert_eq!(details.cast[1].name, "Aaron Paul");
    }

    #[tokio::test]
    async fn test_placeholder_search_without_api_key() {
        let p = provider(None, "http://unused".to_string());
        let results = p.search("dune").await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].media_type, MediaType::Movie);
        assert_eq!(results[0].title, "Sample movie - dune");
        assert_eq!(results[1].media_type, MediaType::Tv);
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let p = provider(None, "http://unused".to_string());
        let result = p.search("   ").await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_search_filters_people_and_maps_genres() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/search/multi")
                    .query_param("query", "breaking")
                    .query_param("api_key", "test_key")
                    .query_param("include_adult", "false");
                then.status(200).json_body(json!({
                    "page": 1,
                    "results": [
                        {
                            "id": 1396,
                            "media_type": "tv",
                            "name": "Breaking Bad",
                            "original_name": "Breaking Bad",
                            "first_air_date": "2008-01-20",
                            "genre_ids": [18, 80],
                            "vote_average": 8.9
                        },
                        {
                            "id": 17419,
                            "media_type": "person",
                            "name": "Bryan Cranston"
                        },
                        {
                            "id": 1212,
                            "media_type": "movie",
                            "title": "Breaking Away",
                            "release_date": "",
                            "genre_ids": [35]
                        }
                    ]
                }));
            })
            .await;

        let p = provider(Some("test_key"), server.base_url());
        let results = p.search("breaking").await.unwrap();
        mock.assert_async().await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Breaking Bad");
        assert_eq!(results[0].genres, vec!["Drama", "Crime"]);
        assert_eq!(results[1].title, "Breaking Away");
        assert_eq!(results[1].release_year, None);
    }

    #[tokio::test]
    async fn test_details_survives_credits_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/movie/603");
                then.status(200).json_body(json!({
                    "id": 603,
                    "title": "The Matrix",
                    "release_date": "1999-03-31",
                    "runtime": 136,
                    "genres": [{"id": 28, "name": "Action"}]
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/movie/603/credits");
                then.status(500);
            })
            .await;

        let p = provider(Some("test_key"), server.base_url());
        let details = p.details(MediaType::Movie, 603).await.unwrap();

        assert_eq!(details.summary.title, "The Matrix");
        assert_eq!(details.runtime_minutes, Some(136));
        assert!(details.cast.is_empty());
        assert!(details.directors.is_empty());
    }

    #[tokio::test]
    async fn test_details_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/tv/999999");
                then.status(404)
                    .json_body(json!({"status_code": 34, "status_message": "not found"}));
            })
            .await;

        let p = provider(Some("test_key"), server.base_url());
        let result = p.details(MediaType::Tv, 999999).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
