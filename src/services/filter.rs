//! Facet filtering and sorting over in-memory catalog listings.
//!
//! Every active facet must match for an item to be kept. Sorting is stable,
//! and items missing the sort key go last in both directions.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{MediaType, Video, WatchStatus, WatchlistItem},
    services::providers::youtube::parse_clock,
};

/// Category value that disables the category facet
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VideoSort {
    #[default]
    Added,
    Title,
    Duration,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WatchlistSort {
    #[default]
    Added,
    Title,
    Rating,
    ReleaseYear,
}

/// Facets accepted by `GET /videos`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoFilter {
    pub q: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub favorites_only: bool,
    #[serde(default)]
    pub sort: VideoSort,
    #[serde(default)]
    pub order: SortOrder,
}

/// Facets accepted by `GET /watchlist`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchlistFilter {
    pub q: Option<String>,
    pub media_type: Option<MediaType>,
    pub status: Option<WatchStatus>,
    pub genre: Option<String>,
    #[serde(default)]
    pub favorites_only: bool,
    pub min_rating: Option<f32>,
    #[serde(default)]
    pub sort: WatchlistSort,
    #[serde(default)]
    pub order: SortOrder,
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Compares optional keys, keeping `None` last regardless of `order`
fn compare_keys<K: PartialOrd>(a: Option<K>, b: Option<K>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl VideoFilter {
    pub fn matches(&self, video: &Video) -> bool {
        let matches_search = match self.q.as_deref() {
            Some(q) if !q.is_empty() => {
                let q = q.to_lowercase();
                contains_ci(&video.title, &q)
                    || contains_ci(&video.description, &q)
                    || contains_ci(&video.channel_title, &q)
            }
            _ => true,
        };

        let matches_category = match self.category.as_deref() {
            None | Some("") | Some(ALL_CATEGORIES) => true,
            Some(category) => video.category == category,
        };

        let matches_favorite = !self.favorites_only || video.favorite;

        matches_search && matches_category && matches_favorite
    }
}

impl WatchlistFilter {
    /// Rejects facet values that would silently match nothing
    pub fn validate(&self) -> AppResult<()> {
        match self.min_rating {
            Some(min) if !min.is_finite() => Err(AppError::InvalidInput(format!(
                "min_rating must be a finite number, got {}",
                min
            ))),
            _ => Ok(()),
        }
    }

    pub fn matches(&self, item: &WatchlistItem) -> bool {
        let matches_search = match self.q.as_deref() {
            Some(q) if !q.is_empty() => {
                let q = q.to_lowercase();
                contains_ci(&item.title, &q)
                    || item
                        .original_title
                        .as_deref()
                        .is_some_and(|t| contains_ci(t, &q))
                    || item.overview.as_deref().is_some_and(|o| contains_ci(o, &q))
            }
            _ => true,
        };

        let matches_type = self.media_type.map_or(true, |t| item.media_type == t);
        let matches_status = self.status.map_or(true, |s| item.status == s);

        let matches_genre = match self.genre.as_deref() {
            Some(genre) if !genre.is_empty() => {
                item.genres.iter().any(|g| g.eq_ignore_ascii_case(genre))
            }
            _ => true,
        };

        let matches_favorite = !self.favorites_only || item.favorite;

        let matches_rating = match self.min_rating {
            Some(min) => item.rating.is_some_and(|r| r >= min),
            None => true,
        };

        matches_search
            && matches_type
            && matches_status
            && matches_genre
            && matches_favorite
            && matches_rating
    }
}

/// Applies every video facet, then sorts
pub fn filter_videos(videos: Vec<Video>, filter: &VideoFilter) -> Vec<Video> {
    let mut kept: Vec<Video> = videos.into_iter().filter(|v| filter.matches(v)).collect();
    let order = filter.order;

    match filter.sort {
        VideoSort::Added => {
            kept.sort_by(|a, b| compare_keys(Some(a.created_at), Some(b.created_at), order))
        }
        VideoSort::Title => kept.sort_by(|a, b| {
            compare_keys(
                Some(a.title.to_lowercase()),
                Some(b.title.to_lowercase()),
                order,
            )
        }),
        VideoSort::Duration => kept.sort_by(|a, b| {
            compare_keys(parse_clock(&a.duration), parse_clock(&b.duration), order)
        }),
    }

    kept
}

/// Applies every watchlist facet, then sorts
pub fn filter_watchlist(items: Vec<WatchlistItem>, filter: &WatchlistFilter) -> Vec<WatchlistItem> {
    let mut kept: Vec<WatchlistItem> = items.into_iter().filter(|i| filter.matches(i)).collect();
    let order = filter.order;

    match filter.sort {
        WatchlistSort::Added => {
            kept.sort_by(|a, b| compare_keys(Some(a.added_at), Some(b.added_at), order))
        }
        WatchlistSort::Title => kept.sort_by(|a, b| {
            compare_keys(
                Some(a.title.to_lowercase()),
                Some(b.title.to_lowercase()),
                order,
            )
        }),
        WatchlistSort::Rating => kept.sort_by(|a, b| compare_keys(a.rating, b.rating, order)),
        WatchlistSort::ReleaseYear => {
            kept.sort_by(|a, b| compare_keys(a.release_year, b.release_year, order))
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaDetails, MediaSummary, VideoInput};
    use chrono::{Duration, Utc};

    fn video(title: &str, category: &str, duration: &str, favorite: bool, age_secs: i64) -> Video {
        let mut v = Video::new(
            VideoInput {
                title: title.to_string(),
                url: "https://youtu.be/aaaaaaaaaaa".to_string(),
                description: format!("{} description", title),
                category: category.to_string(),
                favorite,
                duration: duration.to_string(),
                channel_title: "Channel".to_string(),
                ..Default::default()
            },
            None,
        );
        v.created_at = Utc::now() - Duration::seconds(age_secs);
        v
    }

    fn item(
        title: &str,
        media_type: MediaType,
        genres: &[&str],
        rating: Option<f32>,
        year: Option<i32>,
    ) -> WatchlistItem {
        let details = MediaDetails {
            summary: MediaSummary {
                tmdb_id: 1,
                media_type,
                title: title.to_string(),
                original_title: None,
                overview: None,
                poster_url: None,
                release_year: year,
                genres: genres.iter().map(|g| g.to_string()).collect(),
                vote_average: None,
            },
            tagline: None,
            runtime_minutes: None,
            number_of_seasons: None,
            directors: Vec::new(),
            cast: Vec::new(),
        };
        let mut item = WatchlistItem::from_details(details, WatchStatus::PlanToWatch);
        item.rating = rating;
        item
    }

    fn titles<T>(items: &[T], f: impl Fn(&T) -> &str) -> Vec<String> {
        items.iter().map(|i| f(i).to_string()).collect()
    }

    #[test]
    fn test_default_sort_is_oldest_first() {
        let videos = vec![
            video("b", "music", "1:00", false, 30),
            video("a", "tech", "2:00", false, 20),
        ];
        let result = filter_videos(videos, &VideoFilter::default());
        assert_eq!(titles(&result, |v| v.title.as_str()), vec!["b", "a"]);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let mut by_channel = video("Plain", "music", "1:00", false, 10);
        by_channel.channel_title = "RustConf".to_string();
        let videos = vec![
            video("Learning RUST", "tech", "1:00", false, 30),
            video("Cooking", "tech", "1:00", false, 20),
            by_channel,
        ];

        let filter = VideoFilter {
            q: Some("rust".to_string()),
            ..Default::default()
        };
        let result = filter_videos(videos, &filter);
        assert_eq!(titles(&result, |v| v.title.as_str()), vec!["Learning RUST", "Plain"]);
    }

    #[test]
    fn test_search_matches_description() {
        let videos = vec![video("Intro", "tech", "1:00", false, 10)];
        let filter = VideoFilter {
            q: Some("INTRO DESC".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_videos(videos, &filter).len(), 1);
    }

    #[test]
    fn test_facets_combine() {
        let videos = vec![
            video("one", "music", "1:00", true, 40),
            video("two", "music", "1:00", false, 30),
            video("three", "tech", "1:00", true, 20),
        ];

        let filter = VideoFilter {
            category: Some("music".to_string()),
            favorites_only: true,
            ..Default::default()
        };
        let result = filter_videos(videos.clone(), &filter);
        assert_eq!(titles(&result, |v| v.title.as_str()), vec!["one"]);

        let all = VideoFilter {
            category: Some(ALL_CATEGORIES.to_string()),
            ..Default::default()
        };
        assert_eq!(filter_videos(videos, &all).len(), 3);
    }

    #[test]
    fn test_duration_sort_puts_unknown_last() {
        let videos = vec![
            video("unknown", "tech", "--:--", false, 40),
            video("long", "tech", "1:00:00", false, 30),
            video("short", "tech", "0:45", false, 20),
        ];

        let asc = VideoFilter {
            sort: VideoSort::Duration,
            ..Default::default()
        };
        let result = filter_videos(videos.clone(), &asc);
        assert_eq!(titles(&result, |v| v.title.as_str()), vec!["short", "long", "unknown"]);

        let desc = VideoFilter {
            sort: VideoSort::Duration,
            order: SortOrder::Desc,
            ..Default::default()
        };
        let result = filter_videos(videos, &desc);
        assert_eq!(titles(&result, |v| v.title.as_str()), vec!["long", "short", "unknown"]);
    }

    #[test]
    fn test_duration_sort_puts_overflowing_clock_last() {
        let videos = vec![
            video("huge", "tech", "99999999:00:00", false, 30),
            video("short", "tech", "0:45", false, 20),
        ];

        for order in [SortOrder::Asc, SortOrder::Desc] {
            let filter = VideoFilter {
                sort: VideoSort::Duration,
                order,
                ..Default::default()
            };
            let result = filter_videos(videos.clone(), &filter);
            assert_eq!(titles(&result, |v| v.title.as_str()), vec!["short", "huge"]);
        }
    }

    #[test]
    fn test_title_ties_keep_store_order_both_directions() {
        let mut first = video("Same", "tech", "1:00", false, 10);
        first.description = "first".to_string();
        let mut second = video("same", "tech", "1:00", false, 50);
        second.description = "second".to_string();
        let videos = vec![first, second, video("Alpha", "tech", "1:00", false, 30)];

        let asc = VideoFilter {
            sort: VideoSort::Title,
            ..Default::default()
        };
        let result = filter_videos(videos.clone(), &asc);
        assert_eq!(
            titles(&result, |v| v.description.as_str()),
            vec!["Alpha description", "first", "second"]
        );

        let desc = VideoFilter {
            sort: VideoSort::Title,
            order: SortOrder::Desc,
            ..Default::default()
        };
        let result = filter_videos(videos, &desc);
        assert_eq!(
            titles(&result, |v| v.description.as_str()),
            vec!["first", "second", "Alpha description"]
        );
    }

    #[test]
    fn test_rating_ties_keep_store_order_both_directions() {
        let items = vec![
            item("first", MediaType::Movie, &[], Some(8.0), None),
            item("five", MediaType::Movie, &[], Some(5.0), None),
            item("second", MediaType::Tv, &[], Some(8.0), None),
        ];

        let asc = WatchlistFilter {
            sort: WatchlistSort::Rating,
            ..Default::default()
        };
        let result = filter_watchlist(items.clone(), &asc);
        assert_eq!(titles(&result, |i| i.title.as_str()), vec!["five", "first", "second"]);

        let desc = WatchlistFilter {
            sort: WatchlistSort::Rating,
            order: SortOrder::Desc,
            ..Default::default()
        };
        let result = filter_watchlist(items, &desc);
        assert_eq!(titles(&result, |i| i.title.as_str()), vec!["first", "second", "five"]);
    }

    #[test]
    fn test_non_finite_min_rating_is_rejected() {
        for min in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let filter = WatchlistFilter {
                min_rating: Some(min),
                ..Default::default()
            };
            assert!(matches!(filter.validate(), Err(AppError::InvalidInput(_))));
        }

        let filter = WatchlistFilter {
            min_rating: Some(7.5),
            ..Default::default()
        };
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn test_added_desc_is_newest_first() {
        let videos = vec![
            video("old", "tech", "1:00", false, 100),
            video("new", "tech", "1:00", false, 1),
        ];
        let filter = VideoFilter {
            order: SortOrder::Desc,
            ..Default::default()
        };
        let result = filter_videos(videos, &filter);
        assert_eq!(titles(&result, |v| v.title.as_str()), vec!["new", "old"]);
    }

    #[test]
    fn test_watchlist_genre_and_type_facets() {
        let items = vec![
            item("Alien", MediaType::Movie, &["Horror", "Science Fiction"], None, Some(1979)),
            item("Dark", MediaType::Tv, &["Sci-Fi & Fantasy"], None, Some(2017)),
            item("Heat", MediaType::Movie, &["Crime"], None, Some(1995)),
        ];

        let filter = WatchlistFilter {
            genre: Some("science fiction".to_string()),
            ..Default::default()
        };
        let result = filter_watchlist(items.clone(), &filter);
        assert_eq!(titles(&result, |i| i.title.as_str()), vec!["Alien"]);

        let filter = WatchlistFilter {
            media_type: Some(MediaType::Movie),
            sort: WatchlistSort::ReleaseYear,
            order: SortOrder::Desc,
            ..Default::default()
        };
        let result = filter_watchlist(items, &filter);
        assert_eq!(titles(&result, |i| i.title.as_str()), vec!["Heat", "Alien"]);
    }

    #[test]
    fn test_min_rating_excludes_unrated() {
        let items = vec![
            item("rated high", MediaType::Movie, &[], Some(9.0), None),
            item("rated low", MediaType::Movie, &[], Some(4.5), None),
            item("unrated", MediaType::Movie, &[], None, None),
        ];
        let filter = WatchlistFilter {
            min_rating: Some(5.0),
            ..Default::default()
        };
        let result = filter_watchlist(items, &filter);
        assert_eq!(titles(&result, |i| i.title.as_str()), vec!["rated high"]);
    }

    #[test]
    fn test_rating_sort_keeps_unrated_last() {
        let items = vec![
            item("unrated", MediaType::Movie, &[], None, None),
            item("seven", MediaType::Movie, &[], Some(7.0), None),
            item("nine", MediaType::Tv, &[], Some(9.0), None),
        ];
        let filter = WatchlistFilter {
            sort: WatchlistSort::Rating,
            order: SortOrder::Desc,
            ..Default::default()
        };
        let result = filter_watchlist(items, &filter);
        assert_eq!(titles(&result, |i| i.title.as_str()), vec!["nine", "seven", "unrated"]);
    }

    #[test]
    fn test_status_facet() {
        let mut watching = item("Watching", MediaType::Tv, &[], None, None);
        watching.status = WatchStatus::Watching;
        let items = vec![item("Planned", MediaType::Tv, &[], None, None), watching];

        let filter = WatchlistFilter {
            status: Some(WatchStatus::Watching),
            ..Default::default()
        };
        let result = filter_watchlist(items, &filter);
        assert_eq!(titles(&result, |i| i.title.as_str()), vec!["Watching"]);
    }
}
