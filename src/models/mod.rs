use serde::Serialize;

pub mod category;
pub mod media;
pub mod video;
pub mod watchlist;

pub use category::{slugify, Category, DEFAULT_CATEGORIES};
pub use media::{
    CastMember, MediaDetails, MediaSummary, MediaType, TmdbCastCredit, TmdbCredits,
    TmdbCrewCredit, TmdbDetails, TmdbGenre, TmdbPerson, TmdbSearchResponse, TmdbSearchResult,
};
pub use video::{Video, VideoInfo, VideoInput, UNKNOWN_DURATION};
pub use watchlist::{WatchStatus, WatchlistItem};

/// The caller as identified by the authenticating proxy
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Viewer {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub is_admin: bool,
}

impl Viewer {
    pub fn signed_in(&self) -> bool {
        self.email.is_some()
    }
}
