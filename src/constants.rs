/// Genre name that marks a series as anime in the host library.
pub const ANIME_GENRE: &str = "Anime";

/// Default tag name used by tag-based identification.
pub const DEFAULT_ANIME_TAG: &str = "Anime";

/// The ordinal-authority sites block obvious bot user agents, so requests go
/// out looking like a desktop browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

pub mod providers {

    pub const TVDB: &str = "Tvdb";

    pub const TVDB_SLUG: &str = "TvdbSlug";

    pub const ANISEARCH: &str = "AniSearch";
}

pub mod endpoints {

    pub const TVDB_BASE: &str = "https://www.thetvdb.com";

    pub const ANISEARCH_BASE: &str = "https://www.anisearch.com";

    pub const FILLER_LIST_BASE: &str = "https://www.animefillerlist.com";
}

pub mod limits {

    /// Configured inter-request delays below this are raised to it.
    pub const RATE_LIMIT_FLOOR_MS: u64 = 2000;

    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
}
