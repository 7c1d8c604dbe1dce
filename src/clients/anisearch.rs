//! Secondary ordinal authority: aniSearch episode pages.
//!
//! Keyed only by the episode's aniSearch id. The page carries the episode
//! ordinal as a `- <digits> -` heading fragment; no structured markup is
//! assumed, the raw body is scanned directly.

use regex::Regex;
use reqwest::Client;
use std::sync::OnceLock;
use url::Url;

use super::{RequestPacer, fetch_page};

fn ordinal_regex() -> Option<&'static Regex> {
    static INSTANCE: OnceLock<Option<Regex>> = OnceLock::new();
    // Spaces are part of the pattern: "- 27 -" must not match date strings
    // like "2024-01-01".
    INSTANCE
        .get_or_init(|| Regex::new(r"- (\d+) -").ok())
        .as_ref()
}

/// First `- <digits> -` occurrence in the body, or `None`. Zero is
/// indistinguishable from unresolved.
#[must_use]
pub fn parse_episode_ordinal(body: &str) -> Option<u32> {
    let re = ordinal_regex()?;
    re.captures(body)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|&n| n > 0)
}

#[derive(Clone)]
pub struct AniSearchClient {
    client: Client,
    base_url: String,
    pacer: RequestPacer,
}

impl AniSearchClient {
    #[must_use]
    pub const fn new(base_url: String, client: Client, pacer: RequestPacer) -> Self {
        Self {
            client,
            base_url,
            pacer,
        }
    }

    fn episode_url(&self, episode_id: &str) -> Option<String> {
        let base = Url::parse(&self.base_url).ok()?;
        base.join(&format!("anime/episode/{episode_id}"))
            .ok()
            .map(|url| url.to_string())
    }

    /// Fetches the episode page and scans it for the ordinal. Any fetch or
    /// parse failure is `None`; the rate-limit delay is paid per attempt.
    pub async fn episode_ordinal(&self, episode_id: &str) -> Option<u32> {
        let url = self.episode_url(episode_id)?;
        let body = fetch_page(&self.client, &self.pacer, &url).await?;
        parse_episode_ordinal(&body)
    }
}
