//! Primary ordinal authority: TheTVDB episode pages.
//!
//! TheTVDB stores anime both in the provider's own season layout and in an
//! "absolute" ordering; the episode page carries breadcrumb links for each
//! ordering context. Parsing is split into pure functions over the raw HTML
//! so the strategy can be exercised on canned fixtures without a network.

use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use url::Url;

use super::{RequestPacer, fetch_page};

struct TvdbSelectors {
    breadcrumb_links: Selector,
}

impl TvdbSelectors {
    fn get() -> Option<&'static Self> {
        static INSTANCE: OnceLock<Option<TvdbSelectors>> = OnceLock::new();
        INSTANCE
            .get_or_init(|| {
                Some(Self {
                    breadcrumb_links: Selector::parse("a[href]").ok()?,
                })
            })
            .as_ref()
    }
}

fn episode_label_regex() -> Option<&'static Regex> {
    static INSTANCE: OnceLock<Option<Regex>> = OnceLock::new();
    INSTANCE
        .get_or_init(|| Regex::new(r"Episode\s+(\d+)").ok())
        .as_ref()
}

fn season_label_regex() -> Option<&'static Regex> {
    static INSTANCE: OnceLock<Option<Regex>> = OnceLock::new();
    INSTANCE
        .get_or_init(|| Regex::new(r"Season\s+(\d+)").ok())
        .as_ref()
}

/// Extracts the breadcrumb ordinal restricted to one ordering context.
///
/// Only anchors whose href carries the ordering segment are considered, so
/// the same page can be read for the absolute episode number and for the
/// aired season without the contexts bleeding into each other.
fn breadcrumb_number(html: &str, order_segment: &str, label: &Regex) -> Option<u32> {
    let selectors = TvdbSelectors::get()?;
    let document = Html::parse_document(html);

    for anchor in document.select(&selectors.breadcrumb_links) {
        let href = anchor.value().attr("href").unwrap_or_default();
        if !href.contains(order_segment) {
            continue;
        }
        let text = anchor.text().collect::<String>();
        let text = html_escape::decode_html_entities(text.trim()).to_string();
        if let Some(captures) = label.captures(&text)
            && let Some(number) = captures.get(1).and_then(|m| m.as_str().parse::<u32>().ok())
            && number > 0
        {
            return Some(number);
        }
    }

    None
}

/// Absolute episode number from the absolute-order breadcrumb, or `None`.
#[must_use]
pub fn parse_absolute_number(html: &str) -> Option<u32> {
    let label = episode_label_regex()?;
    breadcrumb_number(html, "/absolute/", label)
}

/// Aired season number from the official-order breadcrumb.
///
/// Absence of data means season 1 here, unlike the absolute-number parse:
/// season 1 is a safe no-op for the split logic, while a guessed absolute
/// number could misapply a filler label.
#[must_use]
pub fn parse_aired_season(html: &str) -> u32 {
    let Some(label) = season_label_regex() else {
        return 1;
    };
    breadcrumb_number(html, "/official/", label).map_or(1, |season| season.max(1))
}

#[derive(Clone)]
pub struct TvdbClient {
    client: Client,
    base_url: String,
    pacer: RequestPacer,
}

impl TvdbClient {
    #[must_use]
    pub const fn new(base_url: String, client: Client, pacer: RequestPacer) -> Self {
        Self {
            client,
            base_url,
            pacer,
        }
    }

    /// Canonical episode page URL. `series_key` is the numeric series id
    /// when available, otherwise the URL slug.
    fn episode_url(&self, series_key: &str, episode_id: &str) -> Option<String> {
        let base = Url::parse(&self.base_url).ok()?;
        base.join(&format!("series/{series_key}/episodes/{episode_id}"))
            .ok()
            .map(|url| url.to_string())
    }

    /// Fetches the episode page and parses the absolute episode number.
    /// Any fetch or parse failure is `None`; the rate-limit delay is paid
    /// for every attempted request.
    pub async fn absolute_number(&self, series_key: &str, episode_id: &str) -> Option<u32> {
        let url = self.episode_url(series_key, episode_id)?;
        let body = fetch_page(&self.client, &self.pacer, &url).await?;
        parse_absolute_number(&body)
    }

    /// Fetches the episode page and parses the aired season, defaulting
    /// to 1 on every failure mode.
    pub async fn aired_season(&self, series_key: &str, episode_id: &str) -> u32 {
        let Some(url) = self.episode_url(series_key, episode_id) else {
            return 1;
        };
        match fetch_page(&self.client, &self.pacer, &url).await {
            Some(body) => parse_aired_season(&body),
            None => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPISODE_PAGE: &str = r#"
        <html><body>
        <ul class="breadcrumb">
          <li><a href="/series/test-show">Test Show</a></li>
          <li><a href="/series/test-show/seasons/official/2">Season 2</a></li>
          <li><a href="/series/test-show/episodes/official/5">Episode 5</a></li>
          <li><a href="/series/test-show/seasons/absolute/1">Season 1</a></li>
          <li><a href="/series/test-show/episodes/absolute/27">Episode 27</a></li>
        </ul>
        </body></html>
    "#;

    #[test]
    fn absolute_number_reads_only_the_absolute_context() {
        assert_eq!(parse_absolute_number(EPISODE_PAGE), Some(27));
    }

    #[test]
    fn aired_season_reads_only_the_official_context() {
        assert_eq!(parse_aired_season(EPISODE_PAGE), 2);
    }

    #[test]
    fn absolute_number_is_none_without_absolute_breadcrumb() {
        let html = r#"<a href="/series/x/episodes/official/5">Episode 5</a>"#;
        assert_eq!(parse_absolute_number(html), None);
    }

    #[test]
    fn aired_season_defaults_to_one_on_garbage() {
        assert_eq!(parse_aired_season("<html><body>nothing here</body></html>"), 1);
        assert_eq!(parse_aired_season(""), 1);
        assert_eq!(
            parse_aired_season(r#"<a href="/official/">Season zero-ish</a>"#),
            1
        );
    }

    #[test]
    fn zero_episode_number_is_unresolved() {
        let html = r#"<a href="/series/x/episodes/absolute/0">Episode 0</a>"#;
        assert_eq!(parse_absolute_number(html), None);
    }

    #[test]
    fn entity_encoded_breadcrumbs_are_decoded() {
        let html = r#"<a href="/series/x/episodes/absolute/3">Episode&nbsp;3</a>"#;
        // Non-breaking space decodes to U+00A0, which \s matches.
        assert_eq!(parse_absolute_number(html), Some(3));
    }

    #[test]
    fn episode_url_joins_base_and_identifiers() {
        let client = TvdbClient::new(
            "https://www.thetvdb.com".to_string(),
            Client::new(),
            RequestPacer::new(std::time::Duration::ZERO),
        );
        assert_eq!(
            client.episode_url("121361", "4245778").as_deref(),
            Some("https://www.thetvdb.com/series/121361/episodes/4245778")
        );
    }
}
