//! Filler-table source: AnimeFillerList show pages.
//!
//! Shows are addressed by a slug derived from the display name. The episode
//! table maps absolute episode numbers to one of the four status labels;
//! everything that fails to parse is skipped silently and an absent table
//! yields an empty map, which callers treat as "no data for this show".

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use url::Url;

use super::{RequestPacer, fetch_page};
use crate::models::{FillerStatus, FillerTable};

struct TableSelectors {
    rows: Selector,
    number: Selector,
    kind: Selector,
}

impl TableSelectors {
    fn get() -> Option<&'static Self> {
        static INSTANCE: OnceLock<Option<TableSelectors>> = OnceLock::new();
        INSTANCE
            .get_or_init(|| {
                Some(Self {
                    rows: Selector::parse("table.EpisodeList tr").ok()?,
                    number: Selector::parse("td.Number").ok()?,
                    kind: Selector::parse("td.Type").ok()?,
                })
            })
            .as_ref()
    }
}

fn cell_text(row: scraper::ElementRef<'_>, selector: &Selector) -> Option<String> {
    row.select(selector).next().map(|cell| {
        let text = cell.text().collect::<String>();
        html_escape::decode_html_entities(text.trim()).to_string()
    })
}

/// Derives the show slug used by the filler source from a display name:
/// lowercase, alphanumeric runs kept, everything else folded into single
/// hyphens.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Parses the episode table into a number → status map.
///
/// Rows with an unparsable number or a label outside the closed status set
/// are skipped; a later duplicate row overwrites an earlier one for the
/// same key.
#[must_use]
pub fn parse_filler_table(html: &str) -> FillerTable {
    let Some(selectors) = TableSelectors::get() else {
        return FillerTable::new();
    };

    let document = Html::parse_document(html);
    let mut table = FillerTable::new();

    for row in document.select(&selectors.rows) {
        let Some(number) = cell_text(row, &selectors.number) else {
            continue;
        };
        let Ok(number) = number.parse::<u32>() else {
            continue;
        };
        if number == 0 {
            continue;
        }

        let Some(label) = cell_text(row, &selectors.kind) else {
            continue;
        };
        let Some(status) = FillerStatus::from_label(&label) else {
            continue;
        };

        table.insert(number, status);
    }

    table
}

/// Seam for the classification task: yields the filler table for one show,
/// empty when the source has nothing usable.
#[async_trait]
pub trait FillerSource: Send + Sync {
    async fn filler_table(&self, slug: &str) -> FillerTable;
}

#[derive(Clone)]
pub struct FillerListClient {
    client: Client,
    base_url: String,
    pacer: RequestPacer,
}

impl FillerListClient {
    #[must_use]
    pub const fn new(base_url: String, client: Client, pacer: RequestPacer) -> Self {
        Self {
            client,
            base_url,
            pacer,
        }
    }

    fn show_url(&self, slug: &str) -> Option<String> {
        let base = Url::parse(&self.base_url).ok()?;
        base.join(&format!("shows/{slug}"))
            .ok()
            .map(|url| url.to_string())
    }
}

#[async_trait]
impl FillerSource for FillerListClient {
    async fn filler_table(&self, slug: &str) -> FillerTable {
        let Some(url) = self.show_url(slug) else {
            return FillerTable::new();
        };
        match fetch_page(&self.client, &self.pacer, &url).await {
            Some(body) => parse_filler_table(&body),
            None => FillerTable::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_folds_punctuation_and_case() {
        assert_eq!(slugify("Naruto"), "naruto");
        assert_eq!(slugify("Naruto Shippuden"), "naruto-shippuden");
        assert_eq!(slugify("Dr. Stone"), "dr-stone");
        assert_eq!(slugify("Fate/stay night"), "fate-stay-night");
        assert_eq!(slugify("  86  "), "86");
        assert_eq!(slugify(""), "");
    }

    const TABLE_PAGE: &str = r#"
        <html><body>
        <table class="EpisodeList">
          <thead>
            <tr><th>#</th><th>Title</th><th>Type</th><th>Airdate</th></tr>
          </thead>
          <tbody>
            <tr class="manga_canon">
              <td class="Number">1</td>
              <td class="Title"><a href="/e/1">Enter the Hero</a></td>
              <td class="Type">Manga Canon</td>
              <td class="Date">2002-10-03</td>
            </tr>
            <tr class="filler">
              <td class="Number">2</td>
              <td class="Title"><a href="/e/2">Beach Day</a></td>
              <td class="Type">Filler</td>
              <td class="Date">2002-10-10</td>
            </tr>
            <tr class="mixed_canon/filler">
              <td class="Number">3</td>
              <td class="Title"><a href="/e/3">Half and Half</a></td>
              <td class="Type">Mixed Canon/Filler</td>
              <td class="Date">2002-10-17</td>
            </tr>
          </tbody>
        </table>
        </body></html>
    "#;

    #[test]
    fn table_rows_are_mapped() {
        let table = parse_filler_table(TABLE_PAGE);
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(&1), Some(&FillerStatus::MangaCanon));
        assert_eq!(table.get(&2), Some(&FillerStatus::Filler));
        assert_eq!(table.get(&3), Some(&FillerStatus::MixedCanonFiller));
    }

    #[test]
    fn duplicate_numbers_are_last_write_wins() {
        let html = r#"
            <table class="EpisodeList">
              <tr><td class="Number">1</td><td class="Type">Filler</td></tr>
              <tr><td class="Number">2</td><td class="Type">Manga Canon</td></tr>
              <tr><td class="Number">1</td><td class="Type">Anime Canon</td></tr>
            </table>
        "#;
        let table = parse_filler_table(html);
        assert_eq!(table.get(&1), Some(&FillerStatus::AnimeCanon));
        assert_eq!(table.get(&2), Some(&FillerStatus::MangaCanon));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn bad_rows_are_skipped_silently() {
        let html = r#"
            <table class="EpisodeList">
              <tr><td class="Number">not-a-number</td><td class="Type">Filler</td></tr>
              <tr><td class="Number">0</td><td class="Type">Filler</td></tr>
              <tr><td class="Number">4</td><td class="Type">Recap</td></tr>
              <tr><td class="Number">5</td></tr>
              <tr><td class="Number">6</td><td class="Type">Filler</td></tr>
            </table>
        "#;
        let table = parse_filler_table(html);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&6), Some(&FillerStatus::Filler));
    }

    #[test]
    fn missing_table_yields_empty_map() {
        assert!(parse_filler_table("<html><body>404</body></html>").is_empty());
        assert!(parse_filler_table("").is_empty());
        assert!(parse_filler_table("<table><tr><td>1</td></tr></table>").is_empty());
    }
}
