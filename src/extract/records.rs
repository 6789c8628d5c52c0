use super::query::{DomQuery, Query};
use crate::error::{AppError, ExtractError, Result};
pub use crate::log_info;
use scraper::ElementRef;
use serde::{Deserialize, Serialize};

/// One extracted quote. Serialized keys match the output contract:
/// `text`, `by`, `tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub text: String,
    pub by: String,
    pub tags: Vec<String>,
}

/// Assembles one record per item group found under the container element.
///
/// Fields are extracted within each group rather than as three parallel
/// flat lists, so records cannot be mis-paired by position: the group is
/// the unit of iteration, and a group missing a required field fails with
/// an alignment error naming it.
pub struct QuoteExtractor<'a> {
    dom: DomQuery<'a>,
}

impl<'a> QuoteExtractor<'a> {
    pub(crate) fn new(dom: DomQuery<'a>) -> Self {
        Self { dom }
    }

    pub fn extract(&self) -> Result<Vec<QuoteRecord>> {
        let container = self
            .dom
            .select_first(&Query::tag("div").id("quotesPlaceholder"), None)?;

        let groups = self
            .dom
            .select_all(&Query::tag("div").class("quote"), Some(container))?;
        log_info!("[extract] Found {} quote groups in container", groups.len());

        let mut records = Vec::with_capacity(groups.len());
        for (index, group) in groups.into_iter().enumerate() {
            let text =
                self.required_field(group, index, "text", &Query::tag("span").class("text"))?;
            let by =
                self.required_field(group, index, "author", &Query::tag("small").class("author"))?;
            let tags = self
                .dom
                .text_all(&Query::tag("a").class("tag"), Some(group))?;

            records.push(QuoteRecord { text, by, tags });
        }

        log_info!("[extract] Assembled {} records", records.len());
        Ok(records)
    }

    fn required_field(
        &self,
        group: ElementRef<'a>,
        index: usize,
        field: &'static str,
        query: &Query,
    ) -> Result<String> {
        match self.dom.text_first(query, Some(group)) {
            Ok(text) => Ok(text),
            Err(AppError::Extract(ExtractError::NoMatch(_))) => {
                Err(ExtractError::Alignment { group: index, field }.into())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Extractor;

    const RENDERED_PAGE: &str = r#"
        <html><body>
            <div id="quotesPlaceholder">
                <div class="quote">
                    <span class="text">Life is what happens to you while you're busy making other plans.</span>
                    <small class="author">John Lennon</small>
                    <div class="tags">
                        <a class="tag" href="/tag/life">life</a>
                        <a class="tag" href="/tag/change">change</a>
                    </div>
                </div>
                <div class="quote">
                    <span class="text">It is our choices, that show what we truly are, far more than our abilities.</span>
                    <small class="author">J.K. Rowling</small>
                    <div class="tags">
                        <a class="tag" href="/tag/choices">choices</a>
                    </div>
                </div>
            </div>
        </body></html>
    "#;

    #[test]
    fn extracts_one_record_per_group_in_container_order() {
        let extractor = Extractor::parse(RENDERED_PAGE).unwrap();
        let records = extractor.quotes().extract().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            QuoteRecord {
                text: "Life is what happens to you while you're busy making other plans."
                    .to_string(),
                by: "John Lennon".to_string(),
                tags: vec!["life".to_string(), "change".to_string()],
            }
        );
        assert_eq!(records[1].by, "J.K. Rowling");
        assert_eq!(records[1].tags, vec!["choices".to_string()]);
    }

    #[test]
    fn missing_container_is_a_no_match() {
        let extractor = Extractor::parse("<html><body><p>nothing here</p></body></html>").unwrap();
        match extractor.quotes().extract() {
            Err(AppError::Extract(ExtractError::NoMatch(css))) => {
                assert_eq!(css, "div#quotesPlaceholder")
            }
            other => panic!("expected NoMatch, got {:?}", other),
        }
    }

    #[test]
    fn empty_container_yields_no_records() {
        let extractor =
            Extractor::parse(r#"<html><body><div id="quotesPlaceholder"></div></body></html>"#)
                .unwrap();
        let records = extractor.quotes().extract().unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn group_missing_author_fails_with_alignment_error() {
        let page = r#"
            <html><body>
                <div id="quotesPlaceholder">
                    <div class="quote">
                        <span class="text">first</span>
                        <small class="author">someone</small>
                    </div>
                    <div class="quote">
                        <span class="text">second</span>
                    </div>
                </div>
            </body></html>
        "#;
        let extractor = Extractor::parse(page).unwrap();
        match extractor.quotes().extract() {
            Err(AppError::Extract(ExtractError::Alignment { group, field })) => {
                assert_eq!(group, 1);
                assert_eq!(field, "author");
            }
            other => panic!("expected Alignment, got {:?}", other),
        }
    }

    #[test]
    fn group_without_tags_gets_an_empty_tag_list() {
        let page = r#"
            <html><body>
                <div id="quotesPlaceholder">
                    <div class="quote">
                        <span class="text">untagged</span>
                        <small class="author">anon</small>
                    </div>
                </div>
            </body></html>
        "#;
        let extractor = Extractor::parse(page).unwrap();
        let records = extractor.quotes().extract().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].tags.is_empty());
    }

    #[test]
    fn empty_markup_is_a_parse_error() {
        match Extractor::parse("   \n  ") {
            Err(AppError::Extract(ExtractError::Parse(_))) => {}
            other => panic!("expected Parse error, got {:?}", other.map(|_| ())),
        }
    }
}
