mod query;
mod records;

pub use query::{DomQuery, Query};
pub use records::{QuoteExtractor, QuoteRecord};

use crate::error::{ExtractError, Result};
use scraper::Html;

/// A query-able tree built from one captured page. Replaced wholesale
/// whenever new markup is fetched; never patched incrementally.
pub struct Extractor {
    document: Html,
}

impl Extractor {
    /// Parse raw markup. Malformed HTML is tolerated best-effort; only
    /// an empty capture is rejected outright.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(ExtractError::Parse("empty document".to_string()).into());
        }
        Ok(Self {
            document: Html::parse_document(raw),
        })
    }

    pub fn dom(&self) -> DomQuery {
        DomQuery::new(&self.document)
    }

    pub fn quotes(&self) -> QuoteExtractor {
        QuoteExtractor::new(self.dom())
    }
}
