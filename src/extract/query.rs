use crate::error::{ExtractError, Result};
use scraper::{ElementRef, Html, Selector};

/// Conjunctive element filter: the tag must match, and so must the class
/// and id when present.
#[derive(Debug, Clone)]
pub struct Query {
    tag: String,
    class: Option<String>,
    id: Option<String>,
}

impl Query {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            class: None,
            id: None,
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    fn css(&self) -> String {
        let mut css = self.tag.clone();
        if let Some(id) = &self.id {
            css.push('#');
            css.push_str(id);
        }
        if let Some(class) = &self.class {
            css.push('.');
            css.push_str(class);
        }
        css
    }

    fn selector(&self) -> Result<Selector> {
        let css = self.css();
        Selector::parse(&css)
            .map_err(|e| ExtractError::Selector(format!("{}: {}", css, e)).into())
    }
}

/// Generic query primitive over a parsed document. Matching is always
/// structural; text extraction is a transform applied to the matched
/// elements afterwards, identical for single and all-match queries.
pub struct DomQuery<'a> {
    document: &'a Html,
}

impl<'a> DomQuery<'a> {
    pub(crate) fn new(document: &'a Html) -> Self {
        Self { document }
    }

    /// Every match in document order. `scope`, if provided, restricts the
    /// search to descendants of that element.
    pub fn select_all(
        &self,
        query: &Query,
        scope: Option<ElementRef<'a>>,
    ) -> Result<Vec<ElementRef<'a>>> {
        let selector = query.selector()?;
        let root = scope.unwrap_or_else(|| self.document.root_element());
        Ok(root.select(&selector).collect())
    }

    /// First match in document order, or `NoMatch` when none exists.
    pub fn select_first(
        &self,
        query: &Query,
        scope: Option<ElementRef<'a>>,
    ) -> Result<ElementRef<'a>> {
        let selector = query.selector()?;
        let root = scope.unwrap_or_else(|| self.document.root_element());
        root.select(&selector)
            .next()
            .ok_or_else(|| ExtractError::NoMatch(query.css()).into())
    }

    pub fn text_all(&self, query: &Query, scope: Option<ElementRef<'a>>) -> Result<Vec<String>> {
        Ok(self
            .select_all(query, scope)?
            .into_iter()
            .map(element_text)
            .collect())
    }

    pub fn text_first(&self, query: &Query, scope: Option<ElementRef<'a>>) -> Result<String> {
        self.select_first(query, scope).map(element_text)
    }
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    const PAGE: &str = r#"
        <html><body>
            <div id="outer">
                <span class="label">first</span>
                <span class="label">  second  </span>
                <span class="other">third</span>
            </div>
            <div id="inner">
                <span class="label">fourth</span>
            </div>
        </body></html>
    "#;

    fn doc() -> Html {
        Html::parse_document(PAGE)
    }

    #[test]
    fn select_all_returns_matches_in_document_order() {
        let document = doc();
        let dom = DomQuery::new(&document);
        let texts = dom
            .text_all(&Query::tag("span").class("label"), None)
            .unwrap();
        assert_eq!(texts, vec!["first", "second", "fourth"]);
    }

    #[test]
    fn select_all_count_matches_independent_traversal() {
        let document = doc();
        let dom = DomQuery::new(&document);
        let matches = dom.select_all(&Query::tag("span"), None).unwrap();
        let manual = document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "span")
            .count();
        assert_eq!(matches.len(), manual);
    }

    #[test]
    fn filters_are_conjunctive() {
        let document = doc();
        let dom = DomQuery::new(&document);
        // Right tag, wrong class: no matches.
        let none = dom
            .select_all(&Query::tag("span").class("missing"), None)
            .unwrap();
        assert!(none.is_empty());
        // Tag, class and id all constrained.
        let one = dom
            .select_all(&Query::tag("div").id("inner"), None)
            .unwrap();
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn scope_restricts_search_to_descendants() {
        let document = doc();
        let dom = DomQuery::new(&document);
        let outer = dom
            .select_first(&Query::tag("div").id("outer"), None)
            .unwrap();
        let texts = dom
            .text_all(&Query::tag("span").class("label"), Some(outer))
            .unwrap();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn select_first_returns_first_in_document_order() {
        let document = doc();
        let dom = DomQuery::new(&document);
        let text = dom
            .text_first(&Query::tag("span").class("label"), None)
            .unwrap();
        assert_eq!(text, "first");
    }

    #[test]
    fn select_first_fails_on_zero_matches() {
        let document = doc();
        let dom = DomQuery::new(&document);
        match dom.select_first(&Query::tag("article"), None) {
            Err(AppError::Extract(ExtractError::NoMatch(css))) => assert_eq!(css, "article"),
            other => panic!("expected NoMatch, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn text_is_trimmed() {
        let document = doc();
        let dom = DomQuery::new(&document);
        let texts = dom
            .text_all(&Query::tag("span").class("label"), None)
            .unwrap();
        assert_eq!(texts[1], "second");
    }
}
