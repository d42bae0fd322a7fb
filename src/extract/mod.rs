//! Extractors for the three catalog page types
//!
//! Each extractor takes the raw markup of one page and returns the records to
//! persist together with the child links to crawl next. Extraction is pure:
//! no I/O, no shared state, so extractors can run from any number of
//! concurrent tasks.
//!
//! Structural drift on the site is surfaced as an [`ExtractError`] for the
//! whole page rather than silently skipping entries.

mod brand;
mod model;
mod price;
mod rows;
pub mod style;

pub use brand::{extract_brands, BrandPage};
pub use model::{extract_models, ModelPage};
pub use price::extract_price_sheet;
pub use rows::{EmptyLabels, RowLocator};
pub use style::{background_image_from, color_code_from};

use scraper::element_ref::Select;
use scraper::{ElementRef, Selector};
use thiserror::Error;

/// Errors raised when a page does not have the expected structure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("No element matches '{selector}'")]
    MissingElement { selector: String },

    #[error("Element '{selector}' has no '{attr}' attribute")]
    MissingAttribute { selector: String, attr: String },

    #[error("No {kind} in style '{style}'")]
    StylePattern { kind: &'static str, style: String },
}

/// A compiled CSS selector that remembers its source text for error reporting
#[derive(Debug)]
pub(crate) struct Query {
    css: &'static str,
    selector: Selector,
}

impl Query {
    pub(crate) fn new(css: &'static str) -> Result<Self, ExtractError> {
        let selector =
            Selector::parse(css).map_err(|_| ExtractError::Selector(css.to_string()))?;
        Ok(Self { css, selector })
    }

    /// All matching descendants of `scope`, in document order
    pub(crate) fn all<'a, 'b>(&'b self, scope: ElementRef<'a>) -> Select<'a, 'b> {
        scope.select(&self.selector)
    }

    /// First matching descendant of `scope`
    pub(crate) fn first<'a>(&self, scope: ElementRef<'a>) -> Result<ElementRef<'a>, ExtractError> {
        self.all(scope)
            .next()
            .ok_or_else(|| ExtractError::MissingElement {
                selector: self.css.to_string(),
            })
    }

    /// Concatenated text of every match, trimmed; empty when nothing matches
    pub(crate) fn text(&self, scope: ElementRef<'_>) -> String {
        self.all(scope)
            .flat_map(|el| el.text())
            .collect::<String>()
            .trim()
            .to_string()
    }

    /// Attribute of the first match
    pub(crate) fn attr<'a>(
        &self,
        scope: ElementRef<'a>,
        name: &str,
    ) -> Result<&'a str, ExtractError> {
        let element = self.first(scope)?;
        element
            .value()
            .attr(name)
            .ok_or_else(|| ExtractError::MissingAttribute {
                selector: self.css.to_string(),
                attr: name.to_string(),
            })
    }
}

/// Trimmed text content of a single element
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
