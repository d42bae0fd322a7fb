//! Catalog records produced by the crawl
//!
//! Three levels of records are persisted: [`Brand`] lists, per-brand
//! [`Model`] lists and per-model [`PriceSheet`]s. [`ModelLink`] and
//! [`PriceLink`] are in-memory hand-offs that drive the next fan-out and are
//! never written out.
//!
//! The helpers at the bottom of this module are the only place artifact keys
//! and cross-level join keys are composed.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Mapping from a label alias to the raw value text
pub type Fields = BTreeMap<String, String>;

/// A brand tile from the catalog index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Brand {
    pub name: String,
    pub image_url: String,
    pub alias: String,
    pub models_url: String,
}

impl Brand {
    /// Builds a brand, deriving `models_url` from the alias
    pub fn new(name: String, image_url: String, alias: String) -> Self {
        let models_url = models_url(&alias);
        Self {
            name,
            image_url,
            alias,
            models_url,
        }
    }
}

/// Link to one brand's model listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelLink {
    /// Alias of the owning brand
    pub brand: String,
    /// Href as found on the index page
    pub link: String,
}

/// Number of offers listed for a model
///
/// Listing pages occasionally carry text that is not a count; such entries
/// are kept with [`Offers::NotANumber`] and serialize as JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offers {
    Count(u64),
    NotANumber,
}

impl Offers {
    /// Parses the leading decimal digits of `text`
    ///
    /// Leading whitespace and a `+` sign are accepted; trailing text is
    /// ignored, so `"12 предложений"` yields 12.
    pub fn parse(text: &str) -> Self {
        let text = text.trim_start();
        let text = text.strip_prefix('+').unwrap_or(text);
        let digits: &str = match text.find(|c: char| !c.is_ascii_digit()) {
            Some(end) => &text[..end],
            None => text,
        };

        match digits.parse::<u64>() {
            Ok(count) => Offers::Count(count),
            Err(_) => Offers::NotANumber,
        }
    }

    pub fn count(&self) -> Option<u64> {
        match self {
            Offers::Count(count) => Some(*count),
            Offers::NotANumber => None,
        }
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Offers::NotANumber)
    }
}

impl fmt::Display for Offers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offers::Count(count) => write!(f, "{}", count),
            Offers::NotANumber => write!(f, "NaN"),
        }
    }
}

impl Serialize for Offers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Offers::Count(count) => serializer.serialize_u64(*count),
            Offers::NotANumber => serializer.serialize_none(),
        }
    }
}

/// A model entry from a brand's listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Model {
    pub name: String,
    pub alias: String,
    pub offers: Offers,
    pub image_url: String,
    pub prices_url: String,
}

/// Link to one model's price page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLink {
    /// Composite key `<brand_alias>_<model_alias>`
    pub model: String,
    /// Href as found on the listing page
    pub link: String,
}

/// A named colour with its CSS code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Color {
    pub name: String,
    pub code: String,
}

/// A discounted unit offered for a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discount {
    pub name: String,
    pub alias: String,
    pub color: Color,
    pub settings: Fields,
    /// Always contains `dealer`
    pub price: Fields,
    pub image_url: String,
}

/// Price of a trim in one colour
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorPrice {
    pub color: Color,
    pub price: String,
}

/// An equipment card listing a trim and its prices per colour
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceCard {
    pub image_url: String,
    pub info: Fields,
    pub prices: Vec<ColorPrice>,
}

/// Everything extracted from one model's price page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriceSheet {
    pub discount: Vec<Discount>,
    pub price: Vec<PriceCard>,
}

/// Artifact key of the brand list
pub const BRANDS_KEY: &str = "brands.json";

/// Joins a brand alias and a model alias into the price-sheet key
pub fn composite_key(brand_alias: &str, model_alias: &str) -> String {
    format!("{}_{}", brand_alias, model_alias)
}

/// Public path of a brand's model list, as recorded in [`Brand::models_url`]
pub fn models_url(brand_alias: &str) -> String {
    format!("/{}", models_key(brand_alias))
}

/// Public path of a price sheet, as recorded in [`Model::prices_url`]
pub fn prices_url(composite: &str) -> String {
    format!("/{}", prices_key(composite))
}

/// Storage key of a brand's model list
pub fn models_key(brand_alias: &str) -> String {
    format!("models/{}.json", brand_alias)
}

/// Storage key of a price sheet
pub fn prices_key(composite: &str) -> String {
    format!("prices/{}.json", composite)
}
