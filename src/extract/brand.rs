//! Brand extraction from the catalog index page

use super::style::background_image_from;
use super::{element_text, ExtractError, Query};
use crate::alias::alias;
use crate::catalog::{Brand, ModelLink};
use scraper::Html;

const TILE: &str = ".model-carousel a";
const TILE_IMAGE: &str = "span";

/// Records and links extracted from the catalog index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrandPage {
    pub brands: Vec<Brand>,
    pub links: Vec<ModelLink>,
}

/// Extracts every brand tile from the index page, in document order
///
/// A tile without an image style, or whose style does not carry a
/// `background-image`, fails the whole page.
pub fn extract_brands(html: &str) -> Result<BrandPage, ExtractError> {
    let document = Html::parse_document(html);
    let tiles = Query::new(TILE)?;
    let image = Query::new(TILE_IMAGE)?;

    let mut page = BrandPage::default();
    for tile in tiles.all(document.root_element()) {
        let name = element_text(tile);
        let alias = alias(&name);
        let image_url = background_image_from(image.attr(tile, "style")?)?;
        let href = tile
            .value()
            .attr("href")
            .ok_or_else(|| ExtractError::MissingAttribute {
                selector: TILE.to_string(),
                attr: "href".to_string(),
            })?;

        page.links.push(ModelLink {
            brand: alias.clone(),
            link: href.trim().to_string(),
        });
        page.brands.push(Brand::new(name, image_url, alias));
    }

    Ok(page)
}
