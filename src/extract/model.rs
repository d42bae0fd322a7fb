//! Model extraction from a brand's listing page

use super::style::background_image_from;
use super::{ExtractError, Query};
use crate::alias::alias;
use crate::catalog::{composite_key, prices_url, Model, Offers, PriceLink};
use scraper::Html;

/// Records and links extracted from one brand's listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelPage {
    pub models: Vec<Model>,
    pub links: Vec<PriceLink>,
}

/// Extracts every model listed on a brand page
///
/// `brand_alias` is the alias of the owning brand; it prefixes each model's
/// price-sheet key. An unparseable offers count is kept as
/// [`Offers::NotANumber`] and does not fail the page.
pub fn extract_models(html: &str, brand_alias: &str) -> Result<ModelPage, ExtractError> {
    let document = Html::parse_document(html);
    let items = Query::new(".carlist li")?;
    let title = Query::new(".car-title")?;
    let offers = Query::new(".complete-set")?;
    let photo = Query::new(".car-photo")?;
    let link = Query::new("a")?;

    let mut page = ModelPage::default();
    for item in items.all(document.root_element()) {
        let name = title.text(item);
        let alias = alias(&name);
        let key = composite_key(brand_alias, &alias);

        let image_url = background_image_from(photo.attr(item, "style")?)?;
        let href = link.attr(item, "href")?.trim().to_string();

        page.models.push(Model {
            offers: Offers::parse(&offers.text(item)),
            image_url,
            prices_url: prices_url(&key),
            name,
            alias,
        });
        page.links.push(PriceLink {
            model: key,
            link: href,
        });
    }

    Ok(page)
}
