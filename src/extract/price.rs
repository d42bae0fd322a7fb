//! Price sheet extraction from a model's price page
//!
//! A price page has two independent regions: discounted units in stock and
//! equipment cards with per-colour prices. Both are scanned in document order.

use super::rows::{EmptyLabels, RowLocator};
use super::style::{background_image_from, color_code_from};
use super::{ExtractError, Query};
use crate::alias::alias;
use crate::catalog::{Color, ColorPrice, Discount, PriceCard, PriceSheet};
use scraper::{ElementRef, Html};

/// Selectors for the discount region
struct DiscountLocators {
    blocks: Query,
    name: Query,
    color_name: Query,
    color_swatch: Query,
    dealer_price: Query,
    image: Query,
    settings: RowLocator,
    prices: RowLocator,
}

impl DiscountLocators {
    fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            blocks: Query::new(".car__unit__wrapper .car__unit__block")?,
            name: Query::new(".car__unit__name .standart")?,
            color_name: Query::new(".car__unit__name .metalic")?,
            color_swatch: Query::new(".car__unit__name .metalic i")?,
            dealer_price: Query::new(".unit__price_price")?,
            image: Query::new(".car__unit__img .car-card-photo")?,
            settings: RowLocator::new(
                ".car__unit__sett .sett_unit",
                ".sett_unit-left",
                ".sett_unit-right",
            )?,
            prices: RowLocator::new(
                ".car__unit__price_setting",
                ".car__unit__price_setting-left",
                ".car__unit__price_setting-right",
            )?,
        })
    }

    fn discount(&self, block: ElementRef<'_>) -> Result<Discount, ExtractError> {
        let name = self.name.text(block);

        let mut price = self.prices.collect(block, EmptyLabels::Keep);
        self.dealer_price.first(block)?;
        price.insert("dealer".to_string(), self.dealer_price.text(block));

        Ok(Discount {
            alias: alias(&name),
            color: Color {
                name: self.color_name.text(block),
                code: color_code_from(self.color_swatch.attr(block, "style")?)?,
            },
            settings: self.settings.collect(block, EmptyLabels::Keep),
            price,
            image_url: background_image_from(self.image.attr(block, "style")?)?,
            name,
        })
    }
}

/// Selectors for the equipment card region
struct CardLocators {
    cards: Query,
    image: Query,
    table_rows: Query,
    color_name: Query,
    color_swatch: Query,
    price: Query,
    info: RowLocator,
    info_last: RowLocator,
}

impl CardLocators {
    fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            cards: Query::new(".car-card-equipment.car-card")?,
            image: Query::new(".car-card-photo")?,
            table_rows: Query::new(".car-list tr")?,
            color_name: Query::new(".car-list-color")?,
            color_swatch: Query::new(".car-list-color i.color")?,
            price: Query::new(".car-list-price")?,
            info: RowLocator::new(
                ".car-card-right .carinfo:not(.last) li",
                ".label",
                ".value",
            )?,
            info_last: RowLocator::new(".car-card-right .carinfo.last li", ".label", ".value")?,
        })
    }

    fn card(&self, card: ElementRef<'_>) -> Result<PriceCard, ExtractError> {
        let mut info = self.info.collect(card, EmptyLabels::Keep);
        self.info_last.collect_into(card, &mut info, EmptyLabels::Skip);

        // Row 0 is the table header.
        let mut prices = Vec::new();
        for row in self.table_rows.all(card).skip(1) {
            prices.push(ColorPrice {
                color: Color {
                    name: self.color_name.text(row),
                    code: color_code_from(self.color_swatch.attr(row, "style")?)?,
                },
                price: self.price.text(row),
            });
        }

        Ok(PriceCard {
            image_url: background_image_from(self.image.attr(card, "style")?)?,
            info,
            prices,
        })
    }
}

/// Extracts the discount units and equipment cards of a price page
///
/// Every discount must carry a dealer price element, a colour swatch style
/// and an image style; every priced table row must carry a colour swatch.
/// Any of these missing fails the page.
pub fn extract_price_sheet(html: &str) -> Result<PriceSheet, ExtractError> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let discounts = DiscountLocators::new()?;
    let cards = CardLocators::new()?;

    let mut sheet = PriceSheet::default();
    for block in discounts.blocks.all(root) {
        sheet.discount.push(discounts.discount(block)?);
    }
    for card in cards.cards.all(root) {
        sheet.price.push(cards.card(card)?);
    }

    Ok(sheet)
}
