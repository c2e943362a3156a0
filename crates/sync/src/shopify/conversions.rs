//! Conversions from GraphQL response nodes to domain types.

use rust_decimal::Decimal;
use wishlist_core::{Money, PriceRange, ProductImage, ProductRecord};

use super::queries::{MoneyNode, PriceRangeNode, ProductNode};

/// Convert a product node into a `ProductRecord`.
///
/// Returns `None` for nodes that are not usable products: `{}` placeholders
/// for non-product IDs, or nodes missing an ID or title.
pub fn convert_product(node: ProductNode) -> Option<ProductRecord> {
    let id = node.id.filter(|id| !id.is_empty())?;
    let title = node.title?;

    Some(ProductRecord {
        id: id.into(),
        title,
        handle: node.handle.filter(|h| !h.is_empty()),
        price_range: node.price_range.and_then(convert_price_range),
        images: node
            .images
            .map(|connection| {
                connection
                    .nodes
                    .into_iter()
                    .map(|image| ProductImage { url: image.url })
                    .collect()
            })
            .unwrap_or_default(),
    })
}

/// Convert a price range, dropping it entirely if either bound is unparsable.
fn convert_price_range(range: PriceRangeNode) -> Option<PriceRange> {
    Some(PriceRange {
        min_variant_price: convert_money(range.min_variant_price)?,
        max_variant_price: convert_money(range.max_variant_price)?,
    })
}

fn convert_money(money: MoneyNode) -> Option<Money> {
    match money.amount.parse::<Decimal>() {
        Ok(amount) => Some(Money::new(amount, money.currency_code)),
        Err(e) => {
            tracing::warn!(amount = %money.amount, error = %e, "Unparsable money amount");
            None
        }
    }
}
