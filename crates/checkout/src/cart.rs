//! Cart seeding from a shared registry link.
//!
//! Gift pages link into the checkout with the cart encoded in the query
//! string, one `item` parameter per line:
//! `?item=id,name,price,quantity&item=...` with `price` in centavos.
//! Malformed tuples are skipped rather than failing the whole cart.

use mimo_checkout_core::CartItem;
use url::{Url, form_urlencoded};

/// Parse cart items out of a raw query string (with or without the
/// leading `?`).
#[must_use]
pub fn items_from_query(query: &str) -> Vec<CartItem> {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .filter(|(key, _)| key == "item")
        .filter_map(|(_, value)| parse_item(&value))
        .collect()
}

/// Parse cart items out of a full URL. An unparseable URL yields an empty
/// cart, same as arriving without a link.
#[must_use]
pub fn items_from_url(link: &str) -> Vec<CartItem> {
    Url::parse(link).map_or_else(
        |_| Vec::new(),
        |url| items_from_query(url.query().unwrap_or("")),
    )
}

/// One `id,name,price,quantity` tuple.
fn parse_item(raw: &str) -> Option<CartItem> {
    let mut parts = raw.splitn(4, ',');
    let id = parts.next()?.trim();
    let name = parts.next()?.trim();
    let price = parts.next()?.trim().parse::<i64>().ok()?;
    let quantity = parts.next()?.trim().parse::<u32>().ok()?;
    if id.is_empty() || name.is_empty() {
        return None;
    }
    Some(CartItem {
        id: id.to_string(),
        name: name.to_string(),
        price,
        quantity,
    })
}
