//! CLI command implementations.
//!
//! Each command runs against an open [`Shop`] and returns the lines to
//! print on success. Status messages go through `tracing`.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod wishlist;

use corner_shop_core::Product;
use corner_shop_storefront::{Shop, Source};

/// Lines written to stdout.
pub type Output = Vec<String>;

/// Write command output to stdout.
#[allow(clippy::print_stdout)]
pub fn print(output: &[String]) {
    for line in output {
        println!("{line}");
    }
}

/// One catalog row: id, name, price, category.
fn product_row(shop: &Shop, product: &Product) -> String {
    let category = if product.category.is_empty() {
        "-"
    } else {
        product.category.as_str()
    };
    format!(
        "{:>14}  {:<32} {:>10}  {category}",
        product.id,
        product.name,
        product.price.display(shop.currency()),
    )
}

/// Suffix for items whose product has left the catalog.
const fn availability(source: Source) -> &'static str {
    match source {
        Source::Live => "",
        Source::Snapshot => "  (no longer available)",
    }
}
