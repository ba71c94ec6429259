//! Checkout commands.
//!
//! The form is saved field by field, so it can be filled across several
//! invocations before `checkout place`.

use corner_shop_core::CheckoutField;
use corner_shop_storefront::{AppError, Shop};

use super::Output;

pub fn set_field(shop: &mut Shop, field: CheckoutField, value: String) -> Result<Output, AppError> {
    shop.set_checkout_field(field, value)?;
    match shop.checkout().form().first_blank() {
        Some(next) => tracing::info!(%field, "Saved; {} is still required", next.label()),
        None => tracing::info!(%field, "Saved; the form is complete"),
    }
    Ok(Vec::new())
}

pub fn place(shop: &mut Shop) -> Result<Output, AppError> {
    let receipt = shop.place_order()?;

    let mut out: Output = receipt
        .lines
        .iter()
        .map(|line| {
            format!(
                "{:<32} {:>3} x {:>10} = {:>10}",
                line.product.name,
                line.quantity,
                line.unit_price().display(shop.currency()),
                shop.format(line.subtotal()),
            )
        })
        .collect();
    out.push(format!(
        "Total: {} for {} item(s)",
        shop.format(receipt.totals.total_price),
        receipt.totals.count
    ));
    out.push(format!(
        "Thank you, {}! A confirmation will be sent to {}.",
        receipt.customer, receipt.email
    ));
    Ok(out)
}
