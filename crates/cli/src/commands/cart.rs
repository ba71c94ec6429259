//! Cart commands.

use corner_shop_core::ProductId;
use corner_shop_storefront::{AppError, Shop};

use super::{Output, availability};

pub fn add(shop: &mut Shop, id: ProductId) -> Result<Output, AppError> {
    let quantity = shop.add_to_cart(id)?;
    tracing::info!(product_id = %id, quantity, "Added to cart");
    Ok(show(shop))
}

pub fn remove(shop: &mut Shop, id: ProductId) -> Result<Output, AppError> {
    if !shop.remove_from_cart(id)? {
        tracing::info!(product_id = %id, "Not in cart");
    }
    Ok(show(shop))
}

pub fn increment(shop: &mut Shop, id: ProductId) -> Result<Output, AppError> {
    if !shop.increment(id)? {
        tracing::info!(product_id = %id, "Not in cart");
    }
    Ok(show(shop))
}

pub fn decrement(shop: &mut Shop, id: ProductId) -> Result<Output, AppError> {
    if !shop.decrement(id)? {
        tracing::info!(product_id = %id, "Not in cart");
    }
    Ok(show(shop))
}

pub fn clear(shop: &mut Shop) -> Result<Output, AppError> {
    shop.clear_cart()?;
    Ok(show(shop))
}

/// The reconciled cart, one row per line, then the totals.
pub fn show(shop: &Shop) -> Output {
    let view = shop.cart_view();
    if view.is_empty() {
        return vec!["Your cart is empty".to_owned()];
    }

    let mut out: Output = view
        .lines
        .iter()
        .map(|line| {
            format!(
                "{:>14}  {:<32} {:>3} x {:>10} = {:>10}{}",
                line.product.id,
                line.product.name,
                line.quantity,
                line.unit_price().display(shop.currency()),
                shop.format(line.subtotal()),
                availability(line.source),
            )
        })
        .collect();
    out.push(format!(
        "{} item(s), total {}",
        view.totals.count,
        shop.format(view.totals.total_price)
    ));
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::test_support;
    use super::*;

    #[test]
    fn test_cart_walkthrough() {
        let mut shop = test_support::shop();
        let a = test_support::add(&mut shop, "A", "10");

        assert_eq!(show(&shop), vec!["Your cart is empty"]);

        let out = add(&mut shop, a.id).unwrap();
        assert_eq!(out.last().unwrap(), "1 item(s), total $10.00");

        let out = add(&mut shop, a.id).unwrap();
        assert_eq!(out.last().unwrap(), "2 item(s), total $20.00");

        let out = decrement(&mut shop, a.id).unwrap();
        assert_eq!(out.last().unwrap(), "1 item(s), total $10.00");

        let out = decrement(&mut shop, a.id).unwrap();
        assert_eq!(out, vec!["Your cart is empty"]);
    }

    #[test]
    fn test_add_unknown_product_fails() {
        let mut shop = test_support::shop();
        assert!(matches!(
            add(&mut shop, ProductId::new(5)),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_unknown_line_changes_are_quiet() {
        let mut shop = test_support::shop();
        assert!(increment(&mut shop, ProductId::new(5)).is_ok());
        assert!(remove(&mut shop, ProductId::new(5)).is_ok());
        assert!(shop.cart().is_empty());
    }

    #[test]
    fn test_removed_product_is_marked() {
        let mut shop = test_support::shop();
        let a = test_support::add(&mut shop, "A", "10");
        add(&mut shop, a.id).unwrap();
        shop.remove_product(a.id).unwrap();

        let out = show(&shop);
        assert!(out[0].ends_with("(no longer available)"));
    }
}
