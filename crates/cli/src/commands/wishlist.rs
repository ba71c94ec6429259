//! Wishlist commands.

use corner_shop_core::ProductId;
use corner_shop_storefront::{AppError, Shop};
use corner_shop_storefront::stores::Toggled;

use super::{Output, availability, product_row};

pub fn toggle(shop: &mut Shop, id: ProductId) -> Result<Output, AppError> {
    let line = match shop.toggle_wishlist(id)? {
        Toggled::Added => format!("Saved {id} to your wishlist"),
        Toggled::Removed => format!("Removed {id} from your wishlist"),
    };
    Ok(vec![line])
}

pub fn move_to_cart(shop: &mut Shop, id: ProductId) -> Result<Output, AppError> {
    if shop.move_to_cart(id)? {
        Ok(vec![format!("Moved {id} to your cart")])
    } else {
        tracing::info!(product_id = %id, "Not on wishlist");
        Ok(Vec::new())
    }
}

pub fn clear(shop: &mut Shop) -> Result<Output, AppError> {
    shop.clear_wishlist()?;
    Ok(Vec::new())
}

pub fn show(shop: &Shop) -> Output {
    let items = &shop.wishlist_view().items;
    if items.is_empty() {
        return vec!["Your wishlist is empty".to_owned()];
    }
    items
        .iter()
        .map(|item| {
            format!(
                "{}{}",
                product_row(shop, &item.product),
                availability(item.source)
            )
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::test_support;
    use super::*;

    #[test]
    fn test_toggle_and_show() {
        let mut shop = test_support::shop();
        let mug = test_support::add(&mut shop, "Mug", "10");

        let out = toggle(&mut shop, mug.id).unwrap();
        assert_eq!(out, vec![format!("Saved {} to your wishlist", mug.id)]);
        assert!(show(&shop)[0].contains("Mug"));

        toggle(&mut shop, mug.id).unwrap();
        assert_eq!(show(&shop), vec!["Your wishlist is empty"]);
    }

    #[test]
    fn test_move_to_cart() {
        let mut shop = test_support::shop();
        let mug = test_support::add(&mut shop, "Mug", "10");
        toggle(&mut shop, mug.id).unwrap();

        assert_eq!(move_to_cart(&mut shop, mug.id).unwrap().len(), 1);
        assert!(move_to_cart(&mut shop, mug.id).unwrap().is_empty());
        assert_eq!(shop.cart().totals().count, 1);
    }
}
