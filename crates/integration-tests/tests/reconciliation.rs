//! Cart and wishlist display against a catalog that keeps changing.

use corner_shop_core::{Price, ProductPatch};
use corner_shop_integration_tests::{TestShop, add_product};
use corner_shop_storefront::{Source, StorageKey};
use rust_decimal::Decimal;
use serde_json::json;

fn reprice(price: &str) -> ProductPatch {
    ProductPatch {
        price: Some(Price::parse(price).expect("price")),
        ..ProductPatch::default()
    }
}

#[test]
fn test_price_edit_reaches_view_but_not_stored_cart() {
    let dir = TestShop::new();
    let mut shop = dir.open();
    let mug = add_product(&mut shop, "Mug", "10");
    shop.add_to_cart(mug.id).expect("add mug");
    let stored_before = dir.read_raw(StorageKey::Cart);

    shop.update_product(mug.id, reprice("12")).expect("reprice");

    let view = shop.cart_view();
    assert_eq!(view.lines[0].unit_price(), Price::parse("12").expect("price"));
    assert_eq!(view.totals.total_price, Decimal::from(12));
    assert_eq!(shop.cart().totals().total_price, Decimal::from(10));
    assert_eq!(dir.read_raw(StorageKey::Cart), stored_before);
}

#[test]
fn test_price_edit_is_seen_after_restart() {
    let dir = TestShop::new();
    let mut shop = dir.open();
    let mug = add_product(&mut shop, "Mug", "10");
    shop.add_to_cart(mug.id).expect("add mug");
    shop.update_product(mug.id, reprice("15")).expect("reprice");
    drop(shop);

    let shop = dir.open();
    assert_eq!(shop.cart_view().totals.total_price, Decimal::from(15));
    assert_eq!(shop.cart().lines()[0].snapshot.price, Price::parse("10").expect("price"));
}

#[test]
fn test_adding_again_refreshes_snapshot() {
    let dir = TestShop::new();
    let mut shop = dir.open();
    let mug = add_product(&mut shop, "Mug", "10");
    shop.add_to_cart(mug.id).expect("add mug");
    shop.update_product(mug.id, reprice("12")).expect("reprice");
    shop.add_to_cart(mug.id).expect("add mug again");

    let cart = dir.read_json(StorageKey::Cart).expect("cart file");
    assert_eq!(cart[0]["price"], json!(12.0));
    assert_eq!(cart[0]["quantity"], json!(2));
    assert_eq!(shop.cart().totals().total_price, Decimal::from(24));
}

#[test]
fn test_deleted_product_falls_back_to_snapshot() {
    let dir = TestShop::new();
    let mut shop = dir.open();
    let mug = add_product(&mut shop, "Mug", "10");
    shop.add_to_cart(mug.id).expect("add mug");
    shop.toggle_wishlist(mug.id).expect("save mug");
    shop.remove_product(mug.id).expect("remove mug");
    drop(shop);

    let shop = dir.open();
    let line = &shop.cart_view().lines[0];
    assert_eq!(line.product, mug);
    assert_eq!(line.source, Source::Snapshot);
    assert_eq!(shop.cart_view().totals.total_price, Decimal::from(10));

    let item = &shop.wishlist_view().items[0];
    assert_eq!(item.product, mug);
    assert_eq!(item.source, Source::Snapshot);
}

#[test]
fn test_snapshot_lines_can_still_be_adjusted() {
    let dir = TestShop::new();
    let mut shop = dir.open();
    let mug = add_product(&mut shop, "Mug", "10");
    shop.add_to_cart(mug.id).expect("add mug");
    shop.remove_product(mug.id).expect("remove mug");

    assert!(shop.increment(mug.id).expect("increment"));
    assert_eq!(shop.cart_view().totals.count, 2);
    assert!(shop.decrement(mug.id).expect("decrement"));
    assert!(shop.decrement(mug.id).expect("decrement"));
    assert!(shop.cart_view().is_empty());
}

#[test]
fn test_move_from_wishlist_after_removal_uses_snapshot() {
    let dir = TestShop::new();
    let mut shop = dir.open();
    let mug = add_product(&mut shop, "Mug", "10");
    shop.toggle_wishlist(mug.id).expect("save mug");
    shop.remove_product(mug.id).expect("remove mug");

    assert!(shop.move_to_cart(mug.id).expect("move"));
    drop(shop);

    let shop = dir.open();
    assert!(shop.wishlist().is_empty());
    assert_eq!(shop.cart().lines()[0].snapshot, mug);
    assert!(shop.cart_view().lines[0].is_stale());
}

#[test]
fn test_removing_category_leaves_product_category() {
    let dir = TestShop::new();
    let mut shop = dir.open();
    shop.add_category("Kitchen").expect("add category");
    let mug = shop
        .add_product(corner_shop_core::NewProduct {
            name: "Mug".to_owned(),
            price: Price::parse("10").expect("price"),
            category: "Kitchen".to_owned(),
            ..corner_shop_core::NewProduct::default()
        })
        .expect("add mug");
    assert!(shop.remove_category("Kitchen").expect("remove category"));
    drop(shop);

    let shop = dir.open();
    assert!(shop.products().categories().is_empty());
    assert_eq!(shop.products().get(mug.id).map(|p| p.category.as_str()), Some("Kitchen"));
    assert_eq!(shop.products().by_category("Kitchen").count(), 1);
}
