//! Product and category commands.
//!
//! # Usage
//!
//! ```bash
//! shop-cli product add -n "Enamel Mug" -p 12.50 -c Kitchen --image mug.jpg
//! shop-cli product update 1718000000000 --price 14
//! shop-cli product list --category Kitchen
//! shop-cli category add Kitchen
//! ```

use corner_shop_core::{NewProduct, Price, ProductId, ProductPatch};
use corner_shop_storefront::{AppError, Shop};

use super::{Output, product_row};

/// Fields for a new product, as typed.
#[derive(Debug)]
pub struct ProductFields {
    pub name: String,
    pub price: String,
    pub description: String,
    pub category: String,
    pub images: Vec<String>,
}

/// Fields to change on a product, as typed. An empty image list leaves the
/// images alone.
#[derive(Debug, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub images: Vec<String>,
}

pub fn add_product(shop: &mut Shop, fields: ProductFields) -> Result<Output, AppError> {
    let draft = NewProduct {
        name: fields.name,
        price: Price::parse(&fields.price)?,
        description: fields.description,
        category: fields.category,
        images: fields.images,
    };
    let product = shop.add_product(draft)?;
    if !product.category.is_empty() && !shop.products().catalog().has_category(&product.category) {
        tracing::warn!(category = %product.category, "Product category is not in the category list");
    }
    Ok(vec![product_row(shop, &product)])
}

pub fn update_product(
    shop: &mut Shop,
    id: ProductId,
    update: ProductUpdate,
) -> Result<Output, AppError> {
    let patch = ProductPatch {
        name: update.name,
        price: update.price.as_deref().map(Price::parse).transpose()?,
        description: update.description,
        category: update.category,
        images: (!update.images.is_empty()).then_some(update.images),
    };
    if patch.is_empty() {
        tracing::info!("Nothing to update");
        return Ok(Vec::new());
    }
    match shop.update_product(id, patch)? {
        Some(product) => Ok(vec![product_row(shop, &product)]),
        None => Err(AppError::NotFound(id)),
    }
}

pub fn remove_product(shop: &mut Shop, id: ProductId) -> Result<Output, AppError> {
    if !shop.remove_product(id)? {
        tracing::info!(product_id = %id, "No such product");
    }
    Ok(Vec::new())
}

pub fn list_products(shop: &Shop, category: Option<&str>) -> Output {
    let products = shop.products();
    match category.map(str::trim) {
        Some(category) => products
            .by_category(category)
            .map(|p| product_row(shop, p))
            .collect(),
        None => products
            .products()
            .iter()
            .map(|p| product_row(shop, p))
            .collect(),
    }
}

pub fn clear_products(shop: &mut Shop) -> Result<Output, AppError> {
    shop.clear_products()?;
    Ok(Vec::new())
}

pub fn add_category(shop: &mut Shop, name: &str) -> Result<Output, AppError> {
    let name = shop.add_category(name)?;
    Ok(vec![name.to_string()])
}

pub fn remove_category(shop: &mut Shop, name: &str) -> Result<Output, AppError> {
    if !shop.remove_category(name)? {
        tracing::info!(category = %name.trim(), "No such category");
    }
    Ok(Vec::new())
}

pub fn list_categories(shop: &Shop) -> Output {
    shop.products()
        .categories()
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::test_support;
    use super::*;

    fn fields(name: &str, price: &str, category: &str) -> ProductFields {
        ProductFields {
            name: name.to_owned(),
            price: price.to_owned(),
            description: String::new(),
            category: category.to_owned(),
            images: Vec::new(),
        }
    }

    #[test]
    fn test_add_product_parses_price() {
        let mut shop = test_support::shop();
        let out = add_product(&mut shop, fields("Mug", "12.5", "Kitchen")).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].contains("Mug"));
        assert!(out[0].contains("$12.50"));
        assert!(out[0].ends_with("Kitchen"));
    }

    #[test]
    fn test_add_product_rejects_bad_price() {
        let mut shop = test_support::shop();
        assert!(matches!(
            add_product(&mut shop, fields("Mug", "-3", "")),
            Err(AppError::Price(_))
        ));
        assert!(matches!(
            add_product(&mut shop, fields("Mug", "cheap", "")),
            Err(AppError::Price(_))
        ));
        assert!(shop.products().products().is_empty());
    }

    #[test]
    fn test_update_unknown_product_is_not_found() {
        let mut shop = test_support::shop();
        let update = ProductUpdate {
            price: Some("5".to_owned()),
            ..ProductUpdate::default()
        };
        assert!(matches!(
            update_product(&mut shop, ProductId::new(7), update),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_empty_update_changes_nothing() {
        let mut shop = test_support::shop();
        let mug = test_support::add(&mut shop, "Mug", "10");
        let out = update_product(&mut shop, mug.id, ProductUpdate::default()).unwrap();
        assert!(out.is_empty());
        assert_eq!(shop.products().get(mug.id), Some(&mug));
    }

    #[test]
    fn test_list_by_category() {
        let mut shop = test_support::shop();
        add_product(&mut shop, fields("Mug", "10", "Kitchen")).unwrap();
        add_product(&mut shop, fields("Novel", "8", "Books")).unwrap();

        assert_eq!(list_products(&shop, None).len(), 2);
        let kitchen = list_products(&shop, Some(" Kitchen "));
        assert_eq!(kitchen.len(), 1);
        assert!(kitchen[0].contains("Mug"));
    }

    #[test]
    fn test_categories() {
        let mut shop = test_support::shop();
        assert_eq!(add_category(&mut shop, " Books ").unwrap(), vec!["Books"]);
        assert!(add_category(&mut shop, "Books").is_err());
        assert_eq!(list_categories(&shop), vec!["Books"]);

        remove_category(&mut shop, "Books").unwrap();
        assert!(list_categories(&shop).is_empty());
    }
}
