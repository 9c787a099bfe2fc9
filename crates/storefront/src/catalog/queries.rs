//! GROQ queries against the product catalog.
//!
//! Every product query shares [`PRODUCT_PROJECTION`] so all views decode the
//! same record shape. Images may live under either `image` or `imageurl`
//! depending on when the document was authored; the projection folds both
//! into `imageUrl`.

use hekto_core::ProductTag;

/// Fields selected for every product.
pub const PRODUCT_PROJECTION: &str = r#"{
  _id,
  title,
  price,
  originalprice,
  "imageUrl": coalesce(image.asset->url, imageurl.asset->url),
  description,
  colors,
  reviews,
  material,
  categories,
  dimensions,
  badge,
  tags,
  code
}"#;

/// Every product, for the shop grid and category picks.
#[must_use]
pub fn all_products() -> String {
    format!(r#"*[_type == "product"]{PRODUCT_PROJECTION}"#)
}

/// One product by document id. Takes the `$id` parameter.
#[must_use]
pub fn product_by_id() -> String {
    format!(r#"*[_type == "product" && _id == $id][0]{PRODUCT_PROJECTION}"#)
}

/// Products for one "latest products" tab. Takes the `$tag` parameter.
///
/// Ordering and slices differ per tab.
#[must_use]
pub fn products_tagged(tag: ProductTag) -> String {
    let order_and_slice = match tag {
        ProductTag::NewArrival => "| order(_createdAt desc)[1..9]",
        ProductTag::BestSeller => "| order(salesCount desc)",
        ProductTag::Trending => "| order(_createdAt desc)[0..6]",
        ProductTag::Featured => "| order(_createdAt desc)[13..19]",
    };
    format!(r#"*[_type == "product" && $tag in tags] {order_and_slice}{PRODUCT_PROJECTION}"#)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_by_id_uses_parameter() {
        let query = product_by_id();
        assert!(query.contains("_id == $id][0]"));
        assert!(query.contains("\"imageUrl\""));
    }

    #[test]
    fn test_tagged_queries_slice_per_tab() {
        assert!(products_tagged(ProductTag::NewArrival).contains("[1..9]"));
        assert!(products_tagged(ProductTag::BestSeller).contains("order(salesCount desc)"));
        assert!(products_tagged(ProductTag::Featured).contains("[13..19]"));
        assert!(products_tagged(ProductTag::Trending).contains("$tag in tags"));
    }
}
