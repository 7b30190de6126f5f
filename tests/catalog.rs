mod fixtures;
mod utils;

use fixtures::{
    fake_advertisement, fake_category, fake_discounted_product, fake_product, fake_shop,
    fake_subcategory, fake_user,
};
use utils::AnyHow;

use marketplace::catalog::models::Category;
use marketplace::catalog::service::{
    CatalogError, CatalogService, CategoryQuery, ProductOrderField, ProductQuery, ShopQuery,
    SubCategoryQuery,
};
use marketplace::utils::query::OrderBy;

#[cfg(test)]
pub mod category_test {
    use super::*;

    #[async_std::test]
    async fn crud_roundtrip() -> Result<(), AnyHow> {
        let (_users, catalog, _engagement) = utils::services().await?;

        let category = fake_category();
        let doc = catalog.create_category(&category).await?;
        assert_eq!(doc.name, category.name);
        assert_eq!(doc.subcategory_count, 0);

        let read = catalog.read_category(doc.id).await?;
        assert_eq!(read.name, category.name);

        let renamed = Category {
            name: "renamed".into(),
            description: category.description.clone(),
        };
        let updated = catalog.update_category(doc.id, &renamed).await?;
        assert_eq!(updated.name, "renamed");

        catalog.delete_category(doc.id).await?;
        let missing = catalog.read_category(doc.id).await;
        assert!(matches!(
            missing.unwrap_err(),
            CatalogError::EntryNotFound(_)
        ));
        Ok(())
    }

    #[async_std::test]
    async fn listing_defaults_to_name_order() -> Result<(), AnyHow> {
        let (_users, catalog, _engagement) = utils::services().await?;

        for name in ["pantry", "apparel", "garden"] {
            catalog
                .create_category(&Category {
                    name: name.into(),
                    description: String::new(),
                })
                .await?;
        }

        let listed = catalog.list_categories(&CategoryQuery::default()).await?;
        let names: Vec<_> = listed.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["apparel", "garden", "pantry"]);
        Ok(())
    }

    #[async_std::test]
    async fn subcategory_count_is_derived() -> Result<(), AnyHow> {
        let (_users, catalog, _engagement) = utils::services().await?;

        let category = catalog.create_category(&fake_category()).await?;
        catalog
            .create_subcategory(&fake_subcategory(category.id))
            .await?;
        catalog
            .create_subcategory(&fake_subcategory(category.id))
            .await?;

        let read = catalog.read_category(category.id).await?;
        assert_eq!(read.subcategory_count, 2);
        Ok(())
    }
}

#[cfg(test)]
pub mod subcategory_test {
    use super::*;

    #[async_std::test]
    async fn carries_parent_name() -> Result<(), AnyHow> {
        let (_users, catalog, _engagement) = utils::services().await?;

        let category = catalog.create_category(&fake_category()).await?;
        let doc = catalog
            .create_subcategory(&fake_subcategory(category.id))
            .await?;
        assert_eq!(doc.category_id, category.id);
        assert_eq!(doc.category_name, category.name);
        Ok(())
    }

    #[async_std::test]
    async fn create_fails_without_parent() -> Result<(), AnyHow> {
        let (_users, catalog, _engagement) = utils::services().await?;

        let result = catalog.create_subcategory(&fake_subcategory(1)).await;
        assert!(matches!(
            result.unwrap_err(),
            CatalogError::EntryNotFound(_)
        ));
        Ok(())
    }

    #[async_std::test]
    async fn list_filters_by_category() -> Result<(), AnyHow> {
        let (_users, catalog, _engagement) = utils::services().await?;

        let first = catalog.create_category(&fake_category()).await?;
        let second = catalog.create_category(&fake_category()).await?;
        catalog.create_subcategory(&fake_subcategory(first.id)).await?;
        catalog
            .create_subcategory(&fake_subcategory(second.id))
            .await?;

        let mut query = SubCategoryQuery::default();
        query.options.category_id = Some(first.id);
        let listed = catalog.list_subcategories(&query).await?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].category_id, first.id);
        Ok(())
    }
}

#[cfg(test)]
pub mod shop_test {
    use super::*;

    #[async_std::test]
    async fn document_embeds_owner_and_count() -> Result<(), AnyHow> {
        let (users, catalog, _engagement) = utils::services().await?;

        let owner = users.create(&fake_user()).await?.user;
        let shop = catalog.create_shop(&fake_shop(owner.id)).await?;
        assert_eq!(shop.owner.id, owner.id);
        assert_eq!(shop.owner.first_name, owner.first_name);
        assert_eq!(shop.product_count, 0);

        catalog
            .create_product(&fake_product(shop.id, None, None))
            .await?;
        let read = catalog.read_shop(shop.id).await?;
        assert_eq!(read.product_count, 1);
        Ok(())
    }

    #[async_std::test]
    async fn create_fails_without_owner() -> Result<(), AnyHow> {
        let (_users, catalog, _engagement) = utils::services().await?;

        let result = catalog.create_shop(&fake_shop(1)).await;
        assert!(matches!(
            result.unwrap_err(),
            CatalogError::EntryNotFound(_)
        ));
        Ok(())
    }

    #[async_std::test]
    async fn list_filters_by_owner() -> Result<(), AnyHow> {
        let (users, catalog, _engagement) = utils::services().await?;

        let first = users.create(&fake_user()).await?.user;
        let second = users.create(&fake_user()).await?.user;
        catalog.create_shop(&fake_shop(first.id)).await?;
        catalog.create_shop(&fake_shop(first.id)).await?;
        catalog.create_shop(&fake_shop(second.id)).await?;

        let mut query = ShopQuery::default();
        query.options.owner_id = Some(first.id);
        let listed = catalog.list_shops(&query).await?;
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|s| s.shop.owner_id == first.id));
        Ok(())
    }
}

#[cfg(test)]
pub mod product_test {
    use super::*;

    #[async_std::test]
    async fn discount_flag_requires_discount_price() -> Result<(), AnyHow> {
        let (users, catalog, _engagement) = utils::services().await?;

        let owner = users.create(&fake_user()).await?.user;
        let shop = catalog.create_shop(&fake_shop(owner.id)).await?;

        let mut product = fake_product(shop.id, None, None);
        product.has_discount = true;
        product.discount_price = None;
        let result = catalog.create_product(&product).await;
        assert!(matches!(result.unwrap_err(), CatalogError::Validation(_)));
        Ok(())
    }

    #[async_std::test]
    async fn cleared_flag_drops_sent_discount_price() -> Result<(), AnyHow> {
        let (users, catalog, _engagement) = utils::services().await?;

        let owner = users.create(&fake_user()).await?.user;
        let shop = catalog.create_shop(&fake_shop(owner.id)).await?;

        let mut product = fake_product(shop.id, None, None);
        product.has_discount = false;
        product.discount_price = Some(50.0);
        let doc = catalog.create_product(&product).await?;
        assert!(!doc.has_discount);
        assert_eq!(doc.discount_price, None);
        Ok(())
    }

    #[async_std::test]
    async fn negative_price_is_rejected() -> Result<(), AnyHow> {
        let (users, catalog, _engagement) = utils::services().await?;

        let owner = users.create(&fake_user()).await?.user;
        let shop = catalog.create_shop(&fake_shop(owner.id)).await?;

        let mut product = fake_product(shop.id, None, None);
        product.price = -1.0;
        let result = catalog.create_product(&product).await;
        assert!(matches!(result.unwrap_err(), CatalogError::Validation(_)));
        Ok(())
    }

    #[async_std::test]
    async fn discounted_document_exposes_effective_price() -> Result<(), AnyHow> {
        let (users, catalog, _engagement) = utils::services().await?;

        let owner = users.create(&fake_user()).await?.user;
        let shop = catalog.create_shop(&fake_shop(owner.id)).await?;

        let doc = catalog
            .create_product(&fake_discounted_product(shop.id, None))
            .await?;
        assert!(doc.has_discount);
        assert_eq!(doc.discount_price, Some(80.0));
        assert_eq!(doc.effective_price(), 80.0);
        Ok(())
    }

    #[async_std::test]
    async fn filters_compose_conjunctively() -> Result<(), AnyHow> {
        let (users, catalog, _engagement) = utils::services().await?;

        let owner = users.create(&fake_user()).await?.user;
        let shop_a = catalog.create_shop(&fake_shop(owner.id)).await?;
        let shop_b = catalog.create_shop(&fake_shop(owner.id)).await?;
        let category = catalog.create_category(&fake_category()).await?;

        catalog
            .create_product(&fake_product(shop_a.id, Some(category.id), None))
            .await?;
        catalog
            .create_product(&fake_discounted_product(shop_a.id, Some(category.id)))
            .await?;
        catalog
            .create_product(&fake_discounted_product(shop_b.id, None))
            .await?;

        let mut query = ProductQuery::default();
        query.options.shop_id = Some(shop_a.id);
        assert_eq!(catalog.list_products(&query).await?.len(), 2);

        query.options.has_discount = Some(true);
        let discounted_in_a = catalog.list_products(&query).await?;
        assert_eq!(discounted_in_a.len(), 1);
        assert_eq!(discounted_in_a[0].shop_id, shop_a.id);
        assert!(discounted_in_a[0].has_discount);

        let mut by_category = ProductQuery::default();
        by_category.options.category_id = Some(category.id);
        assert_eq!(catalog.list_products(&by_category).await?.len(), 2);
        Ok(())
    }

    #[async_std::test]
    async fn search_is_case_insensitive_over_name_and_description() -> Result<(), AnyHow> {
        let (users, catalog, _engagement) = utils::services().await?;

        let owner = users.create(&fake_user()).await?.user;
        let shop = catalog.create_shop(&fake_shop(owner.id)).await?;

        let mut product = fake_product(shop.id, None, None);
        product.name = "Thermal Carafe".into();
        product.description = "Keeps coffee warm for hours".into();
        catalog.create_product(&product).await?;

        let mut other = fake_product(shop.id, None, None);
        other.name = "Ceramic Mug".into();
        other.description = "A plain mug".into();
        catalog.create_product(&other).await?;

        let mut query = ProductQuery::default();
        query.options.search = Some("THERMAL".into());
        assert_eq!(catalog.list_products(&query).await?.len(), 1);

        query.options.search = Some("coffee".into());
        assert_eq!(catalog.list_products(&query).await?.len(), 1);

        query.options.search = Some("MUG".into());
        assert_eq!(catalog.list_products(&query).await?.len(), 1);

        query.options.search = Some("stainless".into());
        assert!(catalog.list_products(&query).await?.is_empty());
        Ok(())
    }

    #[async_std::test]
    async fn ordering_by_price_and_creation() -> Result<(), AnyHow> {
        let (users, catalog, _engagement) = utils::services().await?;

        let owner = users.create(&fake_user()).await?.user;
        let shop = catalog.create_shop(&fake_shop(owner.id)).await?;

        let mut ids = Vec::new();
        for price in [30.0, 10.0, 20.0] {
            let mut product = fake_product(shop.id, None, None);
            product.price = price;
            ids.push(catalog.create_product(&product).await?.id);
        }

        let mut by_price = ProductQuery::default();
        by_price.order_by = Some(OrderBy::asc(ProductOrderField::Price));
        let listed = catalog.list_products(&by_price).await?;
        let prices: Vec<_> = listed.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![10.0, 20.0, 30.0]);

        let mut newest_first = ProductQuery::default();
        newest_first.order_by = Some(OrderBy::desc(ProductOrderField::CreatedAt));
        let listed = catalog.list_products(&newest_first).await?;
        let listed_ids: Vec<_> = listed.iter().map(|p| p.id).collect();
        let mut expected = ids.clone();
        expected.reverse();
        assert_eq!(listed_ids, expected);

        // Default listing order is also newest first.
        let default_listed = catalog.list_products(&ProductQuery::default()).await?;
        let default_ids: Vec<_> = default_listed.iter().map(|p| p.id).collect();
        assert_eq!(default_ids, expected);
        Ok(())
    }

    #[async_std::test]
    async fn deleting_category_detaches_products() -> Result<(), AnyHow> {
        let (users, catalog, _engagement) = utils::services().await?;

        let owner = users.create(&fake_user()).await?.user;
        let shop = catalog.create_shop(&fake_shop(owner.id)).await?;
        let category = catalog.create_category(&fake_category()).await?;
        let product = catalog
            .create_product(&fake_product(shop.id, Some(category.id), None))
            .await?;
        assert_eq!(product.category_name.as_deref(), Some(category.name.as_str()));

        catalog.delete_category(category.id).await?;

        let read = catalog.read_product(product.id).await?;
        assert_eq!(read.category_id, None);
        assert_eq!(read.category_name, None);
        Ok(())
    }

    #[async_std::test]
    async fn deleting_shop_cascades_products() -> Result<(), AnyHow> {
        let (users, catalog, _engagement) = utils::services().await?;

        let owner = users.create(&fake_user()).await?.user;
        let shop = catalog.create_shop(&fake_shop(owner.id)).await?;
        let product = catalog
            .create_product(&fake_product(shop.id, None, None))
            .await?;

        catalog.delete_shop(shop.id).await?;

        let missing = catalog.read_product(product.id).await;
        assert!(matches!(
            missing.unwrap_err(),
            CatalogError::EntryNotFound(_)
        ));
        Ok(())
    }

    #[async_std::test]
    async fn create_fails_without_shop() -> Result<(), AnyHow> {
        let (_users, catalog, _engagement) = utils::services().await?;

        let result = catalog.create_product(&fake_product(1, None, None)).await;
        assert!(matches!(
            result.unwrap_err(),
            CatalogError::EntryNotFound(_)
        ));
        Ok(())
    }
}

#[cfg(test)]
pub mod advertisement_test {
    use super::*;

    #[async_std::test]
    async fn carries_product_name() -> Result<(), AnyHow> {
        let (users, catalog, _engagement) = utils::services().await?;

        let owner = users.create(&fake_user()).await?.user;
        let shop = catalog.create_shop(&fake_shop(owner.id)).await?;
        let product = catalog
            .create_product(&fake_product(shop.id, None, None))
            .await?;

        let ad = catalog
            .create_advertisement(&fake_advertisement(product.id))
            .await?;
        assert_eq!(ad.product_id, product.id);
        assert_eq!(ad.product_name, product.name);
        Ok(())
    }

    #[async_std::test]
    async fn create_fails_without_product() -> Result<(), AnyHow> {
        let (_users, catalog, _engagement) = utils::services().await?;

        let result = catalog.create_advertisement(&fake_advertisement(1)).await;
        assert!(matches!(
            result.unwrap_err(),
            CatalogError::EntryNotFound(_)
        ));
        Ok(())
    }

    #[async_std::test]
    async fn deleting_product_cascades_advertisements() -> Result<(), AnyHow> {
        let (users, catalog, _engagement) = utils::services().await?;

        let owner = users.create(&fake_user()).await?.user;
        let shop = catalog.create_shop(&fake_shop(owner.id)).await?;
        let product = catalog
            .create_product(&fake_product(shop.id, None, None))
            .await?;
        let ad = catalog
            .create_advertisement(&fake_advertisement(product.id))
            .await?;

        catalog.delete_product(product.id).await?;

        let missing = catalog.read_advertisement(ad.id).await;
        assert!(matches!(
            missing.unwrap_err(),
            CatalogError::EntryNotFound(_)
        ));
        Ok(())
    }
}
