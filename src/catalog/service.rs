use std::fmt::Display;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use super::models::{
    Advertisement, AdvertisementDocument, Category, CategoryDocument, Product, ProductDocument,
    Shop, ShopDocument, SubCategory, SubCategoryDocument,
};
use crate::utils::query::Query;
use crate::Id;

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct CategoryQueryOptions {
    pub search: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub enum CategoryOrderField {
    Name,
}

pub type CategoryQuery = Query<CategoryQueryOptions, CategoryOrderField>;

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct SubCategoryQueryOptions {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub category_id: Option<Id>,
    pub search: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub enum SubCategoryOrderField {
    Name,
}

pub type SubCategoryQuery = Query<SubCategoryQueryOptions, SubCategoryOrderField>;

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ShopQueryOptions {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub owner_id: Option<Id>,
    /// Substring over company name, brand name and business address.
    pub search: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub enum ShopOrderField {
    CreatedAt,
    CompanyName,
}

pub type ShopQuery = Query<ShopQueryOptions, ShopOrderField>;

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ProductQueryOptions {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub shop_id: Option<Id>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub category_id: Option<Id>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub subcategory_id: Option<Id>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub has_discount: Option<bool>,
    /// Case-insensitive substring over name and description.
    pub search: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub enum ProductOrderField {
    CreatedAt,
    Price,
    Name,
}

pub type ProductQuery = Query<ProductQueryOptions, ProductOrderField>;

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct AdvertisementQueryOptions {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub product_id: Option<Id>,
    pub search: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub enum AdvertisementOrderField {
    CreatedAt,
}

pub type AdvertisementQuery = Query<AdvertisementQueryOptions, AdvertisementOrderField>;

#[async_trait]
pub trait CatalogService {
    async fn create_category(&self, category: &Category) -> Result<CategoryDocument, CatalogError>;
    async fn read_category(&self, id: Id) -> Result<CategoryDocument, CatalogError>;
    async fn update_category(
        &self,
        id: Id,
        category: &Category,
    ) -> Result<CategoryDocument, CatalogError>;
    async fn delete_category(&self, id: Id) -> Result<(), CatalogError>;
    async fn list_categories(
        &self,
        query: &CategoryQuery,
    ) -> Result<Vec<CategoryDocument>, CatalogError>;

    async fn create_subcategory(
        &self,
        subcategory: &SubCategory,
    ) -> Result<SubCategoryDocument, CatalogError>;
    async fn read_subcategory(&self, id: Id) -> Result<SubCategoryDocument, CatalogError>;
    async fn update_subcategory(
        &self,
        id: Id,
        subcategory: &SubCategory,
    ) -> Result<SubCategoryDocument, CatalogError>;
    async fn delete_subcategory(&self, id: Id) -> Result<(), CatalogError>;
    async fn list_subcategories(
        &self,
        query: &SubCategoryQuery,
    ) -> Result<Vec<SubCategoryDocument>, CatalogError>;

    async fn create_shop(&self, shop: &Shop) -> Result<ShopDocument, CatalogError>;
    async fn read_shop(&self, id: Id) -> Result<ShopDocument, CatalogError>;
    async fn update_shop(&self, id: Id, shop: &Shop) -> Result<ShopDocument, CatalogError>;
    async fn delete_shop(&self, id: Id) -> Result<(), CatalogError>;
    async fn list_shops(&self, query: &ShopQuery) -> Result<Vec<ShopDocument>, CatalogError>;

    async fn create_product(&self, product: &Product) -> Result<ProductDocument, CatalogError>;
    async fn read_product(&self, id: Id) -> Result<ProductDocument, CatalogError>;
    async fn update_product(
        &self,
        id: Id,
        product: &Product,
    ) -> Result<ProductDocument, CatalogError>;
    async fn delete_product(&self, id: Id) -> Result<(), CatalogError>;
    async fn list_products(
        &self,
        query: &ProductQuery,
    ) -> Result<Vec<ProductDocument>, CatalogError>;

    async fn create_advertisement(
        &self,
        advertisement: &Advertisement,
    ) -> Result<AdvertisementDocument, CatalogError>;
    async fn read_advertisement(&self, id: Id) -> Result<AdvertisementDocument, CatalogError>;
    async fn update_advertisement(
        &self,
        id: Id,
        advertisement: &Advertisement,
    ) -> Result<AdvertisementDocument, CatalogError>;
    async fn delete_advertisement(&self, id: Id) -> Result<(), CatalogError>;
    async fn list_advertisements(
        &self,
        query: &AdvertisementQuery,
    ) -> Result<Vec<AdvertisementDocument>, CatalogError>;
}

impl Product {
    /// `has_discount` is the source of truth for discount state: a set flag
    /// requires a discount price, a cleared flag drops whatever price was
    /// sent. Prices are non-negative.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.price < 0.0 {
            return Err(CatalogError::Validation(
                "price must be non-negative".into(),
            ));
        }
        if let Some(discount) = self.discount_price {
            if discount < 0.0 {
                return Err(CatalogError::Validation(
                    "discount price must be non-negative".into(),
                ));
            }
        }
        if self.has_discount && self.discount_price.is_none() {
            return Err(CatalogError::Validation(
                "discount price required when discount is set".into(),
            ));
        }
        Ok(())
    }

    pub fn stored_discount_price(&self) -> Option<f64> {
        if self.has_discount {
            self.discount_price
        } else {
            None
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum CatalogError {
    StorageError,
    EntryNotFound(String),
    Validation(String),
    MappingError,
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::StorageError => write!(f, "storage error"),
            CatalogError::EntryNotFound(id) => write!(f, "entry {} not found", id),
            CatalogError::Validation(reason) => write!(f, "{}", reason),
            CatalogError::MappingError => write!(f, "corrupted catalog row"),
        }
    }
}

impl std::error::Error for CatalogError {}
