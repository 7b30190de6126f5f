use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{NaiveDate, NaiveDateTime};

use crate::users::models::UserSummary;
use crate::Id;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CategoryDocument {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub subcategory_count: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SubCategory {
    pub category_id: Id,
    pub name: String,
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SubCategoryDocument {
    pub id: Id,
    pub category_id: Id,
    pub category_name: String,
    pub name: String,
    pub description: String,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Shop {
    pub owner_id: Id,
    pub company_name: String,
    pub brand_name: String,
    pub tax_id: String,
    pub legal_certificate: String,
    pub director_name: String,
    /// Phone number or email address, as registered.
    pub contact: String,
    pub business_address: String,
    pub logo: Option<String>,
    pub physical_branches: String,
    pub passport_series: String,
    pub birth_date: Option<NaiveDate>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location: String,
    pub registered_until: Option<NaiveDate>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ShopDocument {
    pub id: Id,
    #[serde(flatten)]
    pub shop: Shop,
    pub owner: UserSummary,
    pub product_count: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Product {
    pub shop_id: Id,
    pub category_id: Option<Id>,
    pub subcategory_id: Option<Id>,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub has_discount: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProductDocument {
    pub id: Id,
    pub shop_id: Id,
    pub shop_name: String,
    pub category_id: Option<Id>,
    pub category_name: Option<String>,
    pub subcategory_id: Option<Id>,
    pub subcategory_name: Option<String>,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub has_discount: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ProductDocument {
    /// The price a buyer pays right now. `has_discount` is the source of
    /// truth; a set flag guarantees a stored discount price.
    pub fn effective_price(&self) -> f64 {
        if self.has_discount {
            self.discount_price.unwrap_or(self.price)
        } else {
            self.price
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Advertisement {
    pub product_id: Id,
    pub description: String,
    pub image: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AdvertisementDocument {
    pub id: Id,
    pub product_id: Id,
    pub product_name: String,
    pub description: String,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
}
