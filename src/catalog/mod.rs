pub mod backend;
pub mod models;
pub mod service;

pub use backend::CatalogSqlService;
pub use models::{
    Advertisement, AdvertisementDocument, Category, CategoryDocument, Product, ProductDocument,
    Shop, ShopDocument, SubCategory, SubCategoryDocument,
};
pub use service::{
    AdvertisementOrderField, AdvertisementQuery, AdvertisementQueryOptions, CatalogError,
    CatalogService, CategoryOrderField, CategoryQuery, CategoryQueryOptions, ProductOrderField,
    ProductQuery, ProductQueryOptions, ShopOrderField, ShopQuery, ShopQueryOptions,
    SubCategoryOrderField, SubCategoryQuery, SubCategoryQueryOptions,
};
