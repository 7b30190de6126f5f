use async_trait::async_trait;
use sea_query::{
    Cond, Expr, Iden, Order as OrderSql, Query as Qsql, SelectStatement,
    SqliteQueryBuilder as QueryBuilder,
};
use sqlx::types::chrono::{NaiveDate, NaiveDateTime};
use sqlx::{FromRow, SqlitePool as Pool};

use super::models::{
    Advertisement, AdvertisementDocument, Category, CategoryDocument, Product, ProductDocument,
    Shop, ShopDocument, SubCategory, SubCategoryDocument,
};
use super::service::{
    AdvertisementOrderField, AdvertisementQuery, CatalogError, CatalogService, CategoryOrderField,
    CategoryQuery, ProductOrderField, ProductQuery, ShopOrderField, ShopQuery,
    SubCategoryOrderField, SubCategoryQuery,
};
use crate::users::backend::UserSchema;
use crate::users::models::UserSummary;
use crate::Id;

sea_query::sea_query_driver_sqlite!();
use sea_query_driver_sqlite::bind_query_as;

#[derive(Clone)]
pub struct CatalogSqlService {
    pool: Pool,
}

impl CatalogSqlService {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn exists_in(&self, table: impl Iden, id: Id) -> Result<bool, CatalogError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| CatalogError::StorageError)?;

        let sql = format!(
            "SELECT COUNT(1) AS count FROM {} WHERE id = ?",
            table.to_string()
        );
        let row: Count = sqlx::query_as(sql.as_str())
            .bind(id)
            .fetch_one(&mut conn)
            .await
            .map_err(|_| CatalogError::StorageError)?;

        Ok(row.count != 0)
    }

    async fn require(&self, table: impl Iden, id: Id) -> Result<(), CatalogError> {
        if !self.exists_in(table, id).await? {
            return Err(CatalogError::EntryNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn fetch_opt_as<T>(&self, select: &SelectStatement) -> Result<Option<T>, CatalogError>
    where
        T: for<'r> FromRow<'r, sqlx::sqlite::SqliteRow> + Send + Unpin,
    {
        let (sql, values) = select.build(QueryBuilder);
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| CatalogError::StorageError)?;

        bind_query_as(sqlx::query_as(&sql), &values)
            .fetch_optional(&mut conn)
            .await
            .map_err(|_| CatalogError::StorageError)
    }

    async fn fetch_all_as<T>(&self, select: &SelectStatement) -> Result<Vec<T>, CatalogError>
    where
        T: for<'r> FromRow<'r, sqlx::sqlite::SqliteRow> + Send + Unpin,
    {
        let (sql, values) = select.build(QueryBuilder);
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| CatalogError::StorageError)?;

        bind_query_as(sqlx::query_as(&sql), &values)
            .fetch_all(&mut conn)
            .await
            .map_err(|_| CatalogError::StorageError)
    }

    async fn delete_row(&self, table: impl Iden, id: Id) -> Result<(), CatalogError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| CatalogError::StorageError)?;

        let sql = format!("DELETE FROM {} WHERE id = ?", table.to_string());
        let done = sqlx::query(sql.as_str())
            .bind(id)
            .execute(&mut conn)
            .await
            .map_err(|_| CatalogError::StorageError)?;

        if done.rows_affected() == 0 {
            return Err(CatalogError::EntryNotFound(id.to_string()));
        }
        Ok(())
    }
}

fn category_select() -> SelectStatement {
    Qsql::select()
        .expr(Expr::cust("categories.*"))
        .expr(Expr::cust(
            "(SELECT COUNT(1) FROM subcategories \
              WHERE subcategories.category_id = categories.id) AS subcategory_count",
        ))
        .from(CategorySchema::Table)
        .take()
}

fn subcategory_select() -> SelectStatement {
    Qsql::select()
        .expr(Expr::cust("subcategories.*"))
        .expr(Expr::cust("categories.name AS category_name"))
        .from(SubCategorySchema::Table)
        .inner_join(
            CategorySchema::Table,
            Expr::tbl(CategorySchema::Table, CategorySchema::Id)
                .equals(SubCategorySchema::Table, SubCategorySchema::CategoryId),
        )
        .take()
}

fn shop_select() -> SelectStatement {
    Qsql::select()
        .expr(Expr::cust("shops.*"))
        .expr(Expr::cust("users.first_name AS owner_first_name"))
        .expr(Expr::cust("users.last_name AS owner_last_name"))
        .expr(Expr::cust("users.phone AS owner_phone"))
        .expr(Expr::cust("users.image AS owner_image"))
        .expr(Expr::cust(
            "(SELECT COUNT(1) FROM products \
              WHERE products.shop_id = shops.id) AS product_count",
        ))
        .from(ShopSchema::Table)
        .inner_join(
            UserSchema::Table,
            Expr::tbl(UserSchema::Table, UserSchema::Id)
                .equals(ShopSchema::Table, ShopSchema::OwnerId),
        )
        .take()
}

fn product_select() -> SelectStatement {
    Qsql::select()
        .expr(Expr::cust("products.*"))
        .expr(Expr::cust("shops.company_name AS shop_name"))
        .expr(Expr::cust("categories.name AS category_name"))
        .expr(Expr::cust("subcategories.name AS subcategory_name"))
        .from(ProductSchema::Table)
        .inner_join(
            ShopSchema::Table,
            Expr::tbl(ShopSchema::Table, ShopSchema::Id)
                .equals(ProductSchema::Table, ProductSchema::ShopId),
        )
        .left_join(
            CategorySchema::Table,
            Expr::tbl(CategorySchema::Table, CategorySchema::Id)
                .equals(ProductSchema::Table, ProductSchema::CategoryId),
        )
        .left_join(
            SubCategorySchema::Table,
            Expr::tbl(SubCategorySchema::Table, SubCategorySchema::Id)
                .equals(ProductSchema::Table, ProductSchema::SubCategoryId),
        )
        .take()
}

fn advertisement_select() -> SelectStatement {
    Qsql::select()
        .expr(Expr::cust("advertisements.*"))
        .expr(Expr::cust("products.name AS product_name"))
        .from(AdvertisementSchema::Table)
        .inner_join(
            ProductSchema::Table,
            Expr::tbl(ProductSchema::Table, ProductSchema::Id)
                .equals(AdvertisementSchema::Table, AdvertisementSchema::ProductId),
        )
        .take()
}

#[async_trait]
impl CatalogService for CatalogSqlService {
    async fn create_category(&self, category: &Category) -> Result<CategoryDocument, CatalogError> {
        let id = rand::random::<Id>();
        let sql = format!(
            "INSERT INTO {} (id, name, description, created_at) VALUES (?, ?, ?, ?)",
            CategorySchema::Table.to_string()
        );

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| CatalogError::StorageError)?;
        sqlx::query(sql.as_str())
            .bind(id)
            .bind(category.name.as_str())
            .bind(category.description.as_str())
            .bind(crate::utils::now())
            .execute(&mut conn)
            .await
            .map_err(|_| CatalogError::StorageError)?;
        drop(conn);

        self.read_category(id).await
    }

    async fn read_category(&self, id: Id) -> Result<CategoryDocument, CatalogError> {
        let select = category_select()
            .and_where(Expr::cust_with_values("categories.id = ?", vec![id]))
            .take();
        let row: Option<CategoryRow> = self.fetch_opt_as(&select).await?;
        row.map(CategoryRow::into_document)
            .ok_or_else(|| CatalogError::EntryNotFound(id.to_string()))
    }

    async fn update_category(
        &self,
        id: Id,
        category: &Category,
    ) -> Result<CategoryDocument, CatalogError> {
        let sql = format!(
            "UPDATE {} SET name = ?, description = ? WHERE id = ?",
            CategorySchema::Table.to_string()
        );

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| CatalogError::StorageError)?;
        let done = sqlx::query(sql.as_str())
            .bind(category.name.as_str())
            .bind(category.description.as_str())
            .bind(id)
            .execute(&mut conn)
            .await
            .map_err(|_| CatalogError::StorageError)?;
        drop(conn);

        if done.rows_affected() == 0 {
            return Err(CatalogError::EntryNotFound(id.to_string()));
        }
        self.read_category(id).await
    }

    async fn delete_category(&self, id: Id) -> Result<(), CatalogError> {
        self.delete_row(CategorySchema::Table, id).await
    }

    async fn list_categories(
        &self,
        query: &CategoryQuery,
    ) -> Result<Vec<CategoryDocument>, CatalogError> {
        let (order_col, order_dir) = match query.order_by.as_ref() {
            Some(order_by) => (
                match order_by.field {
                    CategoryOrderField::Name => "categories.name",
                },
                OrderSql::from(order_by.direction),
            ),
            None => ("categories.name", OrderSql::Asc),
        };

        let select = category_select()
            .conditions(
                query.options.search.is_some(),
                |q| {
                    let needle = like_needle(query.options.search.as_ref().unwrap());
                    q.cond_where(
                        Cond::any()
                            .add(Expr::cust_with_values(
                                "LOWER(categories.name) LIKE ?",
                                vec![needle.clone()],
                            ))
                            .add(Expr::cust_with_values(
                                "LOWER(categories.description) LIKE ?",
                                vec![needle],
                            )),
                    );
                },
                |_| {},
            )
            .order_by_expr(Expr::cust(order_col), order_dir)
            .conditions(
                query.limit.is_some(),
                |q| {
                    q.limit(query.limit.unwrap() as u64);
                },
                |_| {},
            )
            .take();

        let rows: Vec<CategoryRow> = self.fetch_all_as(&select).await?;
        Ok(rows.into_iter().map(CategoryRow::into_document).collect())
    }

    async fn create_subcategory(
        &self,
        subcategory: &SubCategory,
    ) -> Result<SubCategoryDocument, CatalogError> {
        self.require(CategorySchema::Table, subcategory.category_id)
            .await?;

        let id = rand::random::<Id>();
        let sql = format!(
            "INSERT INTO {} (id, category_id, name, description, created_at) \
             VALUES (?, ?, ?, ?, ?)",
            SubCategorySchema::Table.to_string()
        );

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| CatalogError::StorageError)?;
        sqlx::query(sql.as_str())
            .bind(id)
            .bind(subcategory.category_id)
            .bind(subcategory.name.as_str())
            .bind(subcategory.description.as_str())
            .bind(crate::utils::now())
            .execute(&mut conn)
            .await
            .map_err(|_| CatalogError::StorageError)?;
        drop(conn);

        self.read_subcategory(id).await
    }

    async fn read_subcategory(&self, id: Id) -> Result<SubCategoryDocument, CatalogError> {
        let select = subcategory_select()
            .and_where(Expr::cust_with_values("subcategories.id = ?", vec![id]))
            .take();
        let row: Option<SubCategoryRow> = self.fetch_opt_as(&select).await?;
        row.map(SubCategoryRow::into_document)
            .ok_or_else(|| CatalogError::EntryNotFound(id.to_string()))
    }

    async fn update_subcategory(
        &self,
        id: Id,
        subcategory: &SubCategory,
    ) -> Result<SubCategoryDocument, CatalogError> {
        self.require(CategorySchema::Table, subcategory.category_id)
            .await?;

        let sql = format!(
            "UPDATE {} SET category_id = ?, name = ?, description = ? WHERE id = ?",
            SubCategorySchema::Table.to_string()
        );

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| CatalogError::StorageError)?;
        let done = sqlx::query(sql.as_str())
            .bind(subcategory.category_id)
            .bind(subcategory.name.as_str())
            .bind(subcategory.description.as_str())
            .bind(id)
            .execute(&mut conn)
            .await
            .map_err(|_| CatalogError::StorageError)?;
        drop(conn);

        if done.rows_affected() == 0 {
            return Err(CatalogError::EntryNotFound(id.to_string()));
        }
        self.read_subcategory(id).await
    }

    async fn delete_subcategory(&self, id: Id) -> Result<(), CatalogError> {
        self.delete_row(SubCategorySchema::Table, id).await
    }

    async fn list_subcategories(
        &self,
        query: &SubCategoryQuery,
    ) -> Result<Vec<SubCategoryDocument>, CatalogError> {
        let (order_col, order_dir) = match query.order_by.as_ref() {
            Some(order_by) => (
                match order_by.field {
                    SubCategoryOrderField::Name => "subcategories.name",
                },
                OrderSql::from(order_by.direction),
            ),
            None => ("subcategories.name", OrderSql::Asc),
        };

        let select = subcategory_select()
            .conditions(
                query.options.category_id.is_some(),
                |q| {
                    q.and_where(Expr::cust_with_values(
                        "subcategories.category_id = ?",
                        vec![query.options.category_id.unwrap()],
                    ));
                },
                |_| {},
            )
            .conditions(
                query.options.search.is_some(),
                |q| {
                    let needle = like_needle(query.options.search.as_ref().unwrap());
                    q.cond_where(
                        Cond::any()
                            .add(Expr::cust_with_values(
                                "LOWER(subcategories.name) LIKE ?",
                                vec![needle.clone()],
                            ))
                            .add(Expr::cust_with_values(
                                "LOWER(subcategories.description) LIKE ?",
                                vec![needle],
                            )),
                    );
                },
                |_| {},
            )
            .order_by_expr(Expr::cust(order_col), order_dir)
            .conditions(
                query.limit.is_some(),
                |q| {
                    q.limit(query.limit.unwrap() as u64);
                },
                |_| {},
            )
            .take();

        let rows: Vec<SubCategoryRow> = self.fetch_all_as(&select).await?;
        Ok(rows.into_iter().map(SubCategoryRow::into_document).collect())
    }

    async fn create_shop(&self, shop: &Shop) -> Result<ShopDocument, CatalogError> {
        self.require(UserSchema::Table, shop.owner_id).await?;

        let id = rand::random::<Id>();
        let sql = format!(
            "INSERT INTO {} (id, owner_id, company_name, brand_name, tax_id, \
             legal_certificate, director_name, contact, business_address, logo, \
             physical_branches, passport_series, birth_date, latitude, longitude, \
             location, registered_until, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            ShopSchema::Table.to_string()
        );

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| CatalogError::StorageError)?;
        sqlx::query(sql.as_str())
            .bind(id)
            .bind(shop.owner_id)
            .bind(shop.company_name.as_str())
            .bind(shop.brand_name.as_str())
            .bind(shop.tax_id.as_str())
            .bind(shop.legal_certificate.as_str())
            .bind(shop.director_name.as_str())
            .bind(shop.contact.as_str())
            .bind(shop.business_address.as_str())
            .bind(shop.logo.as_deref())
            .bind(shop.physical_branches.as_str())
            .bind(shop.passport_series.as_str())
            .bind(shop.birth_date)
            .bind(shop.latitude)
            .bind(shop.longitude)
            .bind(shop.location.as_str())
            .bind(shop.registered_until)
            .bind(crate::utils::now())
            .execute(&mut conn)
            .await
            .map_err(|_| CatalogError::StorageError)?;
        drop(conn);

        self.read_shop(id).await
    }

    async fn read_shop(&self, id: Id) -> Result<ShopDocument, CatalogError> {
        let select = shop_select()
            .and_where(Expr::cust_with_values("shops.id = ?", vec![id]))
            .take();
        let row: Option<ShopRow> = self.fetch_opt_as(&select).await?;
        row.map(ShopRow::into_document)
            .ok_or_else(|| CatalogError::EntryNotFound(id.to_string()))
    }

    async fn update_shop(&self, id: Id, shop: &Shop) -> Result<ShopDocument, CatalogError> {
        self.require(UserSchema::Table, shop.owner_id).await?;

        let sql = format!(
            "UPDATE {} SET owner_id = ?, company_name = ?, brand_name = ?, tax_id = ?, \
             legal_certificate = ?, director_name = ?, contact = ?, business_address = ?, \
             logo = ?, physical_branches = ?, passport_series = ?, birth_date = ?, \
             latitude = ?, longitude = ?, location = ?, registered_until = ? WHERE id = ?",
            ShopSchema::Table.to_string()
        );

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| CatalogError::StorageError)?;
        let done = sqlx::query(sql.as_str())
            .bind(shop.owner_id)
            .bind(shop.company_name.as_str())
            .bind(shop.brand_name.as_str())
            .bind(shop.tax_id.as_str())
            .bind(shop.legal_certificate.as_str())
            .bind(shop.director_name.as_str())
            .bind(shop.contact.as_str())
            .bind(shop.business_address.as_str())
            .bind(shop.logo.as_deref())
            .bind(shop.physical_branches.as_str())
            .bind(shop.passport_series.as_str())
            .bind(shop.birth_date)
            .bind(shop.latitude)
            .bind(shop.longitude)
            .bind(shop.location.as_str())
            .bind(shop.registered_until)
            .bind(id)
            .execute(&mut conn)
            .await
            .map_err(|_| CatalogError::StorageError)?;
        drop(conn);

        if done.rows_affected() == 0 {
            return Err(CatalogError::EntryNotFound(id.to_string()));
        }
        self.read_shop(id).await
    }

    async fn delete_shop(&self, id: Id) -> Result<(), CatalogError> {
        self.delete_row(ShopSchema::Table, id).await
    }

    async fn list_shops(&self, query: &ShopQuery) -> Result<Vec<ShopDocument>, CatalogError> {
        let (order_col, order_dir) = match query.order_by.as_ref() {
            Some(order_by) => (
                match order_by.field {
                    ShopOrderField::CreatedAt => "shops.created_at",
                    ShopOrderField::CompanyName => "shops.company_name",
                },
                OrderSql::from(order_by.direction),
            ),
            None => ("shops.created_at", OrderSql::Desc),
        };

        let select = shop_select()
            .conditions(
                query.options.owner_id.is_some(),
                |q| {
                    q.and_where(Expr::cust_with_values(
                        "shops.owner_id = ?",
                        vec![query.options.owner_id.unwrap()],
                    ));
                },
                |_| {},
            )
            .conditions(
                query.options.search.is_some(),
                |q| {
                    let needle = like_needle(query.options.search.as_ref().unwrap());
                    q.cond_where(
                        Cond::any()
                            .add(Expr::cust_with_values(
                                "LOWER(shops.company_name) LIKE ?",
                                vec![needle.clone()],
                            ))
                            .add(Expr::cust_with_values(
                                "LOWER(shops.brand_name) LIKE ?",
                                vec![needle.clone()],
                            ))
                            .add(Expr::cust_with_values(
                                "LOWER(shops.business_address) LIKE ?",
                                vec![needle],
                            )),
                    );
                },
                |_| {},
            )
            .order_by_expr(Expr::cust(order_col), order_dir)
            .conditions(
                query.limit.is_some(),
                |q| {
                    q.limit(query.limit.unwrap() as u64);
                },
                |_| {},
            )
            .take();

        let rows: Vec<ShopRow> = self.fetch_all_as(&select).await?;
        Ok(rows.into_iter().map(ShopRow::into_document).collect())
    }

    async fn create_product(&self, product: &Product) -> Result<ProductDocument, CatalogError> {
        product.validate()?;
        self.require(ShopSchema::Table, product.shop_id).await?;
        if let Some(category_id) = product.category_id {
            self.require(CategorySchema::Table, category_id).await?;
        }
        if let Some(subcategory_id) = product.subcategory_id {
            self.require(SubCategorySchema::Table, subcategory_id)
                .await?;
        }

        let id = rand::random::<Id>();
        let now = crate::utils::now();
        let sql = format!(
            "INSERT INTO {} (id, shop_id, category_id, subcategory_id, name, description, \
             image, price, discount_price, has_discount, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            ProductSchema::Table.to_string()
        );

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| CatalogError::StorageError)?;
        sqlx::query(sql.as_str())
            .bind(id)
            .bind(product.shop_id)
            .bind(product.category_id)
            .bind(product.subcategory_id)
            .bind(product.name.as_str())
            .bind(product.description.as_str())
            .bind(product.image.as_deref())
            .bind(product.price)
            .bind(product.stored_discount_price())
            .bind(product.has_discount)
            .bind(now)
            .bind(now)
            .execute(&mut conn)
            .await
            .map_err(|_| CatalogError::StorageError)?;
        drop(conn);

        self.read_product(id).await
    }

    async fn read_product(&self, id: Id) -> Result<ProductDocument, CatalogError> {
        let select = product_select()
            .and_where(Expr::cust_with_values("products.id = ?", vec![id]))
            .take();
        let row: Option<ProductRow> = self.fetch_opt_as(&select).await?;
        row.map(ProductRow::into_document)
            .ok_or_else(|| CatalogError::EntryNotFound(id.to_string()))
    }

    async fn update_product(
        &self,
        id: Id,
        product: &Product,
    ) -> Result<ProductDocument, CatalogError> {
        product.validate()?;
        self.require(ShopSchema::Table, product.shop_id).await?;
        if let Some(category_id) = product.category_id {
            self.require(CategorySchema::Table, category_id).await?;
        }
        if let Some(subcategory_id) = product.subcategory_id {
            self.require(SubCategorySchema::Table, subcategory_id)
                .await?;
        }

        let sql = format!(
            "UPDATE {} SET shop_id = ?, category_id = ?, subcategory_id = ?, name = ?, \
             description = ?, image = ?, price = ?, discount_price = ?, has_discount = ?, \
             updated_at = ? WHERE id = ?",
            ProductSchema::Table.to_string()
        );

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| CatalogError::StorageError)?;
        let done = sqlx::query(sql.as_str())
            .bind(product.shop_id)
            .bind(product.category_id)
            .bind(product.subcategory_id)
            .bind(product.name.as_str())
            .bind(product.description.as_str())
            .bind(product.image.as_deref())
            .bind(product.price)
            .bind(product.stored_discount_price())
            .bind(product.has_discount)
            .bind(crate::utils::now())
            .bind(id)
            .execute(&mut conn)
            .await
            .map_err(|_| CatalogError::StorageError)?;
        drop(conn);

        if done.rows_affected() == 0 {
            return Err(CatalogError::EntryNotFound(id.to_string()));
        }
        self.read_product(id).await
    }

    async fn delete_product(&self, id: Id) -> Result<(), CatalogError> {
        self.delete_row(ProductSchema::Table, id).await
    }

    async fn list_products(
        &self,
        query: &ProductQuery,
    ) -> Result<Vec<ProductDocument>, CatalogError> {
        let (order_col, order_dir) = match query.order_by.as_ref() {
            Some(order_by) => (
                match order_by.field {
                    ProductOrderField::CreatedAt => "products.created_at",
                    ProductOrderField::Price => "products.price",
                    ProductOrderField::Name => "products.name",
                },
                OrderSql::from(order_by.direction),
            ),
            None => ("products.created_at", OrderSql::Desc),
        };

        let select = product_select()
            .conditions(
                query.options.shop_id.is_some(),
                |q| {
                    q.and_where(Expr::cust_with_values(
                        "products.shop_id = ?",
                        vec![query.options.shop_id.unwrap()],
                    ));
                },
                |_| {},
            )
            .conditions(
                query.options.category_id.is_some(),
                |q| {
                    q.and_where(Expr::cust_with_values(
                        "products.category_id = ?",
                        vec![query.options.category_id.unwrap()],
                    ));
                },
                |_| {},
            )
            .conditions(
                query.options.subcategory_id.is_some(),
                |q| {
                    q.and_where(Expr::cust_with_values(
                        "products.subcategory_id = ?",
                        vec![query.options.subcategory_id.unwrap()],
                    ));
                },
                |_| {},
            )
            .conditions(
                query.options.has_discount.is_some(),
                |q| {
                    q.and_where(Expr::cust_with_values(
                        "products.has_discount = ?",
                        vec![query.options.has_discount.unwrap()],
                    ));
                },
                |_| {},
            )
            .conditions(
                query.options.search.is_some(),
                |q| {
                    let needle = like_needle(query.options.search.as_ref().unwrap());
                    q.cond_where(
                        Cond::any()
                            .add(Expr::cust_with_values(
                                "LOWER(products.name) LIKE ?",
                                vec![needle.clone()],
                            ))
                            .add(Expr::cust_with_values(
                                "LOWER(products.description) LIKE ?",
                                vec![needle],
                            )),
                    );
                },
                |_| {},
            )
            .order_by_expr(Expr::cust(order_col), order_dir)
            .conditions(
                query.limit.is_some(),
                |q| {
                    q.limit(query.limit.unwrap() as u64);
                },
                |_| {},
            )
            .take();

        let rows: Vec<ProductRow> = self.fetch_all_as(&select).await?;
        Ok(rows.into_iter().map(ProductRow::into_document).collect())
    }

    async fn create_advertisement(
        &self,
        advertisement: &Advertisement,
    ) -> Result<AdvertisementDocument, CatalogError> {
        self.require(ProductSchema::Table, advertisement.product_id)
            .await?;

        let id = rand::random::<Id>();
        let sql = format!(
            "INSERT INTO {} (id, product_id, description, image, created_at) \
             VALUES (?, ?, ?, ?, ?)",
            AdvertisementSchema::Table.to_string()
        );

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| CatalogError::StorageError)?;
        sqlx::query(sql.as_str())
            .bind(id)
            .bind(advertisement.product_id)
            .bind(advertisement.description.as_str())
            .bind(advertisement.image.as_deref())
            .bind(crate::utils::now())
            .execute(&mut conn)
            .await
            .map_err(|_| CatalogError::StorageError)?;
        drop(conn);

        self.read_advertisement(id).await
    }

    async fn read_advertisement(&self, id: Id) -> Result<AdvertisementDocument, CatalogError> {
        let select = advertisement_select()
            .and_where(Expr::cust_with_values("advertisements.id = ?", vec![id]))
            .take();
        let row: Option<AdvertisementRow> = self.fetch_opt_as(&select).await?;
        row.map(AdvertisementRow::into_document)
            .ok_or_else(|| CatalogError::EntryNotFound(id.to_string()))
    }

    async fn update_advertisement(
        &self,
        id: Id,
        advertisement: &Advertisement,
    ) -> Result<AdvertisementDocument, CatalogError> {
        self.require(ProductSchema::Table, advertisement.product_id)
            .await?;

        let sql = format!(
            "UPDATE {} SET product_id = ?, description = ?, image = ? WHERE id = ?",
            AdvertisementSchema::Table.to_string()
        );

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| CatalogError::StorageError)?;
        let done = sqlx::query(sql.as_str())
            .bind(advertisement.product_id)
            .bind(advertisement.description.as_str())
            .bind(advertisement.image.as_deref())
            .bind(id)
            .execute(&mut conn)
            .await
            .map_err(|_| CatalogError::StorageError)?;
        drop(conn);

        if done.rows_affected() == 0 {
            return Err(CatalogError::EntryNotFound(id.to_string()));
        }
        self.read_advertisement(id).await
    }

    async fn delete_advertisement(&self, id: Id) -> Result<(), CatalogError> {
        self.delete_row(AdvertisementSchema::Table, id).await
    }

    async fn list_advertisements(
        &self,
        query: &AdvertisementQuery,
    ) -> Result<Vec<AdvertisementDocument>, CatalogError> {
        let (order_col, order_dir) = match query.order_by.as_ref() {
            Some(order_by) => (
                match order_by.field {
                    AdvertisementOrderField::CreatedAt => "advertisements.created_at",
                },
                OrderSql::from(order_by.direction),
            ),
            None => ("advertisements.created_at", OrderSql::Desc),
        };

        let select = advertisement_select()
            .conditions(
                query.options.product_id.is_some(),
                |q| {
                    q.and_where(Expr::cust_with_values(
                        "advertisements.product_id = ?",
                        vec![query.options.product_id.unwrap()],
                    ));
                },
                |_| {},
            )
            .conditions(
                query.options.search.is_some(),
                |q| {
                    let needle = like_needle(query.options.search.as_ref().unwrap());
                    q.and_where(Expr::cust_with_values(
                        "LOWER(advertisements.description) LIKE ?",
                        vec![needle],
                    ));
                },
                |_| {},
            )
            .order_by_expr(Expr::cust(order_col), order_dir)
            .conditions(
                query.limit.is_some(),
                |q| {
                    q.limit(query.limit.unwrap() as u64);
                },
                |_| {},
            )
            .take();

        let rows: Vec<AdvertisementRow> = self.fetch_all_as(&select).await?;
        Ok(rows
            .into_iter()
            .map(AdvertisementRow::into_document)
            .collect())
    }
}

fn like_needle(search: &str) -> String {
    format!("%{}%", search.to_lowercase())
}

#[derive(FromRow)]
struct Count {
    count: i64,
}

#[derive(FromRow)]
struct CategoryRow {
    id: Id,
    name: String,
    description: String,
    created_at: NaiveDateTime,
    subcategory_count: i64,
}

impl CategoryRow {
    fn into_document(self) -> CategoryDocument {
        CategoryDocument {
            id: self.id,
            name: self.name,
            description: self.description,
            subcategory_count: self.subcategory_count,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct SubCategoryRow {
    id: Id,
    category_id: Id,
    name: String,
    description: String,
    created_at: NaiveDateTime,
    category_name: String,
}

impl SubCategoryRow {
    fn into_document(self) -> SubCategoryDocument {
        SubCategoryDocument {
            id: self.id,
            category_id: self.category_id,
            category_name: self.category_name,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct ShopRow {
    id: Id,
    owner_id: Id,
    company_name: String,
    brand_name: String,
    tax_id: String,
    legal_certificate: String,
    director_name: String,
    contact: String,
    business_address: String,
    logo: Option<String>,
    physical_branches: String,
    passport_series: String,
    birth_date: Option<NaiveDate>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    location: String,
    registered_until: Option<NaiveDate>,
    created_at: NaiveDateTime,
    owner_first_name: String,
    owner_last_name: String,
    owner_phone: String,
    owner_image: Option<String>,
    product_count: i64,
}

impl ShopRow {
    fn into_document(self) -> ShopDocument {
        ShopDocument {
            id: self.id,
            owner: UserSummary {
                id: self.owner_id,
                first_name: self.owner_first_name,
                last_name: self.owner_last_name,
                phone: self.owner_phone,
                image: self.owner_image,
            },
            shop: Shop {
                owner_id: self.owner_id,
                company_name: self.company_name,
                brand_name: self.brand_name,
                tax_id: self.tax_id,
                legal_certificate: self.legal_certificate,
                director_name: self.director_name,
                contact: self.contact,
                business_address: self.business_address,
                logo: self.logo,
                physical_branches: self.physical_branches,
                passport_series: self.passport_series,
                birth_date: self.birth_date,
                latitude: self.latitude,
                longitude: self.longitude,
                location: self.location,
                registered_until: self.registered_until,
            },
            product_count: self.product_count,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct ProductRow {
    id: Id,
    shop_id: Id,
    category_id: Option<Id>,
    subcategory_id: Option<Id>,
    name: String,
    description: String,
    image: Option<String>,
    price: f64,
    discount_price: Option<f64>,
    has_discount: bool,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    shop_name: String,
    category_name: Option<String>,
    subcategory_name: Option<String>,
}

impl ProductRow {
    fn into_document(self) -> ProductDocument {
        ProductDocument {
            id: self.id,
            shop_id: self.shop_id,
            shop_name: self.shop_name,
            category_id: self.category_id,
            category_name: self.category_name,
            subcategory_id: self.subcategory_id,
            subcategory_name: self.subcategory_name,
            name: self.name,
            description: self.description,
            image: self.image,
            price: self.price,
            discount_price: self.discount_price,
            has_discount: self.has_discount,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct AdvertisementRow {
    id: Id,
    product_id: Id,
    description: String,
    image: Option<String>,
    created_at: NaiveDateTime,
    product_name: String,
}

impl AdvertisementRow {
    fn into_document(self) -> AdvertisementDocument {
        AdvertisementDocument {
            id: self.id,
            product_id: self.product_id,
            product_name: self.product_name,
            description: self.description,
            image: self.image,
            created_at: self.created_at,
        }
    }
}

pub enum CategorySchema {
    Table,
    Id,
}

impl Iden for CategorySchema {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Table => "categories",
                Self::Id => "id",
            }
        )
        .unwrap();
    }
}

pub enum SubCategorySchema {
    Table,
    Id,
    CategoryId,
}

impl Iden for SubCategorySchema {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Table => "subcategories",
                Self::Id => "id",
                Self::CategoryId => "category_id",
            }
        )
        .unwrap();
    }
}

pub enum ShopSchema {
    Table,
    Id,
    OwnerId,
}

impl Iden for ShopSchema {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Table => "shops",
                Self::Id => "id",
                Self::OwnerId => "owner_id",
            }
        )
        .unwrap();
    }
}

pub enum ProductSchema {
    Table,
    Id,
    ShopId,
    CategoryId,
    SubCategoryId,
}

impl Iden for ProductSchema {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Table => "products",
                Self::Id => "id",
                Self::ShopId => "shop_id",
                Self::CategoryId => "category_id",
                Self::SubCategoryId => "subcategory_id",
            }
        )
        .unwrap();
    }
}

pub enum AdvertisementSchema {
    Table,
    ProductId,
}

impl Iden for AdvertisementSchema {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Table => "advertisements",
                Self::ProductId => "product_id",
            }
        )
        .unwrap();
    }
}
