use async_trait::async_trait;
use sea_query::{
    Expr, Iden, Order as OrderSql, Query as Qsql, SelectStatement,
    SqliteQueryBuilder as QueryBuilder,
};
use sqlx::types::chrono::NaiveDateTime;
use sqlx::{FromRow, SqlitePool as Pool};

use super::models::{
    LikeDocument, LikeRemoval, LikeToggle, ProductEngagement, Review, ReviewDocument,
};
use super::service::{
    EngagementError, EngagementService, ReviewOrderField, ReviewQuery, RATING_MAX, RATING_MIN,
};
use crate::catalog::backend::ProductSchema;
use crate::users::backend::UserSchema;
use crate::users::models::UserSummary;
use crate::Id;

sea_query::sea_query_driver_sqlite!();
use sea_query_driver_sqlite::bind_query_as;

#[derive(Clone)]
pub struct EngagementSqlService {
    pool: Pool,
}

impl EngagementSqlService {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn product_exists(&self, product_id: Id) -> Result<bool, EngagementError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| EngagementError::StorageError)?;

        let sql = format!(
            "SELECT COUNT(1) AS count FROM {} WHERE id = ?",
            ProductSchema::Table.to_string()
        );
        let row: Count = sqlx::query_as(sql.as_str())
            .bind(product_id)
            .fetch_one(&mut conn)
            .await
            .map_err(|_| EngagementError::StorageError)?;

        Ok(row.count != 0)
    }

    async fn require_product(&self, product_id: Id) -> Result<(), EngagementError> {
        if !self.product_exists(product_id).await? {
            return Err(EngagementError::ProductNotFound(product_id.to_string()));
        }
        Ok(())
    }

    async fn fetch_reviews(
        &self,
        select: &SelectStatement,
    ) -> Result<Vec<ReviewDocument>, EngagementError> {
        let (sql, values) = select.build(QueryBuilder);
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| EngagementError::StorageError)?;

        let rows: Vec<ReviewRow> = bind_query_as(sqlx::query_as(&sql), &values)
            .fetch_all(&mut conn)
            .await
            .map_err(|_| EngagementError::StorageError)?;

        Ok(rows.into_iter().map(ReviewRow::into_document).collect())
    }
}

fn review_select() -> SelectStatement {
    Qsql::select()
        .expr(Expr::cust("reviews.*"))
        .expr(Expr::cust("users.first_name AS user_first_name"))
        .expr(Expr::cust("users.last_name AS user_last_name"))
        .expr(Expr::cust("users.phone AS user_phone"))
        .expr(Expr::cust("users.image AS user_image"))
        .from(ReviewSchema::Table)
        .inner_join(
            UserSchema::Table,
            Expr::tbl(UserSchema::Table, UserSchema::Id)
                .equals(ReviewSchema::Table, ReviewSchema::UserId),
        )
        .take()
}

fn like_select() -> SelectStatement {
    Qsql::select()
        .expr(Expr::cust("likes.*"))
        .expr(Expr::cust("users.first_name AS user_first_name"))
        .expr(Expr::cust("users.last_name AS user_last_name"))
        .expr(Expr::cust("users.phone AS user_phone"))
        .expr(Expr::cust("users.image AS user_image"))
        .from(LikeSchema::Table)
        .inner_join(
            UserSchema::Table,
            Expr::tbl(UserSchema::Table, UserSchema::Id)
                .equals(LikeSchema::Table, LikeSchema::UserId),
        )
        .take()
}

#[async_trait]
impl EngagementService for EngagementSqlService {
    async fn toggle_like(
        &self,
        product_id: Id,
        user_id: Id,
    ) -> Result<LikeToggle, EngagementError> {
        self.require_product(product_id).await?;

        // Single statement, no check-then-act: the unique (product_id,
        // user_id) constraint arbitrates concurrent toggles and a lost race
        // surfaces as zero affected rows, not as an error.
        let sql = format!(
            "INSERT INTO {} (id, product_id, user_id, created_at) VALUES (?, ?, ?, ?) \
             ON CONFLICT (product_id, user_id) DO NOTHING",
            LikeSchema::Table.to_string()
        );
        let id = rand::random::<Id>();

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| EngagementError::StorageError)?;
        let done = sqlx::query(sql.as_str())
            .bind(id)
            .bind(product_id)
            .bind(user_id)
            .bind(crate::utils::now())
            .execute(&mut conn)
            .await
            .map_err(|_| EngagementError::StorageError)?;

        if done.rows_affected() == 0 {
            return Ok(LikeToggle::AlreadyExists);
        }

        let select = like_select()
            .and_where(Expr::cust_with_values("likes.id = ?", vec![id]))
            .take();
        let (sql, values) = select.build(QueryBuilder);
        let row: LikeRow = bind_query_as(sqlx::query_as(&sql), &values)
            .fetch_one(&mut conn)
            .await
            .map_err(|_| EngagementError::MappingError)?;

        Ok(LikeToggle::Created(row.into_document()))
    }

    async fn remove_like(
        &self,
        product_id: Id,
        user_id: Id,
    ) -> Result<LikeRemoval, EngagementError> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = ? AND {} = ?",
            LikeSchema::Table.to_string(),
            LikeSchema::ProductId.to_string(),
            LikeSchema::UserId.to_string()
        );

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| EngagementError::StorageError)?;
        let done = sqlx::query(sql.as_str())
            .bind(product_id)
            .bind(user_id)
            .execute(&mut conn)
            .await
            .map_err(|_| EngagementError::StorageError)?;

        if done.rows_affected() == 0 {
            return Ok(LikeRemoval::NotFound);
        }
        Ok(LikeRemoval::Removed)
    }

    async fn add_review(
        &self,
        user_id: Id,
        review: &Review,
    ) -> Result<ReviewDocument, EngagementError> {
        if !(RATING_MIN..=RATING_MAX).contains(&review.rating) {
            return Err(EngagementError::RatingOutOfRange(review.rating));
        }
        self.require_product(review.product_id).await?;

        let id = rand::random::<Id>();
        let sql = format!(
            "INSERT INTO {} (id, product_id, user_id, body, rating, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
            ReviewSchema::Table.to_string()
        );

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| EngagementError::StorageError)?;
        sqlx::query(sql.as_str())
            .bind(id)
            .bind(review.product_id)
            .bind(user_id)
            .bind(review.body.as_str())
            .bind(review.rating)
            .bind(crate::utils::now())
            .execute(&mut conn)
            .await
            .map_err(|_| EngagementError::StorageError)?;
        drop(conn);

        self.read_review(id).await
    }

    async fn read_review(&self, id: Id) -> Result<ReviewDocument, EngagementError> {
        let select = review_select()
            .and_where(Expr::cust_with_values("reviews.id = ?", vec![id]))
            .take();
        let (sql, values) = select.build(QueryBuilder);

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| EngagementError::StorageError)?;
        let row: Option<ReviewRow> = bind_query_as(sqlx::query_as(&sql), &values)
            .fetch_optional(&mut conn)
            .await
            .map_err(|_| EngagementError::StorageError)?;

        row.map(ReviewRow::into_document)
            .ok_or_else(|| EngagementError::ReviewNotFound(id.to_string()))
    }

    async fn list_reviews(&self, product_id: Id) -> Result<Vec<ReviewDocument>, EngagementError> {
        let select = review_select()
            .and_where(Expr::cust_with_values(
                "reviews.product_id = ?",
                vec![product_id],
            ))
            .order_by_expr(Expr::cust("reviews.created_at"), OrderSql::Desc)
            .take();

        self.fetch_reviews(&select).await
    }

    async fn query_reviews(
        &self,
        query: &ReviewQuery,
    ) -> Result<Vec<ReviewDocument>, EngagementError> {
        let (order_col, order_dir) = match query.order_by.as_ref() {
            Some(order_by) => (
                match order_by.field {
                    ReviewOrderField::CreatedAt => "reviews.created_at",
                    ReviewOrderField::Rating => "reviews.rating",
                },
                OrderSql::from(order_by.direction),
            ),
            None => ("reviews.created_at", OrderSql::Desc),
        };

        let select = review_select()
            .conditions(
                query.options.product_id.is_some(),
                |q| {
                    q.and_where(Expr::cust_with_values(
                        "reviews.product_id = ?",
                        vec![query.options.product_id.unwrap()],
                    ));
                },
                |_| {},
            )
            .conditions(
                query.options.user_id.is_some(),
                |q| {
                    q.and_where(Expr::cust_with_values(
                        "reviews.user_id = ?",
                        vec![query.options.user_id.unwrap()],
                    ));
                },
                |_| {},
            )
            .conditions(
                query.options.rating.is_some(),
                |q| {
                    q.and_where(Expr::cust_with_values(
                        "reviews.rating = ?",
                        vec![query.options.rating.unwrap()],
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

        self.fetch_reviews(&select).await
    }

    async fn likes_for(&self, product_id: Id) -> Result<Vec<LikeDocument>, EngagementError> {
        let select = like_select()
            .and_where(Expr::cust_with_values(
                "likes.product_id = ?",
                vec![product_id],
            ))
            .order_by_expr(Expr::cust("likes.created_at"), OrderSql::Desc)
            .take();
        let (sql, values) = select.build(QueryBuilder);

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| EngagementError::StorageError)?;
        let rows: Vec<LikeRow> = bind_query_as(sqlx::query_as(&sql), &values)
            .fetch_all(&mut conn)
            .await
            .map_err(|_| EngagementError::StorageError)?;

        Ok(rows.into_iter().map(LikeRow::into_document).collect())
    }

    async fn aggregate(&self, product_id: Id) -> Result<ProductEngagement, EngagementError> {
        // AVG runs in double precision and yields NULL over an empty set,
        // which is exactly the "no rating yet" representation.
        let sql = format!(
            "SELECT \
               (SELECT COUNT(1) FROM {reviews} WHERE {product} = ?) AS review_count, \
               (SELECT COUNT(1) FROM {likes} WHERE {liked} = ?) AS like_count, \
               (SELECT AVG(rating) FROM {reviews} WHERE {product} = ?) AS average_rating",
            reviews = ReviewSchema::Table.to_string(),
            likes = LikeSchema::Table.to_string(),
            product = ReviewSchema::ProductId.to_string(),
            liked = LikeSchema::ProductId.to_string()
        );

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| EngagementError::StorageError)?;
        let row: AggregateRow = sqlx::query_as(sql.as_str())
            .bind(product_id)
            .bind(product_id)
            .bind(product_id)
            .fetch_one(&mut conn)
            .await
            .map_err(|_| EngagementError::StorageError)?;

        Ok(ProductEngagement {
            review_count: row.review_count,
            like_count: row.like_count,
            average_rating: row.average_rating,
        })
    }
}

#[derive(FromRow)]
struct Count {
    count: i64,
}

#[derive(FromRow)]
struct AggregateRow {
    review_count: i64,
    like_count: i64,
    average_rating: Option<f64>,
}

#[derive(FromRow)]
struct ReviewRow {
    id: Id,
    product_id: Id,
    user_id: Id,
    body: String,
    rating: i64,
    created_at: NaiveDateTime,
    user_first_name: String,
    user_last_name: String,
    user_phone: String,
    user_image: Option<String>,
}

impl ReviewRow {
    fn into_document(self) -> ReviewDocument {
        ReviewDocument {
            id: self.id,
            product_id: self.product_id,
            user_id: self.user_id,
            rating: self.rating,
            body: self.body,
            user: UserSummary {
                id: self.user_id,
                first_name: self.user_first_name,
                last_name: self.user_last_name,
                phone: self.user_phone,
                image: self.user_image,
            },
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct LikeRow {
    id: Id,
    product_id: Id,
    user_id: Id,
    created_at: NaiveDateTime,
    user_first_name: String,
    user_last_name: String,
    user_phone: String,
    user_image: Option<String>,
}

impl LikeRow {
    fn into_document(self) -> LikeDocument {
        LikeDocument {
            id: self.id,
            product_id: self.product_id,
            user_id: self.user_id,
            user: UserSummary {
                id: self.user_id,
                first_name: self.user_first_name,
                last_name: self.user_last_name,
                phone: self.user_phone,
                image: self.user_image,
            },
            created_at: self.created_at,
        }
    }
}

pub enum ReviewSchema {
    Table,
    ProductId,
    UserId,
}

impl Iden for ReviewSchema {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Table => "reviews",
                Self::ProductId => "product_id",
                Self::UserId => "user_id",
            }
        )
        .unwrap();
    }
}

pub enum LikeSchema {
    Table,
    ProductId,
    UserId,
}

impl Iden for LikeSchema {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Table => "likes",
                Self::ProductId => "product_id",
                Self::UserId => "user_id",
            }
        )
        .unwrap();
    }
}
