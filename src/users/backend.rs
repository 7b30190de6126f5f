use async_trait::async_trait;
use sea_query::{Cond, Expr, Iden, Order as OrderSql, Query as Qsql, SqliteQueryBuilder as QueryBuilder};
use sqlx::types::chrono::NaiveDateTime;
use sqlx::{FromRow, SqlitePool as Pool};

use super::models::{RegisteredUser, User, UserDocument};
use super::service::{UserError, UserOrderField, UserQuery, UserService};
use crate::Id;

sea_query::sea_query_driver_sqlite!();
use sea_query_driver_sqlite::bind_query_as;

#[derive(Clone)]
pub struct UserSqlService {
    pool: Pool,
}

impl UserSqlService {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    fn sql_to_create(&self) -> String {
        format!(
            "INSERT INTO {} (id, first_name, last_name, phone, email, image, token, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
            UserSchema::Table.to_string()
        )
    }

    fn sql_to_read(&self) -> String {
        format!("SELECT * FROM {} WHERE id = ?", UserSchema::Table.to_string())
    }

    fn sql_to_update(&self) -> String {
        format!(
            "UPDATE {} SET first_name = ?, last_name = ?, phone = ?, email = ?, image = ? \
             WHERE id = ? RETURNING *",
            UserSchema::Table.to_string()
        )
    }

    fn sql_to_delete(&self) -> String {
        format!("DELETE FROM {} WHERE id = ?", UserSchema::Table.to_string())
    }

    fn sql_to_find_by_token(&self) -> String {
        format!("SELECT * FROM {} WHERE token = ?", UserSchema::Table.to_string())
    }
}

#[async_trait]
impl UserService for UserSqlService {
    async fn create(&self, user: &User) -> Result<RegisteredUser, UserError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| UserError::StorageError)?;

        let row: UserRow = sqlx::query_as(self.sql_to_create().as_str())
            .bind(rand::random::<Id>())
            .bind(user.first_name.as_str())
            .bind(user.last_name.as_str())
            .bind(user.phone.as_str())
            .bind(user.email.as_str())
            .bind(user.image.as_deref())
            .bind(issue_token())
            .bind(crate::utils::now())
            .fetch_one(&mut conn)
            .await
            .map_err(|err| match duplicate_field(&err) {
                Some(field) => UserError::DuplicateIdentity(field),
                None => UserError::StorageError,
            })?;

        Ok(row.into_registered())
    }

    async fn read(&self, id: Id) -> Result<UserDocument, UserError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| UserError::StorageError)?;

        let row: UserRow = sqlx::query_as(self.sql_to_read().as_str())
            .bind(id)
            .fetch_one(&mut conn)
            .await
            .map_err(|err| match err {
                sqlx::Error::RowNotFound => UserError::UserNotFound(id.to_string()),
                _ => UserError::StorageError,
            })?;

        Ok(row.into_document())
    }

    async fn update(&self, id: Id, user: &User) -> Result<UserDocument, UserError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| UserError::StorageError)?;

        let row: UserRow = sqlx::query_as(self.sql_to_update().as_str())
            .bind(user.first_name.as_str())
            .bind(user.last_name.as_str())
            .bind(user.phone.as_str())
            .bind(user.email.as_str())
            .bind(user.image.as_deref())
            .bind(id)
            .fetch_one(&mut conn)
            .await
            .map_err(|err| match (duplicate_field(&err), err) {
                (Some(field), _) => UserError::DuplicateIdentity(field),
                (_, sqlx::Error::RowNotFound) => UserError::UserNotFound(id.to_string()),
                _ => UserError::StorageError,
            })?;

        Ok(row.into_document())
    }

    async fn delete(&self, id: Id) -> Result<(), UserError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| UserError::StorageError)?;

        let done = sqlx::query(self.sql_to_delete().as_str())
            .bind(id)
            .execute(&mut conn)
            .await
            .map_err(|_| UserError::StorageError)?;

        if done.rows_affected() == 0 {
            return Err(UserError::UserNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list(&self, query: &UserQuery) -> Result<Vec<UserDocument>, UserError> {
        let (sql, values) = Qsql::select()
            .expr(Expr::asterisk())
            .from(UserSchema::Table)
            .conditions(
                query.options.search.is_some(),
                |q| {
                    let needle = like_needle(query.options.search.as_ref().unwrap());
                    q.cond_where(
                        Cond::any()
                            .add(Expr::cust_with_values(
                                "LOWER(first_name) LIKE ?",
                                vec![needle.clone()],
                            ))
                            .add(Expr::cust_with_values(
                                "LOWER(last_name) LIKE ?",
                                vec![needle.clone()],
                            ))
                            .add(Expr::cust_with_values("phone LIKE ?", vec![needle.clone()]))
                            .add(Expr::cust_with_values("LOWER(email) LIKE ?", vec![needle])),
                    );
                },
                |_| {},
            )
            .order_by_expr(
                Expr::cust(order_column(query.order_by.as_ref().map(|o| o.field))),
                match query.order_by.as_ref() {
                    Some(order_by) => OrderSql::from(order_by.direction),
                    None => OrderSql::Desc,
                },
            )
            .conditions(
                query.limit.is_some(),
                |q| {
                    q.limit(query.limit.unwrap() as u64);
                },
                |_| {},
            )
            .build(QueryBuilder);

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| UserError::StorageError)?;

        let rows: Vec<UserRow> = bind_query_as(sqlx::query_as(&sql), &values)
            .fetch_all(&mut conn)
            .await
            .map_err(|_| UserError::StorageError)?;

        Ok(rows.into_iter().map(UserRow::into_document).collect())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<UserDocument>, UserError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|_| UserError::StorageError)?;

        let row: Option<UserRow> = sqlx::query_as(self.sql_to_find_by_token().as_str())
            .bind(token)
            .fetch_optional(&mut conn)
            .await
            .map_err(|_| UserError::StorageError)?;

        Ok(row.map(UserRow::into_document))
    }
}

fn order_column(field: Option<UserOrderField>) -> &'static str {
    match field.unwrap_or(UserOrderField::CreatedAt) {
        UserOrderField::CreatedAt => "created_at",
        UserOrderField::FirstName => "first_name",
    }
}

fn like_needle(search: &str) -> String {
    format!("%{}%", search.to_lowercase())
}

fn issue_token() -> String {
    format!("{:032x}{:032x}", rand::random::<u128>(), rand::random::<u128>())
}

/// Maps a sqlite unique-constraint failure to the offending column.
fn duplicate_field(err: &sqlx::Error) -> Option<String> {
    let db_err = err.as_database_error()?;
    let message = db_err.message();
    let rest = message.strip_prefix("UNIQUE constraint failed: ")?;
    Some(
        rest.split(',')
            .next()
            .unwrap_or(rest)
            .trim()
            .trim_start_matches("users.")
            .to_string(),
    )
}

pub enum UserSchema {
    Table,
    Id,
}

impl Iden for UserSchema {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Table => "users",
                Self::Id => "id",
            }
        )
        .unwrap();
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Id,
    first_name: String,
    last_name: String,
    phone: String,
    email: String,
    image: Option<String>,
    token: String,
    created_at: NaiveDateTime,
}

impl UserRow {
    fn into_document(self) -> UserDocument {
        UserDocument {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            email: self.email,
            image: self.image,
            created_at: self.created_at,
        }
    }

    fn into_registered(self) -> RegisteredUser {
        let token = self.token.clone();
        RegisteredUser {
            user: self.into_document(),
            token,
        }
    }

}
