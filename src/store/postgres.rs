//! PostgreSQL store: `dogs` table DDL and parameterized CRUD.

use super::DogStore;
use crate::error::StoreError;
use crate::model::{Dog, DogPatch, NewDog};
use async_trait::async_trait;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

pub const DOGS_TABLE: &str = "dogs";

const COLUMNS: &str = "id, name, description, breed, age";

/// Create the `dogs` table if it does not exist.
pub async fn ensure_dogs_table(pool: &PgPool) -> Result<(), StoreError> {
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            breed TEXT NOT NULL,
            age INTEGER NOT NULL
        )
        "#,
        DOGS_TABLE
    );
    sqlx::query(&ddl).execute(pool).await?;
    Ok(())
}

/// Connect to the server's `postgres` database and create the target database if missing.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), StoreError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| sqlx::Error::Configuration("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres", base), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[derive(Clone)]
pub struct PgDogStore {
    pool: PgPool,
}

impl PgDogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DogStore for PgDogStore {
    async fn find_all(&self) -> Result<Vec<Dog>, StoreError> {
        let sql = format!("SELECT {} FROM {} ORDER BY id", COLUMNS, DOGS_TABLE);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Dog>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Dog>, StoreError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", COLUMNS, DOGS_TABLE);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Dog>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, dog: NewDog) -> Result<Dog, StoreError> {
        let sql = format!(
            "INSERT INTO {} (name, description, breed, age) VALUES ($1, $2, $3, $4) RETURNING {}",
            DOGS_TABLE, COLUMNS
        );
        tracing::debug!(sql = %sql, params = ?dog, "query");
        let row = sqlx::query_as::<_, Dog>(&sql)
            .bind(&dog.name)
            .bind(&dog.description)
            .bind(&dog.breed)
            .bind(dog.age)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: i32, patch: DogPatch) -> Result<Option<Dog>, StoreError> {
        let sql = format!(
            r#"
            UPDATE {} SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                breed = COALESCE($4, breed),
                age = COALESCE($5, age)
            WHERE id = $1
            RETURNING {}
            "#,
            DOGS_TABLE, COLUMNS
        );
        tracing::debug!(sql = %sql, id, params = ?patch, "query");
        let row = sqlx::query_as::<_, Dog>(&sql)
            .bind(id)
            .bind(patch.name)
            .bind(patch.description)
            .bind(patch.breed)
            .bind(patch.age)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: i32) -> Result<Option<Dog>, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1 RETURNING {}", DOGS_TABLE, COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Dog>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_database_name_from_url() {
        let (admin, db) = parse_db_name_from_url("postgres://u:p@localhost:5432/dogs?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://u:p@localhost:5432/postgres");
        assert_eq!(db, "dogs");
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("dogs"), "\"dogs\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
