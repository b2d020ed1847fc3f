//! Shop selection repository.
//!
//! One row per shop domain, with the two identifier sets stored as `TEXT[]`
//! columns. Saves are single-row upserts; the row write is the sole
//! consistency mechanism (no multi-row transactions are needed).
//!
//! Queries are runtime (non-macro) sqlx so the crate builds without a live
//! database.

use sqlx::{PgPool, Row};

use pagetest_core::{SelectionSet, ShopDomain, ShopSelection};

use super::{RepositoryError, SaveKind, SelectionStore};

/// Repository for shop selection records.
pub struct ShopRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShopRepository<'a> {
    /// Create a new shop repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl SelectionStore for ShopRepository<'_> {
    async fn find(&self, domain: &ShopDomain) -> Result<Option<ShopSelection>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT selected_pages, selected_products
            FROM shop_selection
            WHERE domain = $1
            ",
        )
        .bind(domain.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let pages: Vec<String> = row.try_get("selected_pages")?;
        let products: Vec<String> = row.try_get("selected_products")?;

        // Stored values are canonical, but re-normalizing makes readers
        // tolerant of rows written by earlier iterations of the app
        Ok(Some(ShopSelection {
            domain: domain.clone(),
            pages: SelectionSet::from_raw(pages),
            products: SelectionSet::from_raw(products),
        }))
    }

    async fn ensure(&self, domain: &ShopDomain) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO shop_selection (domain)
            VALUES ($1)
            ON CONFLICT (domain) DO NOTHING
            ",
        )
        .bind(domain.as_str())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn replace(&self, selection: &ShopSelection) -> Result<SaveKind, RepositoryError> {
        // xmax = 0 only for freshly inserted rows, which distinguishes
        // "created" from "updated" in a single round trip
        let row = sqlx::query(
            r"
            INSERT INTO shop_selection (domain, selected_pages, selected_products)
            VALUES ($1, $2, $3)
            ON CONFLICT (domain) DO UPDATE
                SET selected_pages = EXCLUDED.selected_pages,
                    selected_products = EXCLUDED.selected_products,
                    updated_at = NOW()
            RETURNING (xmax = 0) AS created
            ",
        )
        .bind(selection.domain.as_str())
        .bind(selection.pages.to_strings())
        .bind(selection.products.to_strings())
        .fetch_one(self.pool)
        .await?;

        let created: bool = row.try_get("created")?;
        Ok(if created {
            SaveKind::Created
        } else {
            SaveKind::Updated
        })
    }

    async fn delete(&self, domain: &ShopDomain) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM shop_selection
            WHERE domain = $1
            ",
        )
        .bind(domain.as_str())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
