//! Database operations for `zip_code_searches` and `zip_code_restaurants`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use zipeats_core::{Genre, RestaurantRecord, ZipCodeSnapshot};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `zip_code_searches` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SearchRow {
    pub id: i64,
    pub zip_code: String,
    pub searched_at: DateTime<Utc>,
}

/// A row from the `zip_code_restaurants` table, without its surrogate key.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RestaurantRow {
    pub position: i32,
    pub name: String,
    pub genre: String,
    pub price_level: Option<i16>,
    pub is_open: Option<bool>,
}

impl RestaurantRow {
    fn into_record(self) -> RestaurantRecord {
        let genre = Genre::from_label(&self.genre).unwrap_or_else(|| {
            tracing::warn!(genre = %self.genre, "unknown stored genre, using default");
            Genre::default()
        });
        RestaurantRecord {
            name: self.name,
            genre,
            price_level: self.price_level.and_then(|p| u8::try_from(p).ok()),
            is_open: self.is_open,
        }
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Returns the newest snapshot for `zip_code`, restaurants in stored order.
///
/// Newest means the highest id, i.e. the last committed insert. `searched_at`
/// is the transaction start time and can disagree with commit order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either query fails.
pub async fn latest_snapshot(
    pool: &PgPool,
    zip_code: &str,
) -> Result<Option<ZipCodeSnapshot>, DbError> {
    let search = sqlx::query_as::<_, SearchRow>(
        "SELECT id, zip_code, searched_at \
         FROM zip_code_searches \
         WHERE zip_code = $1 \
         ORDER BY id DESC \
         LIMIT 1",
    )
    .bind(zip_code)
    .fetch_optional(pool)
    .await?;

    let Some(search) = search else {
        return Ok(None);
    };

    let rows = sqlx::query_as::<_, RestaurantRow>(
        "SELECT position, name, genre, price_level, is_open \
         FROM zip_code_restaurants \
         WHERE search_id = $1 \
         ORDER BY position",
    )
    .bind(search.id)
    .fetch_all(pool)
    .await?;

    Ok(Some(ZipCodeSnapshot {
        id: search.id,
        zip_code: search.zip_code,
        retrieved_at: search.searched_at,
        restaurants: rows.into_iter().map(RestaurantRow::into_record).collect(),
    }))
}

/// Appends a new snapshot for `zip_code` and returns its id.
///
/// The search row and all restaurant rows are written in one transaction
/// with a single `INSERT … SELECT * FROM UNNEST(…)` for the children.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; nothing is written.
pub async fn insert_snapshot(
    pool: &PgPool,
    zip_code: &str,
    restaurants: &[RestaurantRecord],
) -> Result<i64, DbError> {
    let mut tx = pool.begin().await?;

    let search_id: i64 = sqlx::query_scalar(
        "INSERT INTO zip_code_searches (zip_code) VALUES ($1) RETURNING id",
    )
    .bind(zip_code)
    .fetch_one(&mut *tx)
    .await?;

    if !restaurants.is_empty() {
        let mut positions: Vec<i32> = Vec::with_capacity(restaurants.len());
        let mut names: Vec<String> = Vec::with_capacity(restaurants.len());
        let mut genres: Vec<String> = Vec::with_capacity(restaurants.len());
        let mut price_levels: Vec<Option<i16>> = Vec::with_capacity(restaurants.len());
        let mut open_flags: Vec<Option<bool>> = Vec::with_capacity(restaurants.len());

        for (position, record) in restaurants.iter().enumerate() {
            positions.push(i32::try_from(position).unwrap_or(i32::MAX));
            names.push(record.name.clone());
            genres.push(record.genre.as_str().to_string());
            price_levels.push(record.price_level.map(i16::from));
            open_flags.push(record.is_open);
        }

        sqlx::query(
            "INSERT INTO zip_code_restaurants \
                 (search_id, position, name, genre, price_level, is_open) \
             SELECT $1, * FROM UNNEST($2::int4[], $3::text[], $4::text[], $5::int2[], $6::bool[])",
        )
        .bind(search_id)
        .bind(&positions)
        .bind(&names)
        .bind(&genres)
        .bind(&price_levels)
        .bind(&open_flags)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(search_id)
}
