use async_trait::async_trait;
use burrow_core::error::StoreError;
use burrow_core::{Fingerprint, MappingRecord, MappingStore, NewMapping, UrlKey};
use jiff::Timestamp;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

type Result<T> = std::result::Result<T, StoreError>;

/// MySQL implementation of the [`MappingStore`] contract.
///
/// The `tiny_urls` table carries an `AUTO_INCREMENT` uid for identifier
/// assignment and a unique index on `urlkey` for key reservation; a
/// unique-constraint violation on insert or key assignment is reported as
/// [`StoreError::Conflict`]. Reads only return live rows: keyless rows (mid
/// two-phase insert) and expired rows are filtered in SQL. Expired rows are
/// not physically removed here.
#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Creates a store from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a store by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn now_unix_seconds() -> i64 {
    Timestamp::now().as_second()
}

fn parse_valid_until(seconds: Option<i64>) -> Result<Option<Timestamp>> {
    seconds
        .map(|value| {
            Timestamp::from_second(value).map_err(|e| {
                StoreError::InvalidData(format!("invalid valid_until timestamp '{}': {e}", value))
            })
        })
        .transpose()
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StoreError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StoreError::InvalidData(message),
        _ => StoreError::Query(message),
    }
}

fn record_from_row(row: &MySqlRow) -> Result<MappingRecord> {
    let identifier: u64 = row.try_get("uid").map_err(map_sqlx_error)?;
    let target_url: String = row.try_get("target_url").map_err(map_sqlx_error)?;
    let hash: String = row.try_get("target_url_hash").map_err(map_sqlx_error)?;
    let key: Option<String> = row.try_get("urlkey").map_err(map_sqlx_error)?;
    let delete_on_use: bool = row.try_get("delete_on_use").map_err(map_sqlx_error)?;
    let valid_until_raw: Option<i64> = row.try_get("valid_until").map_err(map_sqlx_error)?;
    let hit_count: u64 = row.try_get("hit_count").map_err(map_sqlx_error)?;

    let fingerprint = Fingerprint::from_hex(&hash)
        .map_err(|e| StoreError::InvalidData(format!("bad target_url_hash: {e}")))?;

    Ok(MappingRecord {
        identifier,
        target_url,
        fingerprint,
        key: key.map(UrlKey::new_unchecked),
        delete_on_use,
        valid_until: parse_valid_until(valid_until_raw)?,
        hit_count,
    })
}

#[async_trait]
impl MappingStore for MySqlStore {
    async fn find_by_fingerprint(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<MappingRecord>> {
        let row = sqlx::query(
            r#"
            SELECT uid, target_url, target_url_hash, urlkey, delete_on_use, valid_until, hit_count
            FROM tiny_urls
            WHERE target_url_hash = ?
              AND urlkey IS NOT NULL
              AND (valid_until IS NULL OR valid_until > ?)
            LIMIT 1
            "#,
        )
        .bind(fingerprint.to_hex())
        .bind(now_unix_seconds())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn find_by_key(&self, key: &UrlKey) -> Result<Option<MappingRecord>> {
        let row = sqlx::query(
            r#"
            SELECT uid, target_url, target_url_hash, urlkey, delete_on_use, valid_until, hit_count
            FROM tiny_urls
            WHERE urlkey = ?
              AND (valid_until IS NULL OR valid_until > ?)
            LIMIT 1
            "#,
        )
        .bind(key.as_str())
        .bind(now_unix_seconds())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn insert(&self, mapping: NewMapping) -> Result<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO tiny_urls (target_url, target_url_hash, urlkey, delete_on_use, valid_until)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&mapping.target_url)
        .bind(mapping.fingerprint.to_hex())
        .bind(mapping.key.as_ref().map(UrlKey::as_str))
        .bind(mapping.delete_on_use)
        .bind(mapping.valid_until.map(|ts| ts.as_second()))
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(done.last_insert_id()),
            Err(err) if is_unique_violation(&err) => {
                let key = mapping
                    .key
                    .as_ref()
                    .map_or_else(String::new, ToString::to_string);
                Err(StoreError::Conflict(key))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn update_key(&self, identifier: u64, key: &UrlKey) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE tiny_urls
            SET urlkey = ?
            WHERE uid = ?
              AND urlkey IS NULL
            "#,
        )
        .bind(key.as_str())
        .bind(identifier)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => Ok(()),
            Ok(_) => Err(StoreError::Operation(format!(
                "no keyless mapping with identifier {identifier}"
            ))),
            Err(err) if is_unique_violation(&err) => Err(StoreError::Conflict(key.to_string())),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn delete_by_key(&self, key: &UrlKey) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tiny_urls WHERE urlkey = ?")
            .bind(key.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_hit_count(&self, key: &UrlKey) -> Result<()> {
        sqlx::query("UPDATE tiny_urls SET hit_count = hit_count + 1 WHERE urlkey = ?")
            .bind(key.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}
