use crate::DbError;
use crate::preferences::{InvestmentSettings, MiningSettings, PreferenceKey};
use chrono::Utc;
use core_types::{CalculationRecord, Currency, SavedCalculation};
use reports::ReportFilters;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;

/// How many recent calculations the history keeps.
pub const RECENT_CALCULATIONS_LIMIT: i64 = 10;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: SqlitePool,
}

impl DbRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // --- Preferences ---

    /// Stores `value` as JSON under `key`, replacing any previous value.
    pub async fn save_preference<T: Serialize + Sync>(&self, key: PreferenceKey, value: &T) -> Result<(), DbError> {
        let json = serde_json::to_string(value)?;
        sqlx::query(
            r#"
            INSERT INTO preferences (key, value, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key.as_str())
        .bind(json)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        tracing::debug!(key = key.as_str(), "Preference saved.");
        Ok(())
    }

    /// Loads the value stored under `key`.
    ///
    /// Returns `None` when nothing is stored or when the stored JSON no longer matches `T`;
    /// an unreadable preference is logged and treated as unset.
    pub async fn load_preference<T: DeserializeOwned>(&self, key: PreferenceKey) -> Result<Option<T>, DbError> {
        let stored: Option<String> = sqlx::query_scalar("SELECT value FROM preferences WHERE key = ?")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await?;

        let Some(json) = stored else {
            return Ok(None);
        };
        match serde_json::from_str(&json) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key = key.as_str(), error = %e, "Ignoring unreadable preference.");
                Ok(None)
            }
        }
    }

    /// Returns whether a value was stored under `key`.
    pub async fn remove_preference(&self, key: PreferenceKey) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM preferences WHERE key = ?")
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Forgets every preference and the whole calculation history.
    pub async fn clear_all(&self) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM preferences").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM calculations").execute(&mut *tx).await?;
        tx.commit().await?;

        tracing::info!("Cleared all preferences and history.");
        Ok(())
    }

    pub async fn load_currency(&self) -> Result<Currency, DbError> {
        Ok(self.load_preference(PreferenceKey::Currency).await?.unwrap_or(Currency::Usd))
    }

    pub async fn save_currency(&self, currency: Currency) -> Result<(), DbError> {
        self.save_preference(PreferenceKey::Currency, &currency).await
    }

    pub async fn load_investment_settings(&self) -> Result<InvestmentSettings, DbError> {
        Ok(self.load_preference(PreferenceKey::InvestmentSettings).await?.unwrap_or_default())
    }

    pub async fn save_investment_settings(&self, settings: &InvestmentSettings) -> Result<(), DbError> {
        self.save_preference(PreferenceKey::InvestmentSettings, settings).await
    }

    pub async fn load_mining_settings(&self) -> Result<MiningSettings, DbError> {
        Ok(self.load_preference(PreferenceKey::MiningSettings).await?.unwrap_or_default())
    }

    pub async fn save_mining_settings(&self, settings: &MiningSettings) -> Result<(), DbError> {
        self.save_preference(PreferenceKey::MiningSettings, settings).await
    }

    pub async fn load_report_filters(&self) -> Result<ReportFilters, DbError> {
        Ok(self.load_preference(PreferenceKey::ReportFilters).await?.unwrap_or_default())
    }

    pub async fn save_report_filters(&self, filters: &ReportFilters) -> Result<(), DbError> {
        self.save_preference(PreferenceKey::ReportFilters, filters).await
    }

    // --- Calculation history ---

    /// Stamps `record` with a fresh id and the current time and adds it to the history.
    pub async fn save_recent_calculation(&self, record: CalculationRecord) -> Result<SavedCalculation, DbError> {
        let saved = SavedCalculation::new(record, Utc::now());
        self.save_calculation(&saved).await?;
        Ok(saved)
    }

    /// Adds an already stamped calculation to the history, then drops everything but
    /// the newest `RECENT_CALCULATIONS_LIMIT` entries.
    pub async fn save_calculation(&self, saved: &SavedCalculation) -> Result<(), DbError> {
        let payload = serde_json::to_string(saved)?;

        let mut tx = self.pool.begin().await?;
        sqlx::query("INSERT INTO calculations (id, kind, created_at, payload) VALUES (?, ?, ?, ?)")
            .bind(saved.id.to_string())
            .bind(saved.kind().as_str())
            .bind(saved.timestamp)
            .bind(payload)
            .execute(&mut *tx)
            .await?;

        let trimmed = sqlx::query(
            r#"
            DELETE FROM calculations
            WHERE seq NOT IN (SELECT seq FROM calculations ORDER BY seq DESC LIMIT ?)
            "#,
        )
        .bind(RECENT_CALCULATIONS_LIMIT)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::debug!(
            id = %saved.id,
            kind = saved.kind().as_str(),
            dropped = trimmed.rows_affected(),
            "Calculation saved to history."
        );
        Ok(())
    }

    /// The saved history, newest first. Entries that no longer parse are skipped.
    pub async fn load_recent_calculations(&self) -> Result<Vec<SavedCalculation>, DbError> {
        let payloads: Vec<String> = sqlx::query_scalar("SELECT payload FROM calculations ORDER BY seq DESC")
            .fetch_all(&self.pool)
            .await?;

        let history = payloads
            .iter()
            .filter_map(|payload| match serde_json::from_str::<SavedCalculation>(payload) {
                Ok(saved) => Some(saved),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable history entry.");
                    None
                }
            })
            .collect();
        Ok(history)
    }
}
