//! SQLite performance summary store.
//!
//! Every delta is applied as a read-modify-replace inside an `IMMEDIATE`
//! transaction, which takes the write lock up front and serialises
//! concurrent writers on the same database file.

use chrono::NaiveDate;
use diesel::prelude::*;

use super::database::connection::DbPool;
use super::database::model::PerformanceSummaryRow;
use super::database::schema::performance_summaries;
use super::suggestion::parse_decimal;
use crate::domain::{PerformanceSummary, PeriodKey, PeriodType, SummaryDelta};
use crate::error::{Error, Result};
use crate::port::outbound::store::PerformanceStore;

/// SQLite-backed store for [`PerformanceSummary`] rows.
pub struct SqlitePerformanceStore {
    pool: DbPool,
}

impl SqlitePerformanceStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(summary: &PerformanceSummary) -> Result<PerformanceSummaryRow> {
        Ok(PerformanceSummaryRow {
            period_type: summary.period_type.as_str().to_string(),
            period_start: summary.period_start.to_string(),
            period_end: summary.period_end.to_string(),
            total_tracked: to_column(summary.total_tracked, "total_tracked")?,
            settled_count: to_column(summary.settled_count, "settled_count")?,
            correct_count: to_column(summary.correct_count, "correct_count")?,
            accuracy_percent: summary.accuracy_percent.to_string(),
        })
    }

    fn from_row(row: PerformanceSummaryRow) -> Result<PerformanceSummary> {
        let period_type = PeriodType::parse(&row.period_type)
            .ok_or_else(|| Error::Parse(format!("unknown period type '{}'", row.period_type)))?;

        Ok(PerformanceSummary {
            period_type,
            period_start: parse_date(&row.period_start)?,
            period_end: parse_date(&row.period_end)?,
            total_tracked: from_column(row.total_tracked, "total_tracked")?,
            settled_count: from_column(row.settled_count, "settled_count")?,
            correct_count: from_column(row.correct_count, "correct_count")?,
            accuracy_percent: parse_decimal(&row.accuracy_percent)?,
        })
    }

    fn find_row(
        conn: &mut SqliteConnection,
        key: &PeriodKey,
    ) -> std::result::Result<Option<PerformanceSummaryRow>, diesel::result::Error> {
        performance_summaries::table
            .find((
                key.period_type.as_str(),
                key.period_start.to_string(),
                key.period_end.to_string(),
            ))
            .select(PerformanceSummaryRow::as_select())
            .first(conn)
            .optional()
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    value
        .parse::<NaiveDate>()
        .map_err(|e| Error::Parse(format!("date '{value}': {e}")))
}

fn to_column(value: u32, field: &str) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::Parse(format!("{field} overflow: {value}")))
}

fn from_column(value: i32, field: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::Parse(format!("negative {field}: {value}")))
}

impl PerformanceStore for SqlitePerformanceStore {
    async fn apply_delta(&self, key: &PeriodKey, delta: SummaryDelta) -> Result<PerformanceSummary> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        conn.immediate_transaction(|conn| {
            let mut summary = match Self::find_row(conn, key)? {
                Some(row) => Self::from_row(row)?,
                None => PerformanceSummary::empty(*key),
            };
            summary.apply(delta);

            diesel::replace_into(performance_summaries::table)
                .values(&Self::to_row(&summary)?)
                .execute(conn)?;

            Ok(summary)
        })
    }

    async fn get_summary(&self, key: &PeriodKey) -> Result<Option<PerformanceSummary>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        Self::find_row(&mut conn, key)?
            .map(Self::from_row)
            .transpose()
    }

    async fn list_summaries(
        &self,
        period_type: PeriodType,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PerformanceSummary>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let rows: Vec<PerformanceSummaryRow> = performance_summaries::table
            .filter(performance_summaries::period_type.eq(period_type.as_str()))
            .filter(performance_summaries::period_start.ge(from.to_string()))
            .filter(performance_summaries::period_start.le(to.to_string()))
            .order(performance_summaries::period_start.asc())
            .select(PerformanceSummaryRow::as_select())
            .load(&mut conn)?;

        rows.into_iter().map(Self::from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::{open, PoolOptions};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn memory_store() -> SqlitePerformanceStore {
        SqlitePerformanceStore::new(open(":memory:", PoolOptions::default()).unwrap())
    }

    #[tokio::test]
    async fn missing_row_is_created_from_zero() {
        let store = memory_store();
        let key = PeriodKey::daily(day(1));
        assert!(store.get_summary(&key).await.unwrap().is_none());

        let summary = store
            .apply_delta(&key, SummaryDelta::settlement(true))
            .await
            .unwrap();
        assert_eq!(summary.settled_count, 1);
        assert_eq!(summary.correct_count, 1);
        assert_eq!(summary.accuracy_percent, dec!(100));

        let stored = store.get_summary(&key).await.unwrap().unwrap();
        assert_eq!(stored, summary);
    }

    #[tokio::test]
    async fn deltas_accumulate() {
        let store = memory_store();
        let key = PeriodKey::daily(day(2));
        store.apply_delta(&key, SummaryDelta::tracked()).await.unwrap();
        store.apply_delta(&key, SummaryDelta::tracked()).await.unwrap();
        store
            .apply_delta(&key, SummaryDelta::settlement(false))
            .await
            .unwrap();
        let summary = store
            .apply_delta(&key, SummaryDelta::settlement(true))
            .await
            .unwrap();

        assert_eq!(summary.total_tracked, 2);
        assert_eq!(summary.settled_count, 2);
        assert_eq!(summary.correct_count, 1);
        assert_eq!(summary.accuracy_percent, dec!(50));
    }

    #[tokio::test]
    async fn list_is_ordered_and_bounded() {
        let store = memory_store();
        for d in [5, 1, 3, 9] {
            store
                .apply_delta(&PeriodKey::daily(day(d)), SummaryDelta::tracked())
                .await
                .unwrap();
        }
        let rows = store
            .list_summaries(PeriodType::Daily, day(1), day(5))
            .await
            .unwrap();
        let starts: Vec<_> = rows.iter().map(|r| r.period_start).collect();
        assert_eq!(starts, vec![day(1), day(3), day(5)]);
    }

    #[test]
    fn concurrent_settlements_on_one_day_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let url = dir.path().join("summaries.db").display().to_string();
        let pool = open(
            &url,
            PoolOptions {
                max_connections: 4,
                busy_timeout_ms: 10_000,
            },
        )
        .unwrap();
        let store = Arc::new(SqlitePerformanceStore::new(pool));
        let key = PeriodKey::daily(day(20));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    let rt = tokio::runtime::Builder::new_current_thread()
                        .build()
                        .unwrap();
                    for _ in 0..10 {
                        rt.block_on(store.apply_delta(&key, SummaryDelta::settlement(i % 2 == 0)))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let summary = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(store.get_summary(&key))
            .unwrap()
            .unwrap();
        assert_eq!(summary.settled_count, 40);
        assert_eq!(summary.correct_count, 20);
        assert_eq!(summary.accuracy_percent, dec!(50));
    }
}
