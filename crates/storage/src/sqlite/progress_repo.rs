use chrono::{DateTime, Utc};
use drill_core::model::{TestNumber, UserId};
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{
    AttemptRecord, ProgressRecord, ProgressRepository, StorageError, TrainingRecord,
};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn conn(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

fn map_training_row(row: &sqlx::sqlite::SqliteRow) -> Result<TrainingRecord, StorageError> {
    let get_u32 = |field: &'static str| -> Result<u32, StorageError> {
        u32_from_i64(field, row.try_get::<i64, _>(field).map_err(ser)?)
    };
    let recent_json: String = row.try_get("recent_json").map_err(ser)?;
    let category_json: String = row.try_get("category_json").map_err(ser)?;

    Ok(TrainingRecord {
        correct: get_u32("correct")?,
        incorrect: get_u32("incorrect")?,
        current_streak: get_u32("current_streak")?,
        best_streak: get_u32("best_streak")?,
        recent: serde_json::from_str(&recent_json).map_err(ser)?,
        total_correct_all_time: get_u32("total_correct_all_time")?,
        category_correct: serde_json::from_str(&category_json).map_err(ser)?,
    })
}

fn map_attempt_row(row: &sqlx::sqlite::SqliteRow) -> Result<AttemptRecord, StorageError> {
    let raw_test: i64 = row.try_get("test_number").map_err(ser)?;
    let test_number = u8::try_from(raw_test)
        .map_err(ser)
        .and_then(|n| TestNumber::new(n).map_err(ser))?;
    let completed_at: DateTime<Utc> = row.try_get("completed_at").map_err(ser)?;

    Ok(AttemptRecord {
        test_number,
        score: u32_from_i64("score", row.try_get::<i64, _>("score").map_err(ser)?)?,
        total: u32_from_i64("total", row.try_get::<i64, _>("total").map_err(ser)?)?,
        completed_at,
    })
}

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load_progress(&self, user: &UserId) -> Result<Option<ProgressRecord>, StorageError> {
        let training_row = sqlx::query(
            r"
                SELECT
                    correct, incorrect, current_streak, best_streak,
                    total_correct_all_time, recent_json, category_json
                FROM training_progress
                WHERE user_id = ?1
            ",
        )
        .bind(user.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        let attempt_rows = sqlx::query(
            r"
                SELECT test_number, score, total, completed_at
                FROM test_attempts
                WHERE user_id = ?1
                ORDER BY position ASC
            ",
        )
        .bind(user.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        if training_row.is_none() && attempt_rows.is_empty() {
            return Ok(None);
        }

        let training = training_row
            .as_ref()
            .map(map_training_row)
            .transpose()?
            .unwrap_or_default();
        let attempts = attempt_rows
            .iter()
            .map(map_attempt_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(ProgressRecord { training, attempts }))
    }

    async fn save_progress(
        &self,
        user: &UserId,
        record: &ProgressRecord,
    ) -> Result<(), StorageError> {
        let t = &record.training;
        let recent_json = serde_json::to_string(&t.recent).map_err(ser)?;
        let category_json = serde_json::to_string(&t.category_correct).map_err(ser)?;

        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query(
            r"
                INSERT INTO training_progress (
                    user_id, correct, incorrect, current_streak, best_streak,
                    total_correct_all_time, recent_json, category_json, updated_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ON CONFLICT(user_id) DO UPDATE SET
                    correct = excluded.correct,
                    incorrect = excluded.incorrect,
                    current_streak = excluded.current_streak,
                    best_streak = excluded.best_streak,
                    total_correct_all_time = excluded.total_correct_all_time,
                    recent_json = excluded.recent_json,
                    category_json = excluded.category_json,
                    updated_at = excluded.updated_at
            ",
        )
        .bind(user.as_str())
        .bind(i64::from(t.correct))
        .bind(i64::from(t.incorrect))
        .bind(i64::from(t.current_streak))
        .bind(i64::from(t.best_streak))
        .bind(i64::from(t.total_correct_all_time))
        .bind(recent_json)
        .bind(category_json)
        .bind(self.clock.now())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        sqlx::query("DELETE FROM test_attempts WHERE user_id = ?1")
            .bind(user.as_str())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for (position, attempt) in record.attempts.iter().enumerate() {
            let position = i64::try_from(position)
                .map_err(|_| StorageError::Serialization("attempt position overflow".into()))?;
            sqlx::query(
                r"
                    INSERT INTO test_attempts (
                        user_id, position, test_number, score, total, completed_at
                    )
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ",
            )
            .bind(user.as_str())
            .bind(position)
            .bind(i64::from(attempt.test_number.value()))
            .bind(i64::from(attempt.score))
            .bind(i64::from(attempt.total))
            .bind(attempt.completed_at)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }
}
