use crate::faq::{Faq, FaqField, FieldValue, NewFaq, RichText};
use crate::i18n::Language;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

const FAQ_COLUMNS: &str = "id, question, answer, question_hi, answer_hi, question_bn, answer_bn, \
     auto_translate, last_translated, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a connection pool. In-memory databases get a single connection
    /// that is never recycled, since every new connection would be a fresh,
    /// empty database.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

        let options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = options
            .connect(database_url)
            .await
            .context(format!("Failed to open database at {}", database_url))?;

        Ok(Self { pool })
    }

    /// Create tables if they don't exist
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS faqs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                question_hi TEXT,
                answer_hi TEXT,
                question_bn TEXT,
                answer_bn TEXT,
                auto_translate INTEGER NOT NULL DEFAULT 1,
                last_translated TEXT,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create faqs table")?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_faqs_active_created ON faqs (is_active, created_at DESC)",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create faqs index")?;

        Ok(())
    }

    /// Insert a new FAQ and return it as stored
    pub async fn insert_faq(&self, new: &NewFaq) -> Result<Faq> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO faqs (question, answer, question_hi, answer_hi, question_bn, answer_bn,
                               auto_translate, is_active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
        )
        .bind(&new.question)
        .bind(new.answer.to_json())
        .bind(&new.question_hi)
        .bind(new.answer_hi.as_ref().map(RichText::to_json))
        .bind(&new.question_bn)
        .bind(new.answer_bn.as_ref().map(RichText::to_json))
        .bind(new.auto_translate)
        .bind(new.is_active)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to insert FAQ")?;

        let id = result.last_insert_rowid();
        self.get_faq(id)
            .await?
            .context("Inserted FAQ could not be read back")
    }

    pub async fn get_faq(&self, id: i64) -> Result<Option<Faq>> {
        let row = sqlx::query(&format!("SELECT {} FROM faqs WHERE id = ?1", FAQ_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to load FAQ")?;

        row.as_ref().map(faq_from_row).transpose()
    }

    /// Active FAQs, newest first
    pub async fn list_active_faqs(&self) -> Result<Vec<Faq>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM faqs WHERE is_active = 1 ORDER BY created_at DESC, id DESC",
            FAQ_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list FAQs")?;

        rows.iter().map(faq_from_row).collect()
    }

    /// Write every mutable column of `faq`. Returns false if the row is gone.
    pub async fn update_faq(&self, faq: &Faq) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE faqs SET question = ?1, answer = ?2, question_hi = ?3, answer_hi = ?4,
                             question_bn = ?5, answer_bn = ?6, auto_translate = ?7,
                             last_translated = ?8, is_active = ?9, updated_at = ?10
             WHERE id = ?11",
        )
        .bind(&faq.question)
        .bind(faq.answer.to_json())
        .bind(&faq.question_hi)
        .bind(faq.answer_hi.as_ref().map(RichText::to_json))
        .bind(&faq.question_bn)
        .bind(faq.answer_bn.as_ref().map(RichText::to_json))
        .bind(faq.auto_translate)
        .bind(faq.last_translated)
        .bind(faq.is_active)
        .bind(faq.updated_at)
        .bind(faq.id)
        .execute(&self.pool)
        .await
        .context("Failed to update FAQ")?;

        Ok(result.rows_affected() > 0)
    }

    /// Write one translated column and `last_translated`, leaving every
    /// other column alone. Concurrent writers of different columns never
    /// clobber each other.
    pub async fn save_shadow(
        &self,
        id: i64,
        field: FaqField,
        language: Language,
        value: &FieldValue,
        translated_at: DateTime<Utc>,
    ) -> Result<()> {
        if language.is_canonical() {
            anyhow::bail!("{} has no shadow columns", language.name());
        }
        if value.kind() != field.kind() {
            anyhow::bail!("Value shape does not match field {}", field);
        }

        let stored = match value {
            FieldValue::Plain(text) => text.clone(),
            FieldValue::Rich(rich) => rich.to_json(),
        };

        // Column names come from the fixed field and language sets
        sqlx::query(&format!(
            "UPDATE faqs SET {}_{} = ?1, last_translated = ?2 WHERE id = ?3",
            field.name(),
            language.code()
        ))
        .bind(stored)
        .bind(translated_at)
        .bind(id)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to save {} translation of FAQ {}", language, id))?;

        Ok(())
    }

    /// Hard delete. Returns false if there was no such row.
    pub async fn delete_faq(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM faqs WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete FAQ")?;

        Ok(result.rows_affected() > 0)
    }
}

fn faq_from_row(row: &SqliteRow) -> Result<Faq> {
    let answer: String = row.try_get("answer")?;
    let answer_hi: Option<String> = row.try_get("answer_hi")?;
    let answer_bn: Option<String> = row.try_get("answer_bn")?;

    Ok(Faq {
        id: row.try_get("id")?,
        question: row.try_get("question")?,
        answer: RichText::parse(&answer),
        question_hi: row.try_get("question_hi")?,
        answer_hi: answer_hi.as_deref().map(RichText::parse),
        question_bn: row.try_get("question_bn")?,
        answer_bn: answer_bn.as_deref().map(RichText::parse),
        auto_translate: row.try_get("auto_translate")?,
        last_translated: row.try_get("last_translated")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
