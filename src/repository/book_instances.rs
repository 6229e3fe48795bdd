//! Book instances (copies) repository

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    lending::LoanStatus,
    models::{book_instance::BookInstance, Pagination},
};

const INSTANCE_SELECT: &str = r#"
    SELECT bi.id, bi.book_id, bi.imprint, bi.due_back, bi.borrower_id, bi.status,
           b.title AS book_title
    FROM book_instances bi
    JOIN books b ON b.id = bi.book_id
"#;

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        let q = format!("{} WHERE bi.id = $1", INSTANCE_SELECT);
        sqlx::query_as::<_, BookInstance>(&q)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Copies of one book, soonest due first
    pub async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let q = format!(
            "{} WHERE bi.book_id = $1 ORDER BY bi.due_back NULLS LAST, bi.id",
            INSTANCE_SELECT
        );
        let rows = sqlx::query_as::<_, BookInstance>(&q)
            .bind(book_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Copies currently on loan, optionally for one borrower, soonest due first
    pub async fn on_loan(
        &self,
        borrower_id: Option<i32>,
        page: &Pagination,
    ) -> AppResult<(Vec<BookInstance>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_instances WHERE status = 'o' AND ($1::int IS NULL OR borrower_id = $1)",
        )
        .bind(borrower_id)
        .fetch_one(&self.pool)
        .await?;

        let q = format!(
            "{} WHERE bi.status = 'o' AND ($1::int IS NULL OR bi.borrower_id = $1) \
             ORDER BY bi.due_back NULLS LAST, bi.id LIMIT $2 OFFSET $3",
            INSTANCE_SELECT
        );
        let rows = sqlx::query_as::<_, BookInstance>(&q)
            .bind(borrower_id)
            .bind(page.per_page())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok((rows, total))
    }

    /// Create a copy with a fresh random id
    pub async fn create(&self, book_id: i32, imprint: &str, status: LoanStatus) -> AppResult<BookInstance> {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO book_instances (id, book_id, imprint, status) VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(book_id)
        .bind(imprint)
        .bind(status)
        .execute(&self.pool)
        .await?;
        self.get_by_id(id).await
    }

    pub async fn update_details(&self, id: Uuid, book_id: i32, imprint: &str) -> AppResult<BookInstance> {
        let result = sqlx::query("UPDATE book_instances SET book_id = $1, imprint = $2 WHERE id = $3")
            .bind(book_id)
            .bind(imprint)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        self.get_by_id(id).await
    }

    /// Write status, due date and borrower together
    pub async fn set_loan_state(
        &self,
        id: Uuid,
        status: LoanStatus,
        due_back: Option<NaiveDate>,
        borrower_id: Option<i32>,
    ) -> AppResult<BookInstance> {
        let result = sqlx::query(
            "UPDATE book_instances SET status = $1, due_back = $2, borrower_id = $3 WHERE id = $4",
        )
        .bind(status)
        .bind(due_back)
        .bind(borrower_id)
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        self.get_by_id(id).await
    }

    pub async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<BookInstance> {
        let result = sqlx::query("UPDATE book_instances SET due_back = $1 WHERE id = $2")
            .bind(due_back)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        Ok(())
    }
}
