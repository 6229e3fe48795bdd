//! Books repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookInput, BookQuery, BookShort},
        Pagination,
    },
};

const SHORT_SELECT: &str = r#"
    SELECT b.id, b.title, b.isbn, b.author_id, b.year_of_creation, b.is_anonsed,
           CASE WHEN a.id IS NULL THEN NULL
                ELSE a.first_name || ' ' || a.last_name END AS author_name
    FROM books b
    LEFT JOIN authors a ON a.id = b.author_id
"#;

const SHORT_ORDER: &str = "ORDER BY b.title, a.last_name, a.first_name, b.id";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Search books with optional filters and pagination
    pub async fn list(&self, query: &BookQuery) -> AppResult<(Vec<BookShort>, i64)> {
        let page = Pagination::new(query.page, query.per_page);

        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.title.is_some() {
            conditions.push(format!("b.title ILIKE ${}", idx));
            idx += 1;
        }
        if query.author_id.is_some() {
            conditions.push(format!("b.author_id = ${}", idx));
            idx += 1;
        }
        if query.language_id.is_some() {
            conditions.push(format!("b.language_id = ${}", idx));
            idx += 1;
        }
        if query.genre_id.is_some() {
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM book_genres bg WHERE bg.book_id = b.id AND bg.genre_id = ${})",
                idx
            ));
            idx += 1;
        }
        if query.anonsed.is_some() {
            conditions.push(format!("b.is_anonsed = ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let title_pattern = query.title.as_ref().map(|t| format!("%{}%", t.trim()));

        // Count total
        let count_q = format!(
            "SELECT COUNT(*) FROM books b LEFT JOIN authors a ON a.id = b.author_id {}",
            where_clause
        );
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        if let Some(ref t) = title_pattern { count_builder = count_builder.bind(t); }
        if let Some(a) = query.author_id { count_builder = count_builder.bind(a); }
        if let Some(l) = query.language_id { count_builder = count_builder.bind(l); }
        if let Some(g) = query.genre_id { count_builder = count_builder.bind(g); }
        if let Some(f) = query.anonsed { count_builder = count_builder.bind(f); }
        let total = count_builder.fetch_one(&self.pool).await?;

        // Fetch rows
        let select_q = format!(
            "{} {} {} LIMIT {} OFFSET {}",
            SHORT_SELECT,
            where_clause,
            SHORT_ORDER,
            page.per_page(),
            page.offset()
        );
        let mut builder = sqlx::query_as::<_, BookShort>(&select_q);
        if let Some(ref t) = title_pattern { builder = builder.bind(t); }
        if let Some(a) = query.author_id { builder = builder.bind(a); }
        if let Some(l) = query.language_id { builder = builder.bind(l); }
        if let Some(g) = query.genre_id { builder = builder.bind(g); }
        if let Some(f) = query.anonsed { builder = builder.bind(f); }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok((rows, total))
    }

    /// Books written by one author
    pub async fn by_author(&self, author_id: i32) -> AppResult<Vec<BookShort>> {
        let q = format!("{} WHERE b.author_id = $1 {}", SHORT_SELECT, SHORT_ORDER);
        let rows = sqlx::query_as::<_, BookShort>(&q)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Check whether an ISBN is already used, optionally ignoring one book
    pub async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND ($2::int IS NULL OR id <> $2))",
        )
        .bind(isbn)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Create a book and its genre associations
    pub async fn create(&self, data: &BookInput, photo: Option<String>) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (
                title, author_id, summary, isbn, photo, language_id,
                is_anonsed, year_of_creation
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(data.author_id)
        .bind(&data.summary)
        .bind(&data.isbn)
        .bind(photo)
        .bind(data.language_id)
        .bind(data.is_anonsed)
        .bind(data.year_of_creation)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_constraint(e, "A book with this ISBN"))?;

        sqlx::query(
            "INSERT INTO book_genres (book_id, genre_id) SELECT $1, UNNEST($2::int[]) ON CONFLICT DO NOTHING",
        )
        .bind(book.id)
        .bind(&data.genre_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(book)
    }

    /// Replace a book and its genre set. A `None` photo keeps the stored one.
    pub async fn update(&self, id: i32, data: &BookInput, photo: Option<String>) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title = $1, author_id = $2, summary = $3, isbn = $4,
                photo = COALESCE($5, photo), language_id = $6,
                is_anonsed = $7, year_of_creation = $8, updated_at = NOW()
            WHERE id = $9
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(data.author_id)
        .bind(&data.summary)
        .bind(&data.isbn)
        .bind(photo)
        .bind(data.language_id)
        .bind(data.is_anonsed)
        .bind(data.year_of_creation)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::from_constraint(e, "A book with this ISBN"))?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO book_genres (book_id, genre_id) SELECT $1, UNNEST($2::int[]) ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(&data.genre_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(book)
    }

    /// Delete a book. Refused while copies of it exist.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_constraint(e, "Book"))?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }
}
