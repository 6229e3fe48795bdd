//! Catalog management service (genres, languages, authors, books)

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    media,
    models::{
        author::{Author, AuthorDetails, AuthorInput},
        book::{book_url, Book, BookDetails, BookInput, BookQuery, BookShort},
        genre::{display_genre, Genre, Language, NameInput},
        Pagination,
    },
    repository::Repository,
};

use super::lending::instance_views;

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

/// Trimmed name, refusing blank input
fn clean_name(name: &str, what: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation(format!("{} name cannot be blank", what)));
    }
    Ok(name.to_string())
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // Genres

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    pub async fn get_genre(&self, id: i32) -> AppResult<Genre> {
        self.repository.genres.get_by_id(id).await
    }

    pub async fn create_genre(&self, data: &NameInput) -> AppResult<Genre> {
        let name = clean_name(&data.name, "Genre")?;
        let genre = self.repository.genres.create(&name).await?;
        tracing::info!(genre_id = genre.id, "Genre created: {}", genre.name);
        Ok(genre)
    }

    pub async fn update_genre(&self, id: i32, data: &NameInput) -> AppResult<Genre> {
        let name = clean_name(&data.name, "Genre")?;
        self.repository.genres.update(id, &name).await
    }

    pub async fn delete_genre(&self, id: i32) -> AppResult<()> {
        self.repository.genres.delete(id).await?;
        tracing::info!(genre_id = id, "Genre deleted");
        Ok(())
    }

    // Languages

    pub async fn list_languages(&self) -> AppResult<Vec<Language>> {
        self.repository.languages.list().await
    }

    pub async fn get_language(&self, id: i32) -> AppResult<Language> {
        self.repository.languages.get_by_id(id).await
    }

    pub async fn create_language(&self, data: &NameInput) -> AppResult<Language> {
        let name = clean_name(&data.name, "Language")?;
        let language = self.repository.languages.create(&name).await?;
        tracing::info!(language_id = language.id, "Language created: {}", language.name);
        Ok(language)
    }

    pub async fn update_language(&self, id: i32, data: &NameInput) -> AppResult<Language> {
        let name = clean_name(&data.name, "Language")?;
        self.repository.languages.update(id, &name).await
    }

    pub async fn delete_language(&self, id: i32) -> AppResult<()> {
        self.repository.languages.delete(id).await?;
        tracing::info!(language_id = id, "Language deleted");
        Ok(())
    }

    // Authors

    pub async fn list_authors(&self, page: &Pagination) -> AppResult<(Vec<Author>, i64)> {
        self.repository.authors.list(page).await
    }

    /// Author with the books they wrote
    pub async fn get_author(&self, id: i32) -> AppResult<AuthorDetails> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.with_genres(self.repository.books.by_author(id).await?).await?;
        Ok(AuthorDetails {
            display_name: author.to_string(),
            url: author.absolute_url(),
            author,
            books,
        })
    }

    pub async fn create_author(&self, data: &AuthorInput, today: NaiveDate) -> AppResult<Author> {
        check_life_dates(data)?;
        let photo = media::photo_field(today, data.photo.as_deref())?;
        let author = self.repository.authors.create(data, photo).await?;
        tracing::info!(author_id = author.id, "Author created: {}", author);
        Ok(author)
    }

    pub async fn update_author(&self, id: i32, data: &AuthorInput, today: NaiveDate) -> AppResult<Author> {
        check_life_dates(data)?;
        let photo = media::photo_field(today, data.photo.as_deref())?;
        self.repository.authors.update(id, data, photo).await
    }

    /// Books of a deleted author keep existing without an author
    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await?;
        tracing::info!(author_id = id, "Author deleted");
        Ok(())
    }

    // Books

    pub async fn search_books(&self, query: &BookQuery) -> AppResult<(Vec<BookShort>, i64)> {
        let (books, total) = self.repository.books.list(query).await?;
        Ok((self.with_genres(books).await?, total))
    }

    /// Book with author, language, genres and copies
    pub async fn get_book(&self, id: i32, today: NaiveDate) -> AppResult<BookDetails> {
        let book = self.load_book(id).await?;

        let author = match book.author_id {
            Some(author_id) => Some(self.repository.authors.get_by_id(author_id).await?),
            None => None,
        };
        let language = match book.language_id {
            Some(language_id) => Some(self.repository.languages.get_by_id(language_id).await?),
            None => None,
        };

        let copies = self.repository.book_instances.list_for_book(id).await?;
        let instances = instance_views(&self.repository, copies, today).await?;

        Ok(BookDetails {
            url: book.absolute_url(),
            genre: book.display_genre(),
            book,
            author,
            language,
            instances,
        })
    }

    pub async fn create_book(&self, data: &BookInput, today: NaiveDate) -> AppResult<Book> {
        self.check_book_refs(data, None).await?;
        let photo = media::photo_field(today, data.photo.as_deref())?;
        let created = self.repository.books.create(data, photo).await?;
        tracing::info!(book_id = created.id, isbn = %created.isbn, "Book created: {}", created.title);
        self.load_book(created.id).await
    }

    pub async fn update_book(&self, id: i32, data: &BookInput, today: NaiveDate) -> AppResult<Book> {
        if !self.repository.books.exists(id).await? {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        self.check_book_refs(data, Some(id)).await?;
        let photo = media::photo_field(today, data.photo.as_deref())?;
        self.repository.books.update(id, data, photo).await?;
        tracing::info!(book_id = id, "Book updated");
        self.load_book(id).await
    }

    /// Refused while copies of the book exist
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    async fn load_book(&self, id: i32) -> AppResult<Book> {
        let mut book = self.repository.books.get_by_id(id).await?;
        book.genres = self.repository.genres.for_book(id).await?;
        Ok(book)
    }

    /// Fill the derived genre and url columns of list rows
    async fn with_genres(&self, mut books: Vec<BookShort>) -> AppResult<Vec<BookShort>> {
        let ids: Vec<i32> = books.iter().map(|b| b.id).collect();
        let mut by_book: HashMap<i32, Vec<Genre>> = HashMap::new();
        for (book_id, genre) in self.repository.genres.for_books(&ids).await? {
            by_book.entry(book_id).or_default().push(genre);
        }

        for book in &mut books {
            book.genre = by_book
                .get(&book.id)
                .map(|g| display_genre(g))
                .unwrap_or_default();
            book.url = book_url(book.id);
        }
        Ok(books)
    }

    /// Referenced author, language and genres must exist; the ISBN must be free
    async fn check_book_refs(&self, data: &BookInput, book_id: Option<i32>) -> AppResult<()> {
        if data.title.trim().is_empty() {
            return Err(AppError::Validation("Title cannot be blank".to_string()));
        }
        if let Some(author_id) = data.author_id {
            if !self.repository.authors.exists(author_id).await? {
                return Err(AppError::Validation(format!("Author {} does not exist", author_id)));
            }
        }
        if let Some(language_id) = data.language_id {
            if !self.repository.languages.exists(language_id).await? {
                return Err(AppError::Validation(format!("Language {} does not exist", language_id)));
            }
        }
        let missing = self.repository.genres.missing(&data.genre_ids).await?;
        if !missing.is_empty() {
            return Err(AppError::Validation(format!("Unknown genre ids: {:?}", missing)));
        }
        if self.repository.books.isbn_exists(&data.isbn, book_id).await? {
            return Err(AppError::Conflict(format!(
                "A book with ISBN {} already exists",
                data.isbn
            )));
        }
        Ok(())
    }
}

fn check_life_dates(data: &AuthorInput) -> AppResult<()> {
    match (data.date_of_birth, data.date_of_death) {
        (Some(born), Some(died)) if died < born => Err(AppError::Validation(
            "date_of_death cannot precede date_of_birth".to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author_input(born: Option<NaiveDate>, died: Option<NaiveDate>) -> AuthorInput {
        AuthorInput {
            first_name: "Ivan".to_string(),
            last_name: "Franko".to_string(),
            date_of_birth: born,
            date_of_death: died,
            photo: None,
            summary: None,
        }
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("  Poetry ", "Genre").unwrap(), "Poetry");
        assert!(matches!(clean_name("   ", "Genre"), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_life_dates() {
        let born = NaiveDate::from_ymd_opt(1856, 8, 27);
        let died = NaiveDate::from_ymd_opt(1916, 5, 28);
        assert!(check_life_dates(&author_input(born, died)).is_ok());
        assert!(check_life_dates(&author_input(None, died)).is_ok());
        assert!(check_life_dates(&author_input(died, born)).is_err());
    }
}
