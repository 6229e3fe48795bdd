//! Lending service: copies, loans, renewals and returns

use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    lending::{LoanStatus, RenewalPolicy, RenewalWindow},
    models::{
        book_instance::{
            BookInstance, BookInstanceView, ChangeStatus, CreateBookInstance, LendRequest,
            UpdateBookInstance,
        },
        Pagination,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LendingService {
    repository: Repository,
    policy: RenewalPolicy,
}

/// Status, due date and borrower to store for a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LoanState {
    status: LoanStatus,
    due_back: Option<NaiveDate>,
    borrower_id: Option<i32>,
}

/// Checks on a status change request that need no stored state. A due date
/// given for on-loan must fall in the renewal window; due date and borrower
/// are refused for any other target.
fn check_status_request(policy: &RenewalPolicy, data: &ChangeStatus, today: NaiveDate) -> AppResult<()> {
    if data.status == LoanStatus::OnLoan {
        if let Some(due_back) = data.due_back {
            policy.validate(due_back, today)?;
        }
        return Ok(());
    }
    if data.due_back.is_some() || data.borrower_id.is_some() {
        return Err(AppError::Validation(format!(
            "due_back and borrower_id only apply to on_loan, not {}",
            data.status.label()
        )));
    }
    Ok(())
}

/// State after moving `current` to the requested status. Entering on-loan
/// needs a due date; leaving it clears the due date and borrower.
fn plan_status_change(current: &BookInstance, data: &ChangeStatus) -> AppResult<LoanState> {
    let status = current.status.transition_to(data.status)?;
    if status != LoanStatus::OnLoan {
        return Ok(LoanState {
            status,
            due_back: None,
            borrower_id: None,
        });
    }
    let due_back = data.due_back.or(current.due_back).ok_or_else(|| {
        AppError::Validation("due_back is required for a copy on loan".to_string())
    })?;
    Ok(LoanState {
        status,
        due_back: Some(due_back),
        borrower_id: data.borrower_id.or(current.borrower_id),
    })
}

/// A new copy can never start on loan
fn initial_status(requested: Option<LoanStatus>) -> AppResult<LoanStatus> {
    match requested.unwrap_or_default() {
        LoanStatus::OnLoan => Err(AppError::BusinessRule(
            "A new copy cannot be created on loan; lend it instead".to_string(),
        )),
        status => Ok(status),
    }
}

fn plan_lend(current: &BookInstance, borrower_id: i32, due_back: NaiveDate) -> AppResult<LoanState> {
    if current.status == LoanStatus::OnLoan {
        return Err(AppError::BusinessRule(format!(
            "Book instance {} is already on loan",
            current.id
        )));
    }
    let status = current.status.transition_to(LoanStatus::OnLoan)?;
    Ok(LoanState {
        status,
        due_back: Some(due_back),
        borrower_id: Some(borrower_id),
    })
}

fn require_on_loan(current: &BookInstance) -> AppResult<()> {
    if current.status == LoanStatus::OnLoan {
        Ok(())
    } else {
        Err(AppError::BusinessRule(format!(
            "Book instance {} is not on loan ({})",
            current.id,
            current.status.label()
        )))
    }
}

/// Returned copies go back on the shelf with no borrower
fn plan_return(current: &BookInstance) -> AppResult<LoanState> {
    require_on_loan(current)?;
    Ok(LoanState {
        status: LoanStatus::Available,
        due_back: None,
        borrower_id: None,
    })
}

/// Attach borrowers and derived fields to a batch of copies
pub(crate) async fn instance_views(
    repository: &Repository,
    instances: Vec<BookInstance>,
    today: NaiveDate,
) -> AppResult<Vec<BookInstanceView>> {
    let mut ids: Vec<i32> = instances.iter().filter_map(|i| i.borrower_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let borrowers: HashMap<i32, _> = repository
        .users
        .get_many(&ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(instances
        .into_iter()
        .map(|i| {
            let borrower = i.borrower_id.and_then(|id| borrowers.get(&id).cloned());
            i.view(today, borrower)
        })
        .collect())
}

impl LendingService {
    pub fn new(repository: Repository, policy: RenewalPolicy) -> Self {
        Self { repository, policy }
    }

    pub fn renewal_window(&self, today: NaiveDate) -> RenewalWindow {
        self.policy.window(today)
    }

    // Copies

    pub async fn list_for_book(&self, book_id: i32, today: NaiveDate) -> AppResult<Vec<BookInstanceView>> {
        if !self.repository.books.exists(book_id).await? {
            return Err(AppError::NotFound(format!("Book {} not found", book_id)));
        }
        let copies = self.repository.book_instances.list_for_book(book_id).await?;
        instance_views(&self.repository, copies, today).await
    }

    pub async fn get(&self, id: Uuid, today: NaiveDate) -> AppResult<BookInstanceView> {
        let copy = self.repository.book_instances.get_by_id(id).await?;
        self.view(copy, today).await
    }

    /// Add a copy to a book. A new copy can never start on loan.
    pub async fn create(
        &self,
        book_id: i32,
        data: &CreateBookInstance,
        today: NaiveDate,
    ) -> AppResult<BookInstanceView> {
        if !self.repository.books.exists(book_id).await? {
            return Err(AppError::NotFound(format!("Book {} not found", book_id)));
        }
        let status = initial_status(data.status)?;
        let copy = self
            .repository
            .book_instances
            .create(book_id, data.imprint.trim(), status)
            .await?;
        tracing::info!(instance_id = %copy.id, book_id, "Book instance created");
        self.view(copy, today).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        data: &UpdateBookInstance,
        today: NaiveDate,
    ) -> AppResult<BookInstanceView> {
        let current = self.repository.book_instances.get_by_id(id).await?;
        let book_id = data.book_id.unwrap_or(current.book_id);
        if book_id != current.book_id && !self.repository.books.exists(book_id).await? {
            return Err(AppError::Validation(format!("Book {} does not exist", book_id)));
        }
        let imprint = data
            .imprint
            .as_deref()
            .map(str::trim)
            .unwrap_or(&current.imprint)
            .to_string();
        let copy = self
            .repository
            .book_instances
            .update_details(id, book_id, &imprint)
            .await?;
        self.view(copy, today).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.book_instances.delete(id).await?;
        tracing::info!(instance_id = %id, "Book instance deleted");
        Ok(())
    }

    // Status lifecycle

    /// Move a copy through the status table
    pub async fn change_status(
        &self,
        id: Uuid,
        data: &ChangeStatus,
        today: NaiveDate,
    ) -> AppResult<BookInstanceView> {
        check_status_request(&self.policy, data, today)?;

        let current = self.repository.book_instances.get_by_id(id).await?;
        let next = plan_status_change(&current, data)?;
        if let Some(user_id) = next.borrower_id {
            self.repository.users.get_short(user_id).await?;
        }

        let copy = self.store(id, next).await?;
        tracing::info!(instance_id = %id, from = %current.status.code(), to = %next.status.code(), "Status changed");
        self.view(copy, today).await
    }

    /// Lend an available or reserved copy
    pub async fn lend(&self, id: Uuid, data: &LendRequest, today: NaiveDate) -> AppResult<BookInstanceView> {
        let due_back = match data.due_back {
            Some(date) => self.policy.validate(date, today)?,
            None => self.policy.window(today).suggested,
        };

        let current = self.repository.book_instances.get_by_id(id).await?;
        let next = plan_lend(&current, data.borrower_id, due_back)?;
        self.repository.users.get_short(data.borrower_id).await?;

        let copy = self.store(id, next).await?;
        tracing::info!(instance_id = %id, borrower_id = data.borrower_id, %due_back, "Book instance lent");
        self.view(copy, today).await
    }

    /// Push back the due date of a copy on loan
    pub async fn renew(&self, id: Uuid, renewal_date: NaiveDate, today: NaiveDate) -> AppResult<BookInstanceView> {
        let due_back = self.policy.validate(renewal_date, today)?;

        let current = self.repository.book_instances.get_by_id(id).await?;
        require_on_loan(&current)?;

        let copy = self.repository.book_instances.set_due_back(id, due_back).await?;
        tracing::info!(instance_id = %id, %due_back, "Loan renewed");
        self.view(copy, today).await
    }

    /// Take a copy back: on loan becomes available, borrower and due date cleared
    pub async fn mark_returned(&self, id: Uuid, today: NaiveDate) -> AppResult<BookInstanceView> {
        let current = self.repository.book_instances.get_by_id(id).await?;
        let copy = self.store(id, plan_return(&current)?).await?;
        tracing::info!(instance_id = %id, borrower_id = ?current.borrower_id, "Book instance returned");
        self.view(copy, today).await
    }

    // Loans

    /// Copies on loan to one user, soonest due first
    pub async fn borrowed_by_user(
        &self,
        user_id: i32,
        page: &Pagination,
        today: NaiveDate,
    ) -> AppResult<(Vec<BookInstanceView>, i64)> {
        self.repository.users.get_short(user_id).await?;
        let (copies, total) = self.repository.book_instances.on_loan(Some(user_id), page).await?;
        Ok((instance_views(&self.repository, copies, today).await?, total))
    }

    /// Every copy on loan, soonest due first
    pub async fn all_borrowed(&self, page: &Pagination, today: NaiveDate) -> AppResult<(Vec<BookInstanceView>, i64)> {
        let (copies, total) = self.repository.book_instances.on_loan(None, page).await?;
        Ok((instance_views(&self.repository, copies, today).await?, total))
    }

    async fn store(&self, id: Uuid, state: LoanState) -> AppResult<BookInstance> {
        self.repository
            .book_instances
            .set_loan_state(id, state.status, state.due_back, state.borrower_id)
            .await
    }

    async fn view(&self, copy: BookInstance, today: NaiveDate) -> AppResult<BookInstanceView> {
        let borrower = match copy.borrower_id {
            Some(id) => Some(self.repository.users.get_short(id).await?),
            None => None,
        };
        Ok(copy.view(today, borrower))
    }
}
