// src/services/loan_service.rs

use chrono::NaiveDate;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, db::LoanRepository, models::loan::Loan};

/// Regras da devolução: uma só vez, e nunca antes da data do empréstimo.
pub fn check_return(loan: &Loan, returned_on: NaiveDate) -> Result<(), AppError> {
    if loan.returned_on.is_some() {
        return Err(AppError::LoanAlreadyReturned);
    }
    if returned_on < loan.borrowed_on {
        return Err(AppError::ReturnBeforeBorrow);
    }
    Ok(())
}

#[derive(Clone)]
pub struct LoanService {
    repo: LoanRepository,
}

impl LoanService {
    pub fn new(repo: LoanRepository) -> Self {
        Self { repo }
    }

    pub async fn return_item<'e, E>(
        &self,
        executor: E,
        loan_id: Uuid,
        returned_on: NaiveDate,
    ) -> Result<Loan, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let loan = self.repo.find(&mut *tx, loan_id).await?;
        check_return(&loan, returned_on)?;

        // Outro usuário pode ter devolvido entre o SELECT e o UPDATE
        let updated = self.repo
            .mark_returned(&mut *tx, loan_id, returned_on)
            .await?
            .ok_or(AppError::LoanAlreadyReturned)?;

        tx.commit().await?;

        tracing::info!(loan = %loan_id, borrower = %updated.borrower_name, "↩️ Empréstimo devolvido");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn loan(returned_on: Option<NaiveDate>) -> Loan {
        Loan {
            id: Uuid::new_v4(),
            borrower_name: "Dewi".into(),
            division_id: None,
            item_name: "Full Body Harness".into(),
            quantity: 1,
            borrowed_on: d(2025, 3, 10),
            returned_on,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn open_loan_can_be_returned_same_day_or_later() {
        assert!(check_return(&loan(None), d(2025, 3, 10)).is_ok());
        assert!(check_return(&loan(None), d(2025, 4, 1)).is_ok());
    }

    #[test]
    fn returning_twice_is_rejected() {
        assert!(matches!(
            check_return(&loan(Some(d(2025, 3, 11))), d(2025, 3, 12)),
            Err(AppError::LoanAlreadyReturned)
        ));
    }

    #[test]
    fn return_date_before_borrow_is_rejected() {
        assert!(matches!(
            check_return(&loan(None), d(2025, 3, 9)),
            Err(AppError::ReturnBeforeBorrow)
        ));
    }
}
