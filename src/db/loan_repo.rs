// src/db/loan_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;
use crate::{
    common::{
        db_utils::like_pattern,
        error::{map_db_error, AppError},
    },
    models::loan::{Loan, LoanFilter, LoanInput, LoanListEntry, LoanStatus},
};

#[derive(Clone, Default)]
pub struct LoanRepository;

impl LoanRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(&self, executor: E, filter: &LoanFilter) -> Result<Vec<LoanListEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let returned: Option<bool> = match filter.status {
            LoanStatus::All => None,
            LoanStatus::Active => Some(false),
            LoanStatus::Returned => Some(true),
        };
        let search = filter.q.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(like_pattern);

        let rows = sqlx::query_as::<_, LoanListEntry>(
            r#"
            SELECT l.id, l.borrower_name, l.division_id, d.name AS division_name,
                   l.item_name, l.quantity, l.borrowed_on, l.returned_on, l.notes
            FROM loans l
            LEFT JOIN divisions d ON d.id = l.division_id
            WHERE ($1::bool IS NULL OR (l.returned_on IS NOT NULL) = $1)
              AND ($2::text IS NULL OR l.borrower_name ILIKE $2 OR l.item_name ILIKE $2)
            ORDER BY l.borrowed_on DESC, l.created_at DESC
            "#,
        )
        .bind(returned)
        .bind(search)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn find<'e, E>(&self, executor: E, id: Uuid) -> Result<Loan, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Peminjaman {}", id)))
    }

    pub async fn create<'e, E>(&self, executor: E, input: &LoanInput) -> Result<Loan, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (borrower_name, division_id, item_name, quantity, borrowed_on, returned_on, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&input.borrower_name)
        .bind(input.division_id)
        .bind(&input.item_name)
        .bind(input.quantity)
        .bind(input.borrowed_on)
        .bind(input.returned_on)
        .bind(&input.notes)
        .fetch_one(executor)
        .await
        .map_err(|e| map_db_error(e, |_| None))
    }

    pub async fn update<'e, E>(&self, executor: E, id: Uuid, input: &LoanInput) -> Result<Loan, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans SET
                borrower_name = $2, division_id = $3, item_name = $4, quantity = $5,
                borrowed_on = $6, returned_on = $7, notes = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.borrower_name)
        .bind(input.division_id)
        .bind(&input.item_name)
        .bind(input.quantity)
        .bind(input.borrowed_on)
        .bind(input.returned_on)
        .bind(&input.notes)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_db_error(e, |_| None))?
        .ok_or_else(|| AppError::ResourceNotFound(format!("Peminjaman {}", id)))
    }

    /// Marca a devolução. Só atualiza se ainda estiver em aberto.
    pub async fn mark_returned<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        returned_on: NaiveDate,
    ) -> Result<Option<Loan>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans SET returned_on = $2, updated_at = NOW()
            WHERE id = $1 AND returned_on IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(returned_on)
        .fetch_optional(executor)
        .await?;
        Ok(loan)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM loans WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound(format!("Peminjaman {}", id)));
        }
        Ok(())
    }
}
