// src/db/employee_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;
use crate::{
    common::{
        db_utils::like_pattern,
        error::{map_db_error, AppError},
    },
    models::employee::{Employee, EmployeeFilter, EmployeeInput, EmployeeListEntry},
};

#[derive(Clone, Default)]
pub struct EmployeeRepository;

impl EmployeeRepository {
    pub fn new() -> Self {
        Self
    }

    fn map_write_error(e: sqlx::Error, input: &EmployeeInput) -> AppError {
        map_db_error(e, |constraint| {
            constraint
                .contains("employee_number")
                .then(|| AppError::EmployeeNumberTaken(input.employee_number.clone()))
        })
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        filter: &EmployeeFilter,
    ) -> Result<Vec<EmployeeListEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let search = filter.q.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(like_pattern);
        let rows = sqlx::query_as::<_, EmployeeListEntry>(
            r#"
            SELECT e.id, e.name, e.employee_number,
                   e.division_id, d.name AS division_name,
                   e.position_id, p.name AS position_name,
                   e.shoe_size, e.helmet_color, e.coverall_size,
                   e.photo_url, e.document_url
            FROM employees e
            LEFT JOIN divisions d ON d.id = e.division_id
            LEFT JOIN positions p ON p.id = e.position_id
            WHERE ($1::text IS NULL OR e.name ILIKE $1 OR e.employee_number ILIKE $1)
              AND ($2::uuid IS NULL OR e.division_id = $2)
            ORDER BY e.name ASC
            "#,
        )
        .bind(search)
        .bind(filter.division_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn find<'e, E>(&self, executor: E, id: Uuid) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Karyawan {}", id)))
    }

    pub async fn create<'e, E>(&self, executor: E, input: &EmployeeInput) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (
                name, employee_number, division_id, position_id,
                shoe_size, helmet_color, coverall_size, photo_url, document_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.employee_number)
        .bind(input.division_id)
        .bind(input.position_id)
        .bind(&input.shoe_size)
        .bind(&input.helmet_color)
        .bind(&input.coverall_size)
        .bind(&input.photo_url)
        .bind(&input.document_url)
        .fetch_one(executor)
        .await
        .map_err(|e| Self::map_write_error(e, input))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        input: &EmployeeInput,
    ) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees SET
                name = $2, employee_number = $3, division_id = $4, position_id = $5,
                shoe_size = $6, helmet_color = $7, coverall_size = $8,
                photo_url = $9, document_url = $10, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.employee_number)
        .bind(input.division_id)
        .bind(input.position_id)
        .bind(&input.shoe_size)
        .bind(&input.helmet_color)
        .bind(&input.coverall_size)
        .bind(&input.photo_url)
        .bind(&input.document_url)
        .fetch_optional(executor)
        .await
        .map_err(|e| Self::map_write_error(e, input))?
        .ok_or_else(|| AppError::ResourceNotFound(format!("Karyawan {}", id)))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound(format!("Karyawan {}", id)));
        }
        Ok(())
    }
}
