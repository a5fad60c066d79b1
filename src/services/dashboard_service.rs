// src/services/dashboard_service.rs

use sqlx::{Acquire, Executor, Postgres};
use crate::{
    common::{error::AppError, period::Period},
    db::DashboardRepository,
    models::dashboard::DashboardSummary,
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    /// Números do painel; a distribuição considera o mês corrente.
    pub async fn get_summary<'e, E>(&self, executor: E) -> Result<DashboardSummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        self.repo.get_summary(executor, Period::current()).await
    }
}
