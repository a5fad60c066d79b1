// src/services/equipment_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    db::EquipmentRepository,
    models::equipment::EquipmentItem,
};

#[derive(Clone)]
pub struct EquipmentService {
    repo: EquipmentRepository,
}

impl EquipmentService {
    pub fn new(repo: EquipmentRepository) -> Self {
        Self { repo }
    }

    /// Stock opname: grava a contagem física como novo saldo e registra a diferença no log.
    pub async fn stock_opname<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
        counted: i32,
    ) -> Result<EquipmentItem, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let before = self.repo.find(&mut *tx, item_id).await?;
        let after = self.repo.set_quantity(&mut *tx, item_id, counted).await?;

        tx.commit().await?;

        tracing::info!(
            item = %after.name,
            before = before.quantity,
            after = after.quantity,
            delta = i64::from(after.quantity) - i64::from(before.quantity),
            "📦 Stock opname registrado"
        );
        Ok(after)
    }
}
