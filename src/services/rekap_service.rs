// src/services/rekap_service.rs
//
// Rekap mensal: para cada item de APD no período,
//     saldo_akhir = stock_awal + realisasi - distribusi
// onde stock_awal é o saldo atual do item e distribusi é a soma das
// distribuições diárias do mês.

use std::collections::{HashMap, HashSet};

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, period::Period},
    db::{EquipmentRepository, IssuanceRepository, RekapRepository},
    models::{
        equipment::EquipmentItem,
        rekap::{RekapEntry, RekapLine, RekapRow},
    },
};

/// Saldo final com aritmética checada; o resultado precisa caber na coluna INTEGER.
pub fn saldo_akhir(stock_awal: i32, realisasi: i32, distribusi: i32) -> Result<i32, AppError> {
    let saldo = i64::from(stock_awal) + i64::from(realisasi) - i64::from(distribusi);
    i32::try_from(saldo).map_err(|_| AppError::QuantityOverflow)
}

/// Calcula uma linha por item. A realisasi de cada item vem de `realisasi`
/// (ausente = 0) e a distribuição de `distribution` (ausente = 0).
pub fn compute_rekap(
    items: &[EquipmentItem],
    distribution: &HashMap<Uuid, i64>,
    realisasi: &HashMap<Uuid, i32>,
) -> Result<Vec<RekapLine>, AppError> {
    items
        .iter()
        .map(|item| {
            let distribusi = distribution.get(&item.id).copied().unwrap_or(0);
            let distribusi = i32::try_from(distribusi).map_err(|_| AppError::QuantityOverflow)?;
            let realisasi = realisasi.get(&item.id).copied().unwrap_or(0);

            Ok(RekapLine {
                item_id: item.id,
                stock_awal: item.quantity,
                realisasi,
                distribusi,
                saldo_akhir: saldo_akhir(item.quantity, realisasi, distribusi)?,
            })
        })
        .collect()
}

/// Realisasi efetiva: override da requisição > valor já gravado > 0 (implícito).
pub fn resolve_realisasi(
    stored: impl IntoIterator<Item = (Uuid, i32)>,
    overrides: &HashMap<Uuid, i32>,
) -> HashMap<Uuid, i32> {
    let mut resolved: HashMap<Uuid, i32> = stored.into_iter().collect();
    resolved.extend(overrides.iter().map(|(k, v)| (*k, *v)));
    resolved
}

/// Todo override precisa apontar para um item existente.
pub fn check_overrides(items: &[EquipmentItem], overrides: &HashMap<Uuid, i32>) -> Result<(), AppError> {
    let known: HashSet<Uuid> = items.iter().map(|i| i.id).collect();
    // Ordenado para o erro ser sempre o mesmo
    let mut unknown: Vec<&Uuid> = overrides.keys().filter(|id| !known.contains(id)).collect();
    unknown.sort();
    match unknown.first() {
        Some(id) => Err(AppError::ReferenceNotFound(format!("APD {}", id))),
        None => Ok(()),
    }
}

#[derive(Clone)]
pub struct RekapService {
    equipment_repo: EquipmentRepository,
    issuance_repo: IssuanceRepository,
    rekap_repo: RekapRepository,
}

impl RekapService {
    pub fn new(
        equipment_repo: EquipmentRepository,
        issuance_repo: IssuanceRepository,
        rekap_repo: RekapRepository,
    ) -> Self {
        Self { equipment_repo, issuance_repo, rekap_repo }
    }

    /// Gera (ou regera) o rekap do período numa única transação.
    pub async fn generate<'e, E>(
        &self,
        executor: E,
        period: Period,
        overrides: &HashMap<Uuid, i32>,
    ) -> Result<Vec<RekapEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // 1. Itens (saldo atual = stock_awal)
        let items = self.equipment_repo.list(&mut *tx, None).await?;
        check_overrides(&items, overrides)?;

        // 2. Distribuição do mês por item
        let distribution: HashMap<Uuid, i64> = self.issuance_repo
            .distribution_by_period(&mut *tx, period)
            .await?
            .into_iter()
            .map(|d| (d.item_id, d.total))
            .collect();

        // 3. Realisasi já digitada
        let stored = self.rekap_repo.stored_realisasi(&mut *tx, period).await?;
        let realisasi = resolve_realisasi(
            stored.into_iter().map(|s| (s.item_id, s.realisasi)),
            overrides,
        );

        // 4. Cálculo + UPSERT por (item, período)
        let lines = compute_rekap(&items, &distribution, &realisasi)?;
        for line in &lines {
            self.rekap_repo.upsert_line(&mut *tx, period, line).await?;
        }

        let entries = self.rekap_repo.list_period(&mut *tx, period).await?;
        tx.commit().await?;

        tracing::info!(period = %period, rows = lines.len(), "📊 Rekap gerado");
        Ok(entries)
    }

    pub async fn list<'e, E>(&self, executor: E, period: Period) -> Result<Vec<RekapEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.rekap_repo.list_period(executor, period).await
    }

    /// Digitação manual da realisasi de uma linha; o saldo é recalculado na hora.
    pub async fn update_realisasi<'e, E>(
        &self,
        executor: E,
        row_id: Uuid,
        realisasi: i32,
    ) -> Result<RekapRow, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let row = self.rekap_repo.find(&mut *tx, row_id).await?;
        let line = RekapLine {
            item_id: row.item_id,
            stock_awal: row.stock_awal,
            realisasi,
            distribusi: row.distribusi,
            saldo_akhir: saldo_akhir(row.stock_awal, realisasi, row.distribusi)?,
        };
        let updated = self.rekap_repo.update_line(&mut *tx, row_id, &line).await?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn delete_period<'e, E>(&self, executor: E, period: Period) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let removed = self.rekap_repo.delete_period(executor, period).await?;
        tracing::info!(period = %period, removed, "🗑️ Rekap removido");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::PgPool;

    fn item(name: &str, quantity: i32) -> EquipmentItem {
        EquipmentItem {
            id: Uuid::new_v4(),
            name: name.to_string(),
            unit: "pcs".to_string(),
            quantity,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn helm_safety_month() {
        let helm = item("Helm Safety", 100);
        let distribution = HashMap::from([(helm.id, 12_i64)]);

        let lines = compute_rekap(&[helm.clone()], &distribution, &HashMap::new()).unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].stock_awal, 100);
        assert_eq!(lines[0].realisasi, 0);
        assert_eq!(lines[0].distribusi, 12);
        assert_eq!(lines[0].saldo_akhir, 88);
    }

    #[test]
    fn balance_holds_for_every_line() {
        let items: Vec<_> = (0..20).map(|i| item(&format!("APD {}", i), i * 7)).collect();
        let distribution: HashMap<_, _> = items
            .iter()
            .enumerate()
            .filter(|(i, _)| i % 3 != 0)
            .map(|(i, it)| (it.id, (i as i64) * 5))
            .collect();
        let realisasi: HashMap<_, _> = items
            .iter()
            .enumerate()
            .filter(|(i, _)| i % 2 == 0)
            .map(|(i, it)| (it.id, i as i32 * 3))
            .collect();

        let lines = compute_rekap(&items, &distribution, &realisasi).unwrap();

        assert_eq!(lines.len(), items.len());
        for line in &lines {
            assert_eq!(line.saldo_akhir, line.stock_awal + line.realisasi - line.distribusi);
        }
    }

    #[test]
    fn items_without_issuances_keep_their_stock() {
        let sarung = item("Sarung Tangan", 40);
        let lines = compute_rekap(&[sarung], &HashMap::new(), &HashMap::new()).unwrap();
        assert_eq!(lines[0].distribusi, 0);
        assert_eq!(lines[0].saldo_akhir, 40);
    }

    #[test]
    fn balance_may_go_negative_when_more_is_issued_than_counted() {
        assert_eq!(saldo_akhir(5, 0, 8).unwrap(), -3);
    }

    #[test]
    fn overflow_is_an_error_not_a_wraparound() {
        assert!(matches!(saldo_akhir(i32::MAX, 1, 0), Err(AppError::QuantityOverflow)));

        let big = item("Masker", 0);
        let distribution = HashMap::from([(big.id, i64::from(i32::MAX) + 1)]);
        assert!(matches!(
            compute_rekap(&[big], &distribution, &HashMap::new()),
            Err(AppError::QuantityOverflow)
        ));
    }

    #[test]
    fn overrides_win_over_stored_realisasi() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let overrides = HashMap::from([(b, 50), (c, 7)]);

        let resolved = resolve_realisasi([(a, 10), (b, 20)], &overrides);

        assert_eq!(resolved[&a], 10);
        assert_eq!(resolved[&b], 50);
        assert_eq!(resolved[&c], 7);
    }

    #[test]
    fn overrides_for_unknown_items_are_rejected() {
        let helm = item("Helm Safety", 10);
        let stray = Uuid::new_v4();

        assert!(check_overrides(&[helm.clone()], &HashMap::from([(helm.id, 3)])).is_ok());
        match check_overrides(&[helm.clone()], &HashMap::from([(helm.id, 3), (stray, 1)])) {
            Err(AppError::ReferenceNotFound(what)) => assert!(what.contains(&stray.to_string())),
            other => panic!("esperava ReferenceNotFound, veio {:?}", other),
        }
    }

    #[test]
    fn removing_an_issuance_lowers_distribusi() {
        // Simula a soma antes/depois de apagar uma linha de distribuição
        let helm = item("Helm Safety", 100);
        let issuances = [4_i64, 5, 3];

        let before = HashMap::from([(helm.id, issuances.iter().sum::<i64>())]);
        let after = HashMap::from([(helm.id, issuances[..2].iter().sum::<i64>())]);

        let l1 = compute_rekap(&[helm.clone()], &before, &HashMap::new()).unwrap();
        let l2 = compute_rekap(&[helm], &after, &HashMap::new()).unwrap();

        assert_eq!(l1[0].saldo_akhir, 88);
        assert_eq!(l2[0].saldo_akhir, 91);
    }

    // ---
    // Contra o Postgres (`#[sqlx::test]` cria um banco novo por teste)
    // ---

    fn service() -> RekapService {
        RekapService::new(EquipmentRepository::new(), IssuanceRepository::new(), RekapRepository::new())
    }

    fn day(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn rekap_rows(pool: &PgPool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM monthly_rekap")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres em DATABASE_URL"]
    async fn regenerating_a_period_overwrites_its_rows(pool: PgPool) {
        let helm = EquipmentRepository::new().create(&pool, "Helm Safety", "pcs", 100).await.unwrap();
        let issuances = IssuanceRepository::new();
        let jan = Period::parse("2025-01").unwrap();

        issuances.create(&pool, helm.id, day(2025, 1, 6), "Agus", None, 12).await.unwrap();
        let first = service().generate(&pool, jan, &HashMap::new()).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!((first[0].stock_awal, first[0].distribusi, first[0].saldo_akhir), (100, 12, 88));

        issuances.create(&pool, helm.id, day(2025, 1, 20), "Budi", None, 3).await.unwrap();
        let second = service().generate(&pool, jan, &HashMap::new()).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].id, first[0].id);
        assert_eq!((second[0].distribusi, second[0].saldo_akhir), (15, 85));
        assert_eq!(rekap_rows(&pool).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres em DATABASE_URL"]
    async fn deleted_issuances_leave_the_distribution(pool: PgPool) {
        let masker = EquipmentRepository::new().create(&pool, "Masker", "box", 50).await.unwrap();
        let issuances = IssuanceRepository::new();
        let jan = Period::parse("2025-01").unwrap();

        issuances.create(&pool, masker.id, day(2025, 1, 2), "Agus", None, 4).await.unwrap();
        let wrong = issuances.create(&pool, masker.id, day(2025, 1, 3), "Budi", None, 5).await.unwrap();
        issuances.create(&pool, masker.id, day(2025, 1, 31), "Citra", None, 3).await.unwrap();
        // Outro mês não entra na soma
        issuances.create(&pool, masker.id, day(2025, 2, 1), "Dewi", None, 7).await.unwrap();

        let totals = issuances.distribution_by_period(&pool, jan).await.unwrap();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].total, 12);

        issuances.delete(&pool, wrong.id).await.unwrap();
        let totals = issuances.distribution_by_period(&pool, jan).await.unwrap();
        assert_eq!(totals[0].total, 7);

        let rows = service().generate(&pool, jan, &HashMap::new()).await.unwrap();
        assert_eq!((rows[0].distribusi, rows[0].saldo_akhir), (7, 43));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres em DATABASE_URL"]
    async fn stored_realisasi_survives_regeneration(pool: PgPool) {
        let sepatu = EquipmentRepository::new().create(&pool, "Sepatu Safety", "pasang", 30).await.unwrap();
        let jan = Period::parse("2025-01").unwrap();

        let rows = service()
            .generate(&pool, jan, &HashMap::from([(sepatu.id, 20)]))
            .await
            .unwrap();
        assert_eq!((rows[0].realisasi, rows[0].saldo_akhir), (20, 50));

        // Sem override: mantém o que já estava gravado
        let rows = service().generate(&pool, jan, &HashMap::new()).await.unwrap();
        assert_eq!((rows[0].realisasi, rows[0].saldo_akhir), (20, 50));

        let edited = service().update_realisasi(&pool, rows[0].id, 5).await.unwrap();
        assert_eq!(edited.saldo_akhir, 35);

        let rows = service().generate(&pool, jan, &HashMap::new()).await.unwrap();
        assert_eq!((rows[0].realisasi, rows[0].saldo_akhir), (5, 35));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres em DATABASE_URL"]
    async fn unknown_override_writes_nothing(pool: PgPool) {
        EquipmentRepository::new().create(&pool, "Helm Safety", "pcs", 100).await.unwrap();
        let jan = Period::parse("2025-01").unwrap();

        let result = service()
            .generate(&pool, jan, &HashMap::from([(Uuid::new_v4(), 3)]))
            .await;

        assert!(matches!(result, Err(AppError::ReferenceNotFound(_))));
        assert_eq!(rekap_rows(&pool).await, 0);
    }
}
