// src/services/export_service.rs
//
// Planilhas para download. Cada relatório tem um layout de colunas fixo.

use chrono::NaiveDate;
use sqlx::{Executor, Postgres};

use crate::{
    common::{error::AppError, period::Period},
    db::{EmployeeRepository, IssuanceRepository, LoanRepository, ProcurementRepository, RekapRepository},
    models::{
        employee::{EmployeeFilter, EmployeeListEntry},
        issuance::IssuanceListEntry,
        loan::{LoanFilter, LoanListEntry},
        procurement::ProcurementList,
        rekap::RekapEntry,
    },
};

pub const REKAP_HEADER: [&str; 7] =
    ["No", "Nama APD", "Satuan", "Stock Awal", "Realisasi", "Distribusi", "Saldo Akhir"];
pub const ISSUANCE_HEADER: [&str; 6] = ["No", "Tanggal", "Nama APD", "Penerima", "Workshop", "Jumlah"];
pub const EMPLOYEE_HEADER: [&str; 8] = [
    "No", "NIP", "Nama", "Divisi", "Jabatan", "Ukuran Sepatu", "Warna Helm", "Ukuran Coverall",
];
pub const LOAN_HEADER: [&str; 8] = [
    "No", "Peminjam", "Divisi", "Nama Barang", "Jumlah", "Tanggal Pinjam", "Tanggal Kembali", "Status",
];
pub const PROCUREMENT_HEADER: [&str; 9] = [
    "No", "Proyek", "Lokasi", "Pemohon", "Nama Barang", "Satuan", "Jumlah", "Harga", "Total",
];

/// Arquivo pronto para o navegador baixar.
pub struct Export {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Export {
    pub const CONTENT_TYPE: &'static str = "text/csv; charset=utf-8";
}

fn fmt_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, AppError> {
    writer
        .into_inner()
        .map_err(|e| AppError::InternalServerError(anyhow::anyhow!("falha ao finalizar planilha: {}", e)))
}

pub fn rekap_csv(entries: &[RekapEntry]) -> Result<Vec<u8>, AppError> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(REKAP_HEADER)?;
    for (i, e) in entries.iter().enumerate() {
        w.write_record([
            (i + 1).to_string(),
            e.item_name.clone(),
            e.item_unit.clone(),
            e.stock_awal.to_string(),
            e.realisasi.to_string(),
            e.distribusi.to_string(),
            e.saldo_akhir.to_string(),
        ])?;
    }
    finish(w)
}

pub fn issuance_csv(entries: &[IssuanceListEntry]) -> Result<Vec<u8>, AppError> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(ISSUANCE_HEADER)?;
    for (i, e) in entries.iter().enumerate() {
        w.write_record([
            (i + 1).to_string(),
            fmt_date(e.issued_on),
            e.item_name.clone(),
            e.recipient_name.clone(),
            opt(&e.workshop_name).to_string(),
            e.quantity.to_string(),
        ])?;
    }
    finish(w)
}

pub fn employees_csv(entries: &[EmployeeListEntry]) -> Result<Vec<u8>, AppError> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(EMPLOYEE_HEADER)?;
    for (i, e) in entries.iter().enumerate() {
        w.write_record([
            (i + 1).to_string().as_str(),
            e.employee_number.as_str(),
            e.name.as_str(),
            opt(&e.division_name),
            opt(&e.position_name),
            opt(&e.shoe_size),
            opt(&e.helmet_color),
            opt(&e.coverall_size),
        ])?;
    }
    finish(w)
}

pub fn loans_csv(entries: &[LoanListEntry]) -> Result<Vec<u8>, AppError> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(LOAN_HEADER)?;
    for (i, e) in entries.iter().enumerate() {
        w.write_record([
            (i + 1).to_string(),
            e.borrower_name.clone(),
            opt(&e.division_name).to_string(),
            e.item_name.clone(),
            e.quantity.to_string(),
            fmt_date(e.borrowed_on),
            e.returned_on.map(fmt_date).unwrap_or_default(),
            e.status().label().to_string(),
        ])?;
    }
    finish(w)
}

pub fn procurement_csv(list: &ProcurementList) -> Result<Vec<u8>, AppError> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(PROCUREMENT_HEADER)?;
    for (i, p) in list.items.iter().enumerate() {
        w.write_record([
            (i + 1).to_string(),
            p.project_name.clone(),
            opt(&p.project_location).to_string(),
            opt(&p.requested_by).to_string(),
            p.item_name.clone(),
            p.unit.clone(),
            p.quantity.to_string(),
            format!("{:.2}", p.unit_price),
            format!("{:.2}", p.total),
        ])?;
    }
    // Linha de total geral, alinhada com a coluna "Total"
    let mut total_row = vec![String::new(); PROCUREMENT_HEADER.len()];
    total_row[0] = "TOTAL".to_string();
    total_row[PROCUREMENT_HEADER.len() - 1] = format!("{:.2}", list.grand_total);
    w.write_record(&total_row)?;
    finish(w)
}

#[derive(Clone)]
pub struct ExportService {
    rekap_repo: RekapRepository,
    issuance_repo: IssuanceRepository,
    employee_repo: EmployeeRepository,
    loan_repo: LoanRepository,
    procurement_repo: ProcurementRepository,
}

impl ExportService {
    pub fn new(
        rekap_repo: RekapRepository,
        issuance_repo: IssuanceRepository,
        employee_repo: EmployeeRepository,
        loan_repo: LoanRepository,
        procurement_repo: ProcurementRepository,
    ) -> Self {
        Self { rekap_repo, issuance_repo, employee_repo, loan_repo, procurement_repo }
    }

    pub async fn rekap<'e, E>(&self, executor: E, period: Period) -> Result<Export, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entries = self.rekap_repo.list_period(executor, period).await?;
        Ok(Export {
            filename: format!("rekap-{}.csv", period.label()),
            bytes: rekap_csv(&entries)?,
        })
    }

    pub async fn issuances<'e, E>(&self, executor: E, period: Period) -> Result<Export, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut entries = self.issuance_repo.list(executor, Some(period), None).await?;
        // Planilha em ordem cronológica
        entries.reverse();
        Ok(Export {
            filename: format!("distribusi-{}.csv", period.label()),
            bytes: issuance_csv(&entries)?,
        })
    }

    pub async fn employees<'e, E>(&self, executor: E) -> Result<Export, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entries = self.employee_repo.list(executor, &EmployeeFilter::default()).await?;
        Ok(Export { filename: "karyawan.csv".to_string(), bytes: employees_csv(&entries)? })
    }

    pub async fn loans<'e, E>(&self, executor: E, filter: &LoanFilter) -> Result<Export, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entries = self.loan_repo.list(executor, filter).await?;
        Ok(Export { filename: "peminjaman.csv".to_string(), bytes: loans_csv(&entries)? })
    }

    pub async fn procurements<'e, E>(&self, executor: E) -> Result<Export, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = self.procurement_repo.list(executor, None).await?;
        let list = ProcurementList::new(items);
        Ok(Export { filename: "pengadaan.csv".to_string(), bytes: procurement_csv(&list)? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use uuid::Uuid;

    use crate::models::procurement::ProcurementRequest;

    fn rows(bytes: &[u8]) -> Vec<Vec<String>> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(bytes)
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn rekap_sheet_has_fixed_columns_and_numbered_rows() {
        let entries = vec![RekapEntry {
            id: Uuid::new_v4(),
            item_id: Uuid::new_v4(),
            item_name: "Helm Safety".into(),
            item_unit: "pcs".into(),
            period: d(2025, 1, 1),
            stock_awal: 100,
            realisasi: 0,
            distribusi: 12,
            saldo_akhir: 88,
        }];

        let sheet = rows(&rekap_csv(&entries).unwrap());

        assert_eq!(sheet[0], REKAP_HEADER);
        assert_eq!(sheet[1], ["1", "Helm Safety", "pcs", "100", "0", "12", "88"]);
    }

    #[test]
    fn empty_report_still_has_its_header() {
        let sheet = rows(&issuance_csv(&[]).unwrap());
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet[0], ISSUANCE_HEADER);
    }

    #[test]
    fn issuance_dates_use_day_month_year() {
        let entries = vec![IssuanceListEntry {
            id: Uuid::new_v4(),
            item_id: Uuid::new_v4(),
            item_name: "Masker".into(),
            item_unit: "box".into(),
            issued_on: d(2025, 1, 9),
            recipient_name: "Agus, Budi".into(),
            workshop_id: None,
            workshop_name: None,
            quantity: 3,
            period: d(2025, 1, 1),
        }];
        let sheet = rows(&issuance_csv(&entries).unwrap());
        // A vírgula no nome não pode quebrar as colunas
        assert_eq!(sheet[1], ["1", "09/01/2025", "Masker", "Agus, Budi", "", "3"]);
    }

    #[test]
    fn loan_status_is_spelled_out() {
        let base = LoanListEntry {
            id: Uuid::new_v4(),
            borrower_name: "Dewi".into(),
            division_id: None,
            division_name: Some("HSE".into()),
            item_name: "Harness".into(),
            quantity: 1,
            borrowed_on: d(2025, 2, 1),
            returned_on: None,
            notes: None,
        };
        let returned = LoanListEntry { returned_on: Some(d(2025, 2, 3)), ..base.clone() };

        let sheet = rows(&loans_csv(&[base, returned]).unwrap());
        assert_eq!(sheet[1][6], "");
        assert_eq!(sheet[1][7], "Dipinjam");
        assert_eq!(sheet[2][6], "03/02/2025");
        assert_eq!(sheet[2][7], "Dikembalikan");
    }

    #[test]
    fn procurement_sheet_ends_with_the_grand_total() {
        let price = Decimal::from_str("35000").unwrap();
        let request = ProcurementRequest {
            id: Uuid::new_v4(),
            project_name: "Jembatan".into(),
            project_location: Some("Kediri".into()),
            requested_by: None,
            item_name: "Sarung Tangan".into(),
            unit: "pasang".into(),
            quantity: 50,
            unit_price: price,
            total: price * Decimal::from(50),
            requested_on: d(2025, 1, 1),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let list = ProcurementList::new(vec![request.clone(), request]);

        let sheet = rows(&procurement_csv(&list).unwrap());

        assert_eq!(sheet.len(), 4);
        assert_eq!(sheet[1][8], "1750000.00");
        let last = sheet.last().unwrap();
        assert_eq!(last[0], "TOTAL");
        assert_eq!(last[8], "3500000.00");
        assert_eq!(last.len(), PROCUREMENT_HEADER.len());
    }
}
