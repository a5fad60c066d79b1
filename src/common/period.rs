// src/common/period.rs

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::common::error::AppError;

/// Mês de referência (periode). Sempre o dia 1 do mês.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period(NaiveDate);

impl Period {
    pub fn of(date: NaiveDate) -> Self {
        // with_day(1) nunca falha: todo mês tem dia 1
        Period(date.with_day(1).unwrap_or(date))
    }

    pub fn from_ym(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Period)
    }

    /// Aceita `YYYY-MM` ou uma data completa `YYYY-MM-DD` (normalizada para o dia 1).
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        let invalid = || AppError::InvalidPeriod(raw.to_string());

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(Period::of(date));
        }

        let (year, month) = trimmed.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(invalid());
        }
        // `parse` aceitaria um "+" na frente
        if !year.chars().chain(month.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Period::from_ym(year, month).ok_or_else(invalid)
    }

    pub fn current() -> Self {
        Period::of(chrono::Local::now().date_naive())
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// Primeiro dia do mês seguinte (limite exclusivo para filtros por data).
    pub fn next(&self) -> Period {
        let (year, month) = if self.0.month() == 12 {
            (self.0.year() + 1, 1)
        } else {
            (self.0.year(), self.0.month() + 1)
        };
        Period::from_ym(year, month).unwrap_or(*self)
    }

    /// `YYYY-MM`, usado em nomes de arquivo.
    pub fn label(&self) -> String {
        self.0.format("%Y-%m").to_string()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl TryFrom<String> for Period {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Period::parse(&value)
    }
}

impl From<Period> for String {
    fn from(p: Period) -> Self {
        p.to_string()
    }
}

impl From<Period> for NaiveDate {
    fn from(p: Period) -> Self {
        p.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn any_day_buckets_into_its_month() {
        assert_eq!(Period::of(d(2025, 1, 31)).first_day(), d(2025, 1, 1));
        assert_eq!(Period::of(d(2024, 2, 29)).first_day(), d(2024, 2, 1));
    }

    #[test]
    fn parses_month_and_full_date_forms() {
        assert_eq!(Period::parse("2025-01").unwrap().first_day(), d(2025, 1, 1));
        assert_eq!(Period::parse("2025-1").unwrap().first_day(), d(2025, 1, 1));
        assert_eq!(Period::parse("2025-01-01").unwrap().first_day(), d(2025, 1, 1));
        assert_eq!(Period::parse(" 2025-03-17 ").unwrap().first_day(), d(2025, 3, 1));
    }

    #[test]
    fn rejects_garbage() {
        for raw in ["", "2025", "2025-13", "2025-00", "25-01", "2025/01", "jan-2025", "2025-001", "2025-+1", "+202-01", "2025- 1"] {
            assert!(
                matches!(Period::parse(raw), Err(AppError::InvalidPeriod(_))),
                "aceitou '{}'",
                raw
            );
        }
    }

    #[test]
    fn next_rolls_over_the_year() {
        assert_eq!(Period::parse("2024-12").unwrap().next().first_day(), d(2025, 1, 1));
        assert_eq!(Period::parse("2025-06").unwrap().next().first_day(), d(2025, 7, 1));
    }

    #[test]
    fn serde_uses_the_first_day_string() {
        let p: Period = serde_json::from_str("\"2025-01\"").unwrap();
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"2025-01-01\"");
        assert_eq!(p.label(), "2025-01");
        assert!(serde_json::from_str::<Period>("\"2025-13\"").is_err());
    }
}
