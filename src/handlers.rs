pub mod auth;
pub mod dashboard;
pub mod employee;
pub mod equipment;
pub mod export;
pub mod files;
pub mod issuance;
pub mod loan;
pub mod master;
pub mod procurement;
pub mod rekap;

use serde::Deserialize;
use utoipa::IntoParams;

use crate::common::{error::AppError, period::Period};

// Query strings usadas por mais de um módulo

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Busca por nome (sem diferenciar maiúsculas)
    pub q: Option<String>,
}

impl SearchQuery {
    pub fn term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeriodQuery {
    /// `YYYY-MM` ou `YYYY-MM-DD`; sem valor, o mês corrente
    #[param(example = "2025-01")]
    pub period: Option<String>,
}

impl PeriodQuery {
    pub fn resolve(&self) -> Result<Period, AppError> {
        match self.period.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Period::parse(raw),
            _ => Ok(Period::current()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_search_is_no_search() {
        assert_eq!(SearchQuery { q: Some("  ".into()) }.term(), None);
        assert_eq!(SearchQuery { q: Some(" helm ".into()) }.term(), Some("helm"));
    }

    #[test]
    fn missing_period_means_current_month() {
        assert_eq!(PeriodQuery::default().resolve().unwrap(), Period::current());
        assert_eq!(
            PeriodQuery { period: Some("2025-01".into()) }.resolve().unwrap().label(),
            "2025-01"
        );
        assert!(PeriodQuery { period: Some("januari".into()) }.resolve().is_err());
    }
}
