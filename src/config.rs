// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        DashboardRepository, EmployeeRepository, EquipmentRepository, FileRepository,
        IssuanceRepository, LoanRepository, MasterRepository, ProcurementRepository,
        RekapRepository, UserRepository,
    },
    services::{
        auth::AuthService, dashboard_service::DashboardService,
        equipment_service::EquipmentService, export_service::ExportService,
        file_service::FileService, loan_service::LoanService, rekap_service::RekapService,
    },
    storage::{FilesystemStorage, ObjectStorage},
};

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_STORAGE_DIR: &str = "./storage";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub storage_dir: PathBuf,
    pub public_base_url: String,
    pub max_upload_bytes: u64,
    /// Vazio = qualquer origem
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = get("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let max_upload_bytes = match get("MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("MAX_UPLOAD_BYTES inválido: '{}'", raw))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let cors_origins = get("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty() && o != "*")
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url,
            jwt_secret,
            server_addr: get("SERVER_ADDR").unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string()),
            storage_dir: get("STORAGE_DIR")
                .unwrap_or_else(|| DEFAULT_STORAGE_DIR.to_string())
                .into(),
            public_base_url: get("PUBLIC_BASE_URL")
                .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string()),
            max_upload_bytes,
            cors_origins,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<AppConfig>,
    pub i18n_store: Arc<I18nStore>,

    pub auth_service: AuthService,
    pub equipment_service: EquipmentService,
    pub rekap_service: RekapService,
    pub file_service: FileService,
    pub loan_service: LoanService,
    pub export_service: ExportService,
    pub dashboard_service: DashboardService,

    // Repositórios usados direto pelos handlers de CRUD simples
    pub master_repo: MasterRepository,
    pub equipment_repo: EquipmentRepository,
    pub employee_repo: EmployeeRepository,
    pub issuance_repo: IssuanceRepository,
    pub loan_repo: LoanRepository,
    pub procurement_repo: ProcurementRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar no banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let storage = FilesystemStorage::new(config.storage_dir.clone(), config.max_upload_bytes)
            .await
            .with_context(|| format!("Falha ao preparar o storage em {:?}", config.storage_dir))?;

        tracing::info!("🗂️ Storage de arquivos em {:?}", config.storage_dir);

        Self::build(config, db_pool, Arc::new(storage))
    }

    /// Monta o gráfico de dependências a partir de peças já prontas.
    pub fn build(
        config: AppConfig,
        db_pool: PgPool,
        storage: Arc<dyn ObjectStorage>,
    ) -> anyhow::Result<Self> {
        let i18n_store = I18nStore::load_embedded()?;

        let user_repo = UserRepository::new(db_pool.clone());
        let equipment_repo = EquipmentRepository::new();
        let issuance_repo = IssuanceRepository::new();
        let rekap_repo = RekapRepository::new();
        let employee_repo = EmployeeRepository::new();
        let loan_repo = LoanRepository::new();
        let procurement_repo = ProcurementRepository::new();

        let auth_service = AuthService::new(user_repo, config.jwt_secret.clone(), db_pool.clone());
        let equipment_service = EquipmentService::new(equipment_repo.clone());
        let rekap_service = RekapService::new(
            equipment_repo.clone(),
            issuance_repo.clone(),
            rekap_repo.clone(),
        );
        let file_service = FileService::new(
            FileRepository::new(),
            storage,
            config.public_base_url.clone(),
        );
        let export_service = ExportService::new(
            rekap_repo,
            issuance_repo.clone(),
            employee_repo.clone(),
            loan_repo.clone(),
            procurement_repo.clone(),
        );
        let loan_service = LoanService::new(loan_repo.clone());
        let dashboard_service = DashboardService::new(DashboardRepository::new());

        Ok(Self {
            db_pool,
            config: Arc::new(config),
            i18n_store: Arc::new(i18n_store),
            auth_service,
            equipment_service,
            rekap_service,
            file_service,
            loan_service,
            export_service,
            dashboard_service,
            master_repo: MasterRepository::new(),
            equipment_repo,
            employee_repo,
            issuance_repo,
            loan_repo,
            procurement_repo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_required_vars_are_set() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/apd"),
            ("JWT_SECRET", "segredo"),
        ]))
        .unwrap();

        assert_eq!(config.server_addr, "0.0.0.0:3000");
        assert_eq!(config.storage_dir, PathBuf::from("./storage"));
        assert_eq!(config.public_base_url, "http://localhost:3000");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn missing_secret_is_an_error() {
        let result = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/apd")]));
        assert!(result.is_err());

        let blank = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/apd"),
            ("JWT_SECRET", "  "),
        ]));
        assert!(blank.is_err());
    }

    #[test]
    fn cors_list_and_upload_limit_are_parsed() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/apd"),
            ("JWT_SECRET", "segredo"),
            ("CORS_ORIGINS", "http://localhost:5173, https://apd.example.com,"),
            ("MAX_UPLOAD_BYTES", "2048"),
        ]))
        .unwrap();

        assert_eq!(config.cors_origins, ["http://localhost:5173", "https://apd.example.com"]);
        assert_eq!(config.max_upload_bytes, 2048);
    }

    #[test]
    fn bad_upload_limit_is_rejected() {
        let result = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/apd"),
            ("JWT_SECRET", "segredo"),
            ("MAX_UPLOAD_BYTES", "dez megas"),
        ]));
        assert!(result.is_err());
    }
}
