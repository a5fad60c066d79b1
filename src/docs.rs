// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "APD Dashboard API",
        description = "Estoque, distribuição e rekap mensal de APD"
    ),
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Equipment ---
        handlers::equipment::list_equipment,
        handlers::equipment::create_equipment,
        handlers::equipment::get_equipment,
        handlers::equipment::update_equipment,
        handlers::equipment::delete_equipment,
        handlers::equipment::stock_opname,

        // --- Master Data ---
        handlers::master::list_workshops,
        handlers::master::create_workshop,
        handlers::master::rename_workshop,
        handlers::master::delete_workshop,
        handlers::master::list_divisions,
        handlers::master::create_division,
        handlers::master::rename_division,
        handlers::master::delete_division,
        handlers::master::list_positions,
        handlers::master::create_position,
        handlers::master::rename_position,
        handlers::master::delete_position,

        // --- Employees ---
        handlers::employee::list_employees,
        handlers::employee::create_employee,
        handlers::employee::get_employee,
        handlers::employee::update_employee,
        handlers::employee::delete_employee,

        // --- Issuances ---
        handlers::issuance::list_issuances,
        handlers::issuance::create_issuance,
        handlers::issuance::delete_issuance,

        // --- Rekap ---
        handlers::rekap::list_rekap,
        handlers::rekap::generate_rekap,
        handlers::rekap::update_realisasi,
        handlers::rekap::delete_rekap,

        // --- Loans ---
        handlers::loan::list_loans,
        handlers::loan::create_loan,
        handlers::loan::get_loan,
        handlers::loan::update_loan,
        handlers::loan::return_loan,
        handlers::loan::delete_loan,

        // --- Procurement ---
        handlers::procurement::list_procurements,
        handlers::procurement::create_procurement,
        handlers::procurement::get_procurement,
        handlers::procurement::update_procurement,
        handlers::procurement::delete_procurement,

        // --- Files ---
        handlers::files::upload_file,
        handlers::files::list_files,
        handlers::files::delete_file,
        handlers::files::download_file,

        // --- Export ---
        handlers::export::export_rekap,
        handlers::export::export_issuances,
        handlers::export::export_employees,
        handlers::export::export_loans,
        handlers::export::export_procurements,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Equipment ---
            models::equipment::EquipmentItem,
            handlers::equipment::CreateEquipmentPayload,
            handlers::equipment::UpdateEquipmentPayload,
            handlers::equipment::StockOpnamePayload,

            // --- Master Data ---
            models::master::MasterRecord,
            handlers::master::MasterPayload,

            // --- Employees ---
            models::employee::Employee,
            models::employee::EmployeeListEntry,
            models::employee::EmployeeInput,

            // --- Issuances / Rekap ---
            models::issuance::DailyIssuance,
            models::issuance::IssuanceListEntry,
            handlers::issuance::CreateIssuancePayload,
            models::rekap::RekapRow,
            models::rekap::RekapEntry,
            handlers::rekap::GenerateRekapPayload,
            handlers::rekap::UpdateRealisasiPayload,
            handlers::rekap::DeletedRekap,

            // --- Loans ---
            models::loan::Loan,
            models::loan::LoanListEntry,
            models::loan::LoanStatus,
            models::loan::LoanInput,
            handlers::loan::ReturnLoanPayload,

            // --- Procurement ---
            models::procurement::ProcurementRequest,
            models::procurement::ProcurementList,
            models::procurement::ProcurementInput,

            // --- Files ---
            models::file::FileKind,
            models::file::FileRecord,
            handlers::files::UploadForm,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Equipment", description = "Itens de APD e stock opname"),
        (name = "Master Data", description = "Workshops, divisões e cargos"),
        (name = "Employees", description = "Cadastro de karyawan"),
        (name = "Issuances", description = "Distribuição diária de consumíveis"),
        (name = "Rekap", description = "Rekap mensal (saldo_akhir = stock_awal + realisasi - distribusi)"),
        (name = "Loans", description = "Empréstimo de equipamentos"),
        (name = "Procurement", description = "Pedidos de compra"),
        (name = "Files", description = "Upload e download de documentos"),
        (name = "Export", description = "Planilhas CSV"),
        (name = "Dashboard", description = "Indicadores do painel")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
