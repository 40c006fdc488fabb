//! Schema-only mirrors of the wire types, for the generated OpenAPI document.

use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct AlumniInputDoc {
    pub nama: String,
    pub email: String,
    pub password: Option<String>,
    pub tempat_kerja: Option<String>,
    pub jabatan_kerja: Option<String>,
    pub tempat_kuliah: Option<String>,
    pub prodi_kuliah: Option<String>,
    pub tahun_mulai: i32,
    pub tahun_lulus: i32,
    pub kesesuaian_kerja: Option<bool>,
    pub kesesuaian_kuliah: Option<bool>,
    pub jurusan_id: Option<Uuid>,
}

/// Every member optional; `null` clears a nullable column.
#[derive(ToSchema)]
pub struct AlumniPatchDoc {
    pub nama: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub tempat_kerja: Option<String>,
    pub jabatan_kerja: Option<String>,
    pub tempat_kuliah: Option<String>,
    pub prodi_kuliah: Option<String>,
    pub tahun_mulai: Option<i32>,
    pub tahun_lulus: Option<i32>,
    pub kesesuaian_kerja: Option<bool>,
    pub kesesuaian_kuliah: Option<bool>,
    pub jurusan_id: Option<Uuid>,
}

#[derive(ToSchema)]
pub struct AlumniDoc {
    pub id: Uuid,
    pub nama: String,
    pub email: String,
    pub tempat_kerja: Option<String>,
    pub jabatan_kerja: Option<String>,
    pub tempat_kuliah: Option<String>,
    pub prodi_kuliah: Option<String>,
    pub tahun_mulai: i32,
    pub tahun_lulus: i32,
    pub kesesuaian_kerja: bool,
    pub kesesuaian_kuliah: bool,
    pub jurusan_id: Option<Uuid>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct JurusanDoc { pub id: Uuid, pub nama: String }

/// [`AlumniDoc`] members plus the embedded major.
#[derive(ToSchema)]
pub struct AlumniDetailDoc {
    pub id: Uuid,
    pub nama: String,
    pub email: String,
    pub tempat_kerja: Option<String>,
    pub jabatan_kerja: Option<String>,
    pub tempat_kuliah: Option<String>,
    pub prodi_kuliah: Option<String>,
    pub tahun_mulai: i32,
    pub tahun_lulus: i32,
    pub kesesuaian_kerja: bool,
    pub kesesuaian_kuliah: bool,
    pub jurusan_id: Option<Uuid>,
    pub created_at: String,
    pub updated_at: String,
    pub jurusan: Option<JurusanDoc>,
}

#[derive(ToSchema)]
pub struct AlumniSummaryDoc {
    pub id: Uuid,
    pub nama: String,
    pub tempat_kerja: Option<String>,
    pub jabatan_kerja: Option<String>,
    pub tempat_kuliah: Option<String>,
    pub prodi_kuliah: Option<String>,
    pub tahun_mulai: i32,
    pub tahun_lulus: i32,
}

#[derive(ToSchema)]
pub struct PaginationDoc { pub next: Option<String>, pub previous: Option<String> }

#[derive(ToSchema)]
pub struct AlumniListDoc {
    pub status: String,
    pub data: Vec<AlumniSummaryDoc>,
    pub pagination: PaginationDoc,
}

#[derive(ToSchema)]
pub struct RowOutcomeDoc {
    pub row: u64,
    pub status: String,
    pub id: Option<Uuid>,
    pub message: Option<String>,
}

#[derive(ToSchema)]
pub struct ImportReportDoc {
    pub total: usize,
    pub imported: usize,
    pub failed: usize,
    pub rows: Vec<RowOutcomeDoc>,
}

#[derive(ToSchema)]
pub struct BarDataDoc {
    pub total_pengangguran: u64,
    pub total_kuliah: u64,
    pub total_kerja: u64,
    pub total_kuliah_dan_kerja: u64,
}

#[derive(ToSchema)]
pub struct PieDataDoc {
    pub pct_tidak_sesuai: u64,
    pub pct_kuliah_sesuai: u64,
    pub pct_kerja_sesuai: u64,
}

#[derive(ToSchema)]
pub struct ChartDoc { pub bar_data: BarDataDoc, pub pie_data: PieDataDoc }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::alumni::list,
        crate::routes::alumni::detail,
        crate::routes::alumni::check_email,
        crate::routes::alumni::create,
        crate::routes::alumni::update,
        crate::routes::alumni::delete_by_query,
        crate::routes::alumni::delete_by_path,
        crate::routes::alumni::import,
        crate::routes::alumni::chart,
    ),
    components(
        schemas(
            HealthResponse,
            AlumniInputDoc,
            AlumniPatchDoc,
            AlumniDoc,
            JurusanDoc,
            AlumniDetailDoc,
            AlumniSummaryDoc,
            PaginationDoc,
            AlumniListDoc,
            RowOutcomeDoc,
            ImportReportDoc,
            BarDataDoc,
            PieDataDoc,
            ChartDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "alumni")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_alumni_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/alumni", "/alumni/{id}", "/alumni/check-email", "/alumni/import", "/alumni/chart"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
