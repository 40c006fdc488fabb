use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use common::response::ApiResponse;
use service::alumni::chart::ChartData;
use service::alumni::domain::{Alumni, AlumniDetail, AlumniFilter, AlumniInput, AlumniPatch, AlumniSummary};
use service::alumni::import::ImportReport;
use service::alumni::service::NOT_FOUND_MESSAGE;

use crate::errors::ApiError;
use crate::routes::ServerState;

/// Multipart field carrying the spreadsheet.
pub const IMPORT_FIELD: &str = "alumni_excel";

type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub tahun_mulai: Option<String>,
    pub tahun_lulus: Option<String>,
    pub cursor: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    pub alumni_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    pub tahun_lulus: Option<String>,
}

/// Year query parameter; blank counts as absent.
fn year_param(field: &str, value: Option<&str>) -> Result<Option<i32>, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse::<i32>()
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("{field} harus berupa angka"))),
    }
}

fn id_param(value: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(value.trim()).map_err(|_| ApiError::bad_request(format!("id tidak valid: {value}")))
}

fn path_id(path: Result<Path<String>, PathRejection>) -> Result<Uuid, ApiError> {
    let Path(raw) = path?;
    id_param(&raw)
}

#[utoipa::path(
    get,
    path = "/alumni",
    tag = "alumni",
    params(
        ("search" = Option<String>, Query, description = "Substring of nama, tempat_kerja or tempat_kuliah (case-insensitive)"),
        ("tahun_mulai" = Option<i32>, Query, description = "Exact start year"),
        ("tahun_lulus" = Option<i32>, Query, description = "Exact graduation year"),
        ("cursor" = Option<String>, Query, description = "Opaque cursor from a previous page"),
    ),
    responses((status = 200, description = "One page of alumni", body = crate::openapi::AlumniListDoc), (status = 400, description = "Bad filter or cursor"))
)]
pub async fn list(State(state): State<ServerState>, query: Result<Query<ListQuery>, QueryRejection>) -> ApiResult<Vec<AlumniSummary>> {
    let Query(q) = query?;
    let filter = AlumniFilter {
        search: q.search,
        tahun_mulai: year_param("tahun_mulai", q.tahun_mulai.as_deref())?,
        tahun_lulus: year_param("tahun_lulus", q.tahun_lulus.as_deref())?,
    };
    let page = state.alumni.list(filter, q.cursor.as_deref()).await?;
    Ok(ApiResponse::success().data(page.items).pagination(page.next, page.previous))
}

#[utoipa::path(
    get,
    path = "/alumni/{id}",
    tag = "alumni",
    params(("id" = Uuid, Path, description = "Alumni id")),
    responses((status = 200, description = "Alumni with its jurusan", body = crate::openapi::AlumniDetailDoc), (status = 404, description = "Not found"))
)]
pub async fn detail(State(state): State<ServerState>, path: Result<Path<String>, PathRejection>) -> ApiResult<AlumniDetail> {
    let id = path_id(path)?;
    let found = state.alumni.detail(id).await?;
    Ok(ApiResponse::success().data(found))
}

#[utoipa::path(
    get,
    path = "/alumni/check-email",
    tag = "alumni",
    params(("email" = String, Query, description = "Email to check (exact match)")),
    responses((status = 200, description = "`data` is true when the email is taken"))
)]
pub async fn check_email(State(state): State<ServerState>, query: Result<Query<EmailQuery>, QueryRejection>) -> ApiResult<bool> {
    let Query(q) = query?;
    let exists = state.alumni.email_exists(q.email.as_deref().unwrap_or_default()).await?;
    Ok(ApiResponse::success().data(exists))
}

#[utoipa::path(
    post,
    path = "/alumni",
    tag = "alumni",
    request_body = crate::openapi::AlumniInputDoc,
    responses((status = 201, description = "Created", body = crate::openapi::AlumniDoc), (status = 400, description = "Validation failed"))
)]
pub async fn create(State(state): State<ServerState>, payload: Result<Json<AlumniInput>, JsonRejection>) -> ApiResult<Alumni> {
    let Json(input) = payload?;
    let created = state.alumni.create(input).await?;
    info!(alumni_id = %created.id, "alumni_create_request");
    Ok(ApiResponse::success()
        .message("Sukses menambah data alumni baru")
        .data(created)
        .status_code(StatusCode::CREATED))
}

#[utoipa::path(
    put,
    path = "/alumni/{id}",
    tag = "alumni",
    params(("id" = Uuid, Path, description = "Alumni id")),
    request_body = crate::openapi::AlumniPatchDoc,
    responses((status = 200, description = "Updated", body = crate::openapi::AlumniDoc), (status = 400, description = "Validation failed"), (status = 404, description = "Not found"))
)]
pub async fn update(
    State(state): State<ServerState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<AlumniPatch>, JsonRejection>,
) -> ApiResult<Alumni> {
    let id = path_id(path)?;
    let Json(patch) = payload?;
    let updated = state.alumni.update(id, patch).await?;
    Ok(ApiResponse::success().message("sukses memperbarui data alumni").data(updated))
}

#[utoipa::path(
    delete,
    path = "/alumni",
    tag = "alumni",
    params(("alumni_id" = Uuid, Query, description = "Alumni id")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not found"))
)]
pub async fn delete_by_query(State(state): State<ServerState>, query: Result<Query<DeleteQuery>, QueryRejection>) -> ApiResult<()> {
    let Query(q) = query?;
    let raw = q
        .alumni_id
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::not_found(NOT_FOUND_MESSAGE))?;
    remove(&state, id_param(&raw)?).await
}

#[utoipa::path(
    delete,
    path = "/alumni/{id}",
    tag = "alumni",
    params(("id" = Uuid, Path, description = "Alumni id")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not found"))
)]
pub async fn delete_by_path(State(state): State<ServerState>, path: Result<Path<String>, PathRejection>) -> ApiResult<()> {
    let id = path_id(path)?;
    remove(&state, id).await
}

async fn remove(state: &ServerState, id: Uuid) -> ApiResult<()> {
    state.alumni.delete(id).await?;
    Ok(ApiResponse::success().message("data alumni berhasil dihapus"))
}

#[utoipa::path(
    post,
    path = "/alumni/import",
    tag = "alumni",
    request_body(content = String, content_type = "multipart/form-data", description = "Excel (xlsx, xls, ods) or CSV file in field `alumni_excel`"),
    responses((status = 200, description = "Per-row import report", body = crate::openapi::ImportReportDoc), (status = 400, description = "File rejected"))
)]
pub async fn import(State(state): State<ServerState>, multipart: Result<Multipart, MultipartRejection>) -> ApiResult<ImportReport> {
    let mut multipart = multipart?;
    let mut file = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(IMPORT_FIELD) {
            file = Some(field.bytes().await?);
            break;
        }
    }
    let bytes = file.ok_or_else(|| ApiError::bad_request(format!("file {IMPORT_FIELD} wajib diunggah")))?;

    let report = state.alumni.import_spreadsheet(&bytes).await?;
    let message = if report.is_clean() {
        "Sukses import excel".to_string()
    } else {
        format!("{} dari {} baris gagal diimport", report.failed, report.total)
    };
    Ok(ApiResponse::success().message(message).data(report))
}

#[utoipa::path(
    get,
    path = "/alumni/chart",
    tag = "alumni",
    params(("tahun_lulus" = Option<i32>, Query, description = "Restrict every count to one graduation year")),
    responses((status = 200, description = "Bar and pie data", body = crate::openapi::ChartDoc))
)]
pub async fn chart(State(state): State<ServerState>, query: Result<Query<ChartQuery>, QueryRejection>) -> ApiResult<ChartData> {
    let Query(q) = query?;
    let data = state.alumni.chart(year_param("tahun_lulus", q.tahun_lulus.as_deref())?).await?;
    Ok(ApiResponse::success().data(data))
}
