use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::chart::ChartData;
use super::domain::{Alumni, AlumniDetail, AlumniFields, AlumniFilter, AlumniInput, AlumniPatch, AlumniSummary};
use super::import::{self, ImportReport};
use super::password::hash_password;
use super::repository::AlumniRepository;
use crate::errors::{ServiceError, INTERNAL_ERROR_MESSAGE};
use crate::pagination::{build_page, Cursor, CursorPage, Window, PAGE_SIZE};

pub const NOT_FOUND_MESSAGE: &str = "data alumni tidak ditemukan";

/// Alumni business service independent of web framework
pub struct AlumniService {
    repo: Arc<dyn AlumniRepository>,
    max_import_rows: usize,
}

impl AlumniService {
    pub fn new(repo: Arc<dyn AlumniRepository>) -> Self {
        Self { repo, max_import_rows: 5000 }
    }

    pub fn with_import_limit(mut self, max_rows: usize) -> Self {
        self.max_import_rows = max_rows;
        self
    }

    /// One page of the filtered listing, ordered by id.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::AlumniService;
    /// use service::alumni::domain::AlumniFilter;
    /// use service::alumni::repository::memory::MemoryAlumniRepository;
    /// let svc = AlumniService::new(Arc::new(MemoryAlumniRepository::new()));
    /// let page = tokio_test::block_on(svc.list(AlumniFilter::default(), None)).unwrap();
    /// assert!(page.items.is_empty());
    /// assert!(page.next.is_none() && page.previous.is_none());
    /// ```
    #[instrument(skip(self, cursor))]
    pub async fn list(&self, filter: AlumniFilter, cursor: Option<&str>) -> Result<CursorPage<AlumniSummary>, ServiceError> {
        let cursor = match cursor.map(str::trim).filter(|c| !c.is_empty()) {
            Some(token) => Some(Cursor::decode(token)?),
            None => None,
        };
        let window = Window::new(cursor, PAGE_SIZE);
        let rows = self.repo.list(&filter, &window).await?;
        debug!(fetched = rows.len(), "alumni_listed");
        Ok(build_page(rows, &window, PAGE_SIZE, |r| r.id))
    }

    #[instrument(skip(self))]
    pub async fn detail(&self, id: Uuid) -> Result<AlumniDetail, ServiceError> {
        self.repo
            .find_detail(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Alumni dengan id: {id} tidak ada")))
    }

    /// Exact-match lookup. Blank input is never taken.
    #[instrument(skip(self))]
    pub async fn email_exists(&self, email: &str) -> Result<bool, ServiceError> {
        let email = email.trim();
        if email.is_empty() {
            return Ok(false);
        }
        self.repo.email_exists(email).await
    }

    /// Validate, hash the password and store a new record.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::AlumniService;
    /// use service::alumni::repository::memory::MemoryAlumniRepository;
    /// let svc = AlumniService::new(Arc::new(MemoryAlumniRepository::new()));
    /// let input = serde_json::from_value(serde_json::json!({
    ///     "nama": "Jane", "email": "jane@example.com", "tahun_mulai": 2016, "tahun_lulus": 2020
    /// })).unwrap();
    /// let created = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(created.fields.nama, "Jane");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create(&self, input: AlumniInput) -> Result<Alumni, ServiceError> {
        let (fields, password) = input.into_parts();
        self.check(&fields).await?;
        let hash = password.as_deref().map(hash_password).transpose()?;
        let created = self.repo.insert(&fields, hash).await?;
        info!(alumni_id = %created.id, "alumni_created");
        Ok(created)
    }

    /// Merge `patch` onto the stored record and re-validate the result.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: Uuid, patch: AlumniPatch) -> Result<Alumni, ServiceError> {
        let current = self
            .repo
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND_MESSAGE.into()))?;
        let mut fields = current.fields;
        let password = patch.apply_to(&mut fields);
        self.check(&fields).await?;
        let hash = password.as_deref().map(hash_password).transpose()?;
        let updated = self
            .repo
            .update(id, &fields, hash)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND_MESSAGE.into()))?;
        info!(alumni_id = %id, "alumni_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::NotFound(NOT_FOUND_MESSAGE.into()));
        }
        info!(alumni_id = %id, "alumni_deleted");
        Ok(())
    }

    /// Import every row of an uploaded workbook or CSV through the create
    /// path. Rows are committed one by one; a failing row is reported and
    /// skipped.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn import_spreadsheet(&self, bytes: &[u8]) -> Result<ImportReport, ServiceError> {
        let rows = import::parse_upload(bytes, self.max_import_rows)?;
        let mut report = ImportReport::default();
        for row in rows {
            let outcome = match row.input {
                Ok(input) => self.create(input).await,
                Err(message) => Err(ServiceError::Validation(message)),
            };
            match outcome {
                Ok(created) => report.record_success(row.line, created.id),
                Err(e) if e.is_validation() => report.record_failure(row.line, e.message()),
                Err(e) => {
                    warn!(row = row.line, error = %e, "import_row_failed");
                    report.record_failure(row.line, INTERNAL_ERROR_MESSAGE);
                }
            }
        }
        info!(total = report.total, imported = report.imported, failed = report.failed, "alumni_imported");
        Ok(report)
    }

    #[instrument(skip(self))]
    pub async fn chart(&self, tahun_lulus: Option<i32>) -> Result<ChartData, ServiceError> {
        let counts = self.repo.chart_counts(tahun_lulus).await?;
        Ok(ChartData::from(counts))
    }

    async fn check(&self, fields: &AlumniFields) -> Result<(), ServiceError> {
        fields.validate()?;
        if let Some(jid) = fields.jurusan_id {
            if !self.repo.jurusan_exists(jid).await? {
                return Err(ServiceError::Validation(format!("jurusan dengan id: {jid} tidak ada")));
            }
        }
        Ok(())
    }
}
