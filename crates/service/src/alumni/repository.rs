use async_trait::async_trait;
use uuid::Uuid;

use super::chart::ChartCounts;
use super::domain::{Alumni, AlumniDetail, AlumniFields, AlumniFilter, AlumniSummary};
use crate::errors::ServiceError;
use crate::pagination::Window;

/// Storage port for alumni records.
#[async_trait]
pub trait AlumniRepository: Send + Sync {
    /// Rows matching `filter` beyond the window's cursor, in the window's
    /// direction, at most `window.fetch` of them.
    async fn list(&self, filter: &AlumniFilter, window: &Window) -> Result<Vec<AlumniSummary>, ServiceError>;
    async fn find(&self, id: Uuid) -> Result<Option<Alumni>, ServiceError>;
    async fn find_detail(&self, id: Uuid) -> Result<Option<AlumniDetail>, ServiceError>;
    async fn email_exists(&self, email: &str) -> Result<bool, ServiceError>;
    async fn jurusan_exists(&self, id: Uuid) -> Result<bool, ServiceError>;

    async fn insert(&self, fields: &AlumniFields, password_hash: Option<String>) -> Result<Alumni, ServiceError>;
    /// `password_hash: None` keeps the stored credential. Returns `None` when
    /// the row does not exist.
    async fn update(&self, id: Uuid, fields: &AlumniFields, password_hash: Option<String>) -> Result<Option<Alumni>, ServiceError>;
    /// `false` when nothing was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;

    async fn chart_counts(&self, tahun_lulus: Option<i32>) -> Result<ChartCounts, ServiceError>;
}

/// In-memory repository for tests, benches and doc examples.
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;

    use chrono::Utc;
    use tokio::sync::RwLock;

    use crate::alumni::domain::Jurusan;
    use crate::pagination::Direction;

    struct Row {
        alumni: Alumni,
        password: Option<String>,
    }

    #[derive(Default)]
    pub struct MemoryAlumniRepository {
        rows: RwLock<BTreeMap<Uuid, Row>>,
        jurusan: RwLock<BTreeMap<Uuid, String>>,
    }

    impl MemoryAlumniRepository {
        pub fn new() -> Self { Self::default() }

        pub async fn insert_jurusan(&self, nama: &str) -> Uuid {
            let id = Uuid::new_v4();
            self.jurusan.write().await.insert(id, nama.to_string());
            id
        }

        /// Mirrors `ON DELETE SET NULL` on the foreign key.
        pub async fn remove_jurusan(&self, id: Uuid) {
            self.jurusan.write().await.remove(&id);
            for row in self.rows.write().await.values_mut() {
                if row.alumni.fields.jurusan_id == Some(id) {
                    row.alumni.fields.jurusan_id = None;
                }
            }
        }

        /// Stored credential hash, for assertions.
        pub async fn password_hash(&self, id: Uuid) -> Option<String> {
            self.rows.read().await.get(&id).and_then(|r| r.password.clone())
        }

        pub async fn len(&self) -> usize { self.rows.read().await.len() }
    }

    #[async_trait]
    impl AlumniRepository for MemoryAlumniRepository {
        async fn list(&self, filter: &AlumniFilter, window: &Window) -> Result<Vec<AlumniSummary>, ServiceError> {
            let rows = self.rows.read().await;
            let matching = rows.values().map(|r| &r.alumni).filter(|a| filter.matches(&a.fields));
            let take = window.fetch as usize;
            let out: Vec<AlumniSummary> = match (window.direction(), window.cursor) {
                (Direction::Next, None) => matching.take(take).map(AlumniSummary::from).collect(),
                (Direction::Next, Some(c)) => matching.filter(|a| a.id > c.id).take(take).map(AlumniSummary::from).collect(),
                (Direction::Previous, c) => {
                    let bound = c.map(|c| c.id);
                    matching
                        .rev()
                        .filter(|a| bound.map_or(true, |b| a.id < b))
                        .take(take)
                        .map(AlumniSummary::from)
                        .collect()
                }
            };
            Ok(out)
        }

        async fn find(&self, id: Uuid) -> Result<Option<Alumni>, ServiceError> {
            Ok(self.rows.read().await.get(&id).map(|r| r.alumni.clone()))
        }

        async fn find_detail(&self, id: Uuid) -> Result<Option<AlumniDetail>, ServiceError> {
            let Some(alumni) = self.find(id).await? else { return Ok(None) };
            let jurusan = match alumni.fields.jurusan_id {
                Some(jid) => self.jurusan.read().await.get(&jid).map(|nama| Jurusan { id: jid, nama: nama.clone() }),
                None => None,
            };
            Ok(Some(AlumniDetail { alumni, jurusan }))
        }

        async fn email_exists(&self, email: &str) -> Result<bool, ServiceError> {
            Ok(self.rows.read().await.values().any(|r| r.alumni.fields.email == email))
        }

        async fn jurusan_exists(&self, id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.jurusan.read().await.contains_key(&id))
        }

        async fn insert(&self, fields: &AlumniFields, password_hash: Option<String>) -> Result<Alumni, ServiceError> {
            let now = Utc::now();
            let alumni = Alumni { id: Uuid::new_v4(), fields: fields.clone(), created_at: now, updated_at: now };
            self.rows
                .write()
                .await
                .insert(alumni.id, Row { alumni: alumni.clone(), password: password_hash });
            Ok(alumni)
        }

        async fn update(&self, id: Uuid, fields: &AlumniFields, password_hash: Option<String>) -> Result<Option<Alumni>, ServiceError> {
            let mut rows = self.rows.write().await;
            let Some(row) = rows.get_mut(&id) else { return Ok(None) };
            row.alumni.fields = fields.clone();
            row.alumni.updated_at = Utc::now();
            if password_hash.is_some() {
                row.password = password_hash;
            }
            Ok(Some(row.alumni.clone()))
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.rows.write().await.remove(&id).is_some())
        }

        async fn chart_counts(&self, tahun_lulus: Option<i32>) -> Result<ChartCounts, ServiceError> {
            let mut counts = ChartCounts::default();
            self.rows
                .read()
                .await
                .values()
                .map(|r| &r.alumni.fields)
                .filter(|f| tahun_lulus.map_or(true, |y| f.tahun_lulus == y))
                .for_each(|f| counts.tally(f));
            Ok(counts)
        }
    }
}
