use chrono::Utc;
use sea_orm::sea_query::{Alias, Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use models::{alumni, jurusan};

use crate::alumni::chart::ChartCounts;
use crate::alumni::domain::{Alumni, AlumniDetail, AlumniFields, AlumniFilter, AlumniSummary, Jurusan};
use crate::alumni::repository::AlumniRepository;
use crate::errors::ServiceError;
use crate::pagination::{Direction, Window};

pub struct SeaOrmAlumniRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAlumniRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    async fn count(&self, cond: Condition) -> Result<u64, ServiceError> {
        alumni::Entity::find().filter(cond).count(&self.db).await.map_err(ServiceError::db)
    }
}

#[derive(Debug, FromQueryResult)]
struct SummaryRow {
    id: Uuid,
    nama: String,
    tempat_kerja: Option<String>,
    jabatan_kerja: Option<String>,
    tempat_kuliah: Option<String>,
    prodi_kuliah: Option<String>,
    tahun_mulai: i32,
    tahun_lulus: i32,
}

impl From<SummaryRow> for AlumniSummary {
    fn from(r: SummaryRow) -> Self {
        Self {
            id: r.id,
            nama: r.nama,
            tempat_kerja: r.tempat_kerja,
            jabatan_kerja: r.jabatan_kerja,
            tempat_kuliah: r.tempat_kuliah,
            prodi_kuliah: r.prodi_kuliah,
            tahun_mulai: r.tahun_mulai,
            tahun_lulus: r.tahun_lulus,
        }
    }
}

fn to_alumni(m: alumni::Model) -> Alumni {
    Alumni {
        id: m.id,
        fields: AlumniFields {
            nama: m.nama,
            email: m.email,
            tempat_kerja: m.tempat_kerja,
            jabatan_kerja: m.jabatan_kerja,
            tempat_kuliah: m.tempat_kuliah,
            prodi_kuliah: m.prodi_kuliah,
            tahun_mulai: m.tahun_mulai,
            tahun_lulus: m.tahun_lulus,
            kesesuaian_kerja: m.kesesuaian_kerja,
            kesesuaian_kuliah: m.kesesuaian_kuliah,
            jurusan_id: m.jurusan_id,
        },
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

fn apply_fields(am: &mut alumni::ActiveModel, f: &AlumniFields) {
    am.nama = Set(f.nama.clone());
    am.email = Set(f.email.clone());
    am.tempat_kerja = Set(f.tempat_kerja.clone());
    am.jabatan_kerja = Set(f.jabatan_kerja.clone());
    am.tempat_kuliah = Set(f.tempat_kuliah.clone());
    am.prodi_kuliah = Set(f.prodi_kuliah.clone());
    am.tahun_mulai = Set(f.tahun_mulai);
    am.tahun_lulus = Set(f.tahun_lulus);
    am.kesesuaian_kerja = Set(f.kesesuaian_kerja);
    am.kesesuaian_kuliah = Set(f.kesesuaian_kuliah);
    am.jurusan_id = Set(f.jurusan_id);
}

/// `%` and `_` in user input match literally.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn filter_condition(filter: &AlumniFilter) -> Condition {
    let mut cond = Condition::all();
    if let Some(term) = filter.search_term() {
        let pattern = format!("%{}%", escape_like(&term));
        let contains = |col: alumni::Column| {
            Expr::expr(Func::lower(Expr::col(col))).like(LikeExpr::new(pattern.clone()).escape('\\'))
        };
        cond = cond.add(
            Condition::any()
                .add(contains(alumni::Column::Nama))
                .add(contains(alumni::Column::TempatKerja))
                .add(contains(alumni::Column::TempatKuliah)),
        );
    }
    if let Some(y) = filter.tahun_mulai {
        cond = cond.add(alumni::Column::TahunMulai.eq(y));
    }
    if let Some(y) = filter.tahun_lulus {
        cond = cond.add(alumni::Column::TahunLulus.eq(y));
    }
    cond
}

/// Whitespace-only text counts as empty, matching `chart::is_filled`.
fn trimmed(col: alumni::Column) -> SimpleExpr {
    Func::cust(Alias::new("TRIM")).arg(Expr::col(col)).into()
}

fn is_empty(col: alumni::Column) -> Condition {
    Condition::any().add(col.is_null()).add(Expr::expr(trimmed(col)).eq(""))
}

fn is_filled(col: alumni::Column) -> Condition {
    Condition::all().add(col.is_not_null()).add(Expr::expr(trimmed(col)).ne(""))
}

fn year_condition(tahun_lulus: Option<i32>) -> Condition {
    let mut cond = Condition::all();
    if let Some(y) = tahun_lulus {
        cond = cond.add(alumni::Column::TahunLulus.eq(y));
    }
    cond
}

#[async_trait::async_trait]
impl AlumniRepository for SeaOrmAlumniRepository {
    async fn list(&self, filter: &AlumniFilter, window: &Window) -> Result<Vec<AlumniSummary>, ServiceError> {
        let mut query = alumni::Entity::find().filter(filter_condition(filter));
        query = match window.direction() {
            Direction::Next => {
                if let Some(c) = window.cursor {
                    query = query.filter(alumni::Column::Id.gt(c.id));
                }
                query.order_by_asc(alumni::Column::Id)
            }
            Direction::Previous => {
                if let Some(c) = window.cursor {
                    query = query.filter(alumni::Column::Id.lt(c.id));
                }
                query.order_by_desc(alumni::Column::Id)
            }
        };
        let rows = query
            .select_only()
            .columns([
                alumni::Column::Id,
                alumni::Column::Nama,
                alumni::Column::TempatKerja,
                alumni::Column::JabatanKerja,
                alumni::Column::TempatKuliah,
                alumni::Column::ProdiKuliah,
                alumni::Column::TahunMulai,
                alumni::Column::TahunLulus,
            ])
            .limit(window.fetch)
            .into_model::<SummaryRow>()
            .all(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(rows.into_iter().map(AlumniSummary::from).collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Alumni>, ServiceError> {
        let res = alumni::Entity::find_by_id(id).one(&self.db).await.map_err(ServiceError::db)?;
        Ok(res.map(to_alumni))
    }

    async fn find_detail(&self, id: Uuid) -> Result<Option<AlumniDetail>, ServiceError> {
        let res = alumni::Entity::find_by_id(id)
            .find_also_related(jurusan::Entity)
            .one(&self.db)
            .await
            .map_err(ServiceError::db)?;
        Ok(res.map(|(a, j)| AlumniDetail {
            alumni: to_alumni(a),
            jurusan: j.map(|j| Jurusan { id: j.id, nama: j.nama }),
        }))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, ServiceError> {
        let n = self.count(Condition::all().add(alumni::Column::Email.eq(email))).await?;
        Ok(n > 0)
    }

    async fn jurusan_exists(&self, id: Uuid) -> Result<bool, ServiceError> {
        let n = jurusan::Entity::find_by_id(id).count(&self.db).await.map_err(ServiceError::db)?;
        Ok(n > 0)
    }

    async fn insert(&self, fields: &AlumniFields, password_hash: Option<String>) -> Result<Alumni, ServiceError> {
        let now = Utc::now();
        let mut am = alumni::ActiveModel {
            id: Set(Uuid::new_v4()),
            password: Set(password_hash),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };
        apply_fields(&mut am, fields);
        let m = am.insert(&self.db).await.map_err(ServiceError::db)?;
        Ok(to_alumni(m))
    }

    async fn update(&self, id: Uuid, fields: &AlumniFields, password_hash: Option<String>) -> Result<Option<Alumni>, ServiceError> {
        let Some(current) = alumni::Entity::find_by_id(id).one(&self.db).await.map_err(ServiceError::db)? else {
            return Ok(None);
        };
        let mut am = current.into_active_model();
        apply_fields(&mut am, fields);
        if let Some(hash) = password_hash {
            am.password = Set(Some(hash));
        }
        am.updated_at = Set(Utc::now().into());
        let m = am.update(&self.db).await.map_err(ServiceError::db)?;
        Ok(Some(to_alumni(m)))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = alumni::Entity::delete_by_id(id).exec(&self.db).await.map_err(ServiceError::db)?;
        Ok(res.rows_affected > 0)
    }

    async fn chart_counts(&self, tahun_lulus: Option<i32>) -> Result<ChartCounts, ServiceError> {
        use alumni::Column::{KesesuaianKerja, KesesuaianKuliah, TempatKerja, TempatKuliah};
        let year = || year_condition(tahun_lulus);

        Ok(ChartCounts {
            pengangguran: self.count(year().add(is_empty(TempatKerja)).add(is_empty(TempatKuliah))).await?,
            kuliah: self.count(year().add(is_filled(TempatKuliah)).add(is_empty(TempatKerja))).await?,
            kerja: self.count(year().add(is_filled(TempatKerja)).add(is_empty(TempatKuliah))).await?,
            kuliah_dan_kerja: self.count(year().add(is_filled(TempatKerja)).add(is_filled(TempatKuliah))).await?,
            tidak_sesuai: self
                .count(year().add(Condition::any().add(KesesuaianKerja.eq(false)).add(KesesuaianKuliah.eq(false))))
                .await?,
            kuliah_sesuai: self.count(year().add(KesesuaianKuliah.eq(true))).await?,
            kerja_sesuai: self.count(year().add(KesesuaianKerja.eq(true))).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::{Cursor, PAGE_SIZE};
    use crate::test_support::{get_db, skip_db};

    fn fields(nama: &str, tahun_lulus: i32) -> AlumniFields {
        AlumniFields {
            nama: nama.into(),
            email: format!("{}@example.com", Uuid::new_v4()),
            tempat_kerja: None,
            jabatan_kerja: None,
            tempat_kuliah: None,
            prodi_kuliah: None,
            tahun_mulai: tahun_lulus - 4,
            tahun_lulus,
            kesesuaian_kerja: false,
            kesesuaian_kuliah: false,
            jurusan_id: None,
        }
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_a\\b"), "50\\%\\_a\\\\b");
        assert_eq!(escape_like("budi"), "budi");
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_paged() -> anyhow::Result<()> {
        if skip_db() { return Ok(()); }
        let repo = SeaOrmAlumniRepository::new(get_db().await?);
        let tag = Uuid::new_v4().simple().to_string();

        let mut ids = Vec::new();
        for i in 0..12 {
            let mut f = fields(&format!("Cari {tag} {i}"), 2020);
            if i == 0 {
                f.nama = "Lain".into();
                f.tempat_kerja = Some(format!("PT {}", tag.to_uppercase()));
            }
            ids.push(repo.insert(&f, None).await?.id);
        }
        ids.sort();

        let filter = AlumniFilter { search: Some(tag.to_uppercase()), ..Default::default() };
        let window = Window::new(None, PAGE_SIZE);
        let first = repo.list(&filter, &window).await?;
        assert_eq!(first.len(), PAGE_SIZE + 1);
        assert_eq!(first.iter().map(|r| r.id).collect::<Vec<_>>(), ids[..=PAGE_SIZE].to_vec());

        let back = repo.list(&filter, &Window::new(Some(Cursor::previous(ids[11])), PAGE_SIZE)).await?;
        assert_eq!(back.first().map(|r| r.id), Some(ids[10]));

        for id in ids {
            repo.delete(id).await?;
        }
        Ok(())
    }

    #[tokio::test]
    async fn detail_update_and_credential_roundtrip() -> anyhow::Result<()> {
        if skip_db() { return Ok(()); }
        let db = get_db().await?;
        let repo = SeaOrmAlumniRepository::new(db.clone());
        let j = jurusan::create(&db, &format!("Jurusan {}", Uuid::new_v4())).await?;

        let mut f = fields("Detail", 2020);
        f.jurusan_id = Some(j.id);
        let created = repo.insert(&f, Some("$argon2id$v=19$stub".into())).await?;
        let detail = repo.find_detail(created.id).await?.expect("row");
        assert_eq!(detail.jurusan.map(|j| j.nama), Some(j.nama.clone()));

        f.jabatan_kerja = Some("Analis".into());
        let updated = repo.update(created.id, &f, None).await?.expect("row");
        assert_eq!(updated.fields.jabatan_kerja.as_deref(), Some("Analis"));
        let stored = alumni::Entity::find_by_id(created.id).one(&db).await?.expect("row");
        assert_eq!(stored.password.as_deref(), Some("$argon2id$v=19$stub"));

        assert!(repo.update(Uuid::new_v4(), &f, None).await?.is_none());
        assert!(repo.delete(created.id).await?);
        assert!(!repo.delete(created.id).await?);
        jurusan::Entity::delete_by_id(j.id).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn chart_counts_respect_year_and_blank_strings() -> anyhow::Result<()> {
        if skip_db() { return Ok(()); }
        let repo = SeaOrmAlumniRepository::new(get_db().await?);
        // a year no other test writes
        let year = 1901;

        let mut kerja = fields("Kerja", year);
        kerja.tempat_kerja = Some("PT".into());
        kerja.tempat_kuliah = Some("   ".into());
        kerja.kesesuaian_kerja = true;
        let mut both = fields("Both", year);
        both.tempat_kerja = Some("PT".into());
        both.tempat_kuliah = Some("UI".into());
        both.kesesuaian_kerja = true;
        both.kesesuaian_kuliah = true;

        let a = repo.insert(&kerja, None).await?;
        let b = repo.insert(&both, None).await?;

        let c = repo.chart_counts(Some(year)).await?;
        assert_eq!((c.pengangguran, c.kuliah, c.kerja, c.kuliah_dan_kerja), (0, 0, 1, 1));
        assert_eq!((c.tidak_sesuai, c.kuliah_sesuai, c.kerja_sesuai), (1, 1, 2));

        repo.delete(a.id).await?;
        repo.delete(b.id).await?;
        Ok(())
    }
}
