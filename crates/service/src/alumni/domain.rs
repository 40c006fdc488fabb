use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use models::alumni as rules;

use crate::errors::ServiceError;

/// Writable attributes of an alumni record (everything but id, credential
/// and timestamps).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlumniFields {
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
}

impl AlumniFields {
    /// Trim text; blank optional text becomes `None`.
    pub fn normalize(&mut self) {
        self.nama = self.nama.trim().to_string();
        self.email = self.email.trim().to_string();
        for field in [
            &mut self.tempat_kerja,
            &mut self.jabatan_kerja,
            &mut self.tempat_kuliah,
            &mut self.prodi_kuliah,
        ] {
            *field = normalize_text(field.take());
        }
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        rules::validate_nama(&self.nama)?;
        rules::validate_email(&self.email)?;
        rules::validate_years(self.tahun_mulai, self.tahun_lulus)?;
        rules::validate_optional_text("tempat_kerja", self.tempat_kerja.as_deref())?;
        rules::validate_optional_text("jabatan_kerja", self.jabatan_kerja.as_deref())?;
        rules::validate_optional_text("tempat_kuliah", self.tempat_kuliah.as_deref())?;
        rules::validate_optional_text("prodi_kuliah", self.prodi_kuliah.as_deref())?;
        Ok(())
    }
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Stored alumni as exposed to callers. The credential is not part of this
/// type at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alumni {
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: AlumniFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Eight-field projection used by the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlumniSummary {
    pub id: Uuid,
    pub nama: String,
    pub tempat_kerja: Option<String>,
    pub jabatan_kerja: Option<String>,
    pub tempat_kuliah: Option<String>,
    pub prodi_kuliah: Option<String>,
    pub tahun_mulai: i32,
    pub tahun_lulus: i32,
}

impl From<&Alumni> for AlumniSummary {
    fn from(a: &Alumni) -> Self {
        Self {
            id: a.id,
            nama: a.fields.nama.clone(),
            tempat_kerja: a.fields.tempat_kerja.clone(),
            jabatan_kerja: a.fields.jabatan_kerja.clone(),
            tempat_kuliah: a.fields.tempat_kuliah.clone(),
            prodi_kuliah: a.fields.prodi_kuliah.clone(),
            tahun_mulai: a.fields.tahun_mulai,
            tahun_lulus: a.fields.tahun_lulus,
        }
    }
}

/// Major/department as embedded in the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Jurusan {
    pub id: Uuid,
    pub nama: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlumniDetail {
    #[serde(flatten)]
    pub alumni: Alumni,
    pub jurusan: Option<Jurusan>,
}

/// Listing filters; every present filter is AND-ed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlumniFilter {
    /// Case-insensitive substring over nama, tempat_kerja and tempat_kuliah.
    pub search: Option<String>,
    pub tahun_mulai: Option<i32>,
    pub tahun_lulus: Option<i32>,
}

impl AlumniFilter {
    /// Trimmed, lower-cased search term; `None` when blank.
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    pub fn matches(&self, a: &AlumniFields) -> bool {
        if let Some(term) = self.search_term() {
            let hit = [Some(a.nama.as_str()), a.tempat_kerja.as_deref(), a.tempat_kuliah.as_deref()]
                .into_iter()
                .flatten()
                .any(|v| v.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }
        self.tahun_mulai.map_or(true, |y| a.tahun_mulai == y)
            && self.tahun_lulus.map_or(true, |y| a.tahun_lulus == y)
    }
}

/// Create input. Only these fields are accepted; anything else (including
/// `id`) is rejected at deserialization.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlumniInput {
    pub nama: String,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub tempat_kerja: Option<String>,
    #[serde(default)]
    pub jabatan_kerja: Option<String>,
    #[serde(default)]
    pub tempat_kuliah: Option<String>,
    #[serde(default)]
    pub prodi_kuliah: Option<String>,
    pub tahun_mulai: i32,
    pub tahun_lulus: i32,
    #[serde(default)]
    pub kesesuaian_kerja: bool,
    #[serde(default)]
    pub kesesuaian_kuliah: bool,
    #[serde(default)]
    pub jurusan_id: Option<Uuid>,
}

impl AlumniInput {
    /// Split into normalized fields and the plaintext password (if any).
    pub fn into_parts(self) -> (AlumniFields, Option<String>) {
        let mut fields = AlumniFields {
            nama: self.nama,
            email: self.email,
            tempat_kerja: self.tempat_kerja,
            jabatan_kerja: self.jabatan_kerja,
            tempat_kuliah: self.tempat_kuliah,
            prodi_kuliah: self.prodi_kuliah,
            tahun_mulai: self.tahun_mulai,
            tahun_lulus: self.tahun_lulus,
            kesesuaian_kerja: self.kesesuaian_kerja,
            kesesuaian_kuliah: self.kesesuaian_kuliah,
            jurusan_id: self.jurusan_id,
        };
        fields.normalize();
        (fields, non_blank(self.password))
    }
}

/// Update input: absent fields stay untouched. For the nullable columns an
/// explicit `null` clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlumniPatch {
    #[serde(default)]
    pub nama: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub tempat_kerja: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub jabatan_kerja: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub tempat_kuliah: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub prodi_kuliah: Option<Option<String>>,
    #[serde(default)]
    pub tahun_mulai: Option<i32>,
    #[serde(default)]
    pub tahun_lulus: Option<i32>,
    #[serde(default)]
    pub kesesuaian_kerja: Option<bool>,
    #[serde(default)]
    pub kesesuaian_kuliah: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub jurusan_id: Option<Option<Uuid>>,
}

impl AlumniPatch {
    /// Merge onto `fields`; returns the new plaintext password, if one was
    /// submitted.
    pub fn apply_to(self, fields: &mut AlumniFields) -> Option<String> {
        if let Some(v) = self.nama {
            fields.nama = v;
        }
        if let Some(v) = self.email {
            fields.email = v;
        }
        if let Some(v) = self.tempat_kerja {
            fields.tempat_kerja = v;
        }
        if let Some(v) = self.jabatan_kerja {
            fields.jabatan_kerja = v;
        }
        if let Some(v) = self.tempat_kuliah {
            fields.tempat_kuliah = v;
        }
        if let Some(v) = self.prodi_kuliah {
            fields.prodi_kuliah = v;
        }
        if let Some(v) = self.tahun_mulai {
            fields.tahun_mulai = v;
        }
        if let Some(v) = self.tahun_lulus {
            fields.tahun_lulus = v;
        }
        if let Some(v) = self.kesesuaian_kerja {
            fields.kesesuaian_kerja = v;
        }
        if let Some(v) = self.kesesuaian_kuliah {
            fields.kesesuaian_kuliah = v;
        }
        if let Some(v) = self.jurusan_id {
            fields.jurusan_id = v;
        }
        fields.normalize();
        non_blank(self.password)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Distinguishes a missing key (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields() -> AlumniFields {
        AlumniFields {
            nama: "Jane".into(),
            email: "jane@example.com".into(),
            tempat_kerja: Some("PT Maju".into()),
            jabatan_kerja: Some("Engineer".into()),
            tempat_kuliah: None,
            prodi_kuliah: None,
            tahun_mulai: 2016,
            tahun_lulus: 2020,
            kesesuaian_kerja: true,
            kesesuaian_kuliah: false,
            jurusan_id: None,
        }
    }

    #[test]
    fn input_rejects_unknown_and_id_fields() {
        let base = json!({"nama": "Jane", "email": "j@x.id", "tahun_mulai": 2016, "tahun_lulus": 2020});
        assert!(serde_json::from_value::<AlumniInput>(base.clone()).is_ok());

        let mut with_id = base.clone();
        with_id["id"] = json!("00000000-0000-0000-0000-000000000000");
        assert!(serde_json::from_value::<AlumniInput>(with_id).is_err());

        let mut typo = base;
        typo["tahun_lulus"] = json!("dua ribu");
        assert!(serde_json::from_value::<AlumniInput>(typo).is_err());
    }

    #[test]
    fn input_normalizes_blank_optionals() {
        let input: AlumniInput = serde_json::from_value(json!({
            "nama": "  Jane ", "email": " j@x.id", "tempat_kerja": "   ", "password": "",
            "tahun_mulai": 2016, "tahun_lulus": 2020
        }))
        .unwrap();
        let (f, pw) = input.into_parts();
        assert_eq!(f.nama, "Jane");
        assert_eq!(f.email, "j@x.id");
        assert_eq!(f.tempat_kerja, None);
        assert_eq!(pw, None);
        assert!(!f.kesesuaian_kerja);
    }

    #[test]
    fn patch_distinguishes_missing_from_null() {
        let patch: AlumniPatch = serde_json::from_value(json!({"tempat_kerja": null, "nama": "Janet"})).unwrap();
        assert_eq!(patch.tempat_kerja, Some(None));
        assert_eq!(patch.jabatan_kerja, None);

        let mut f = fields();
        let pw = patch.apply_to(&mut f);
        assert_eq!(pw, None);
        assert_eq!(f.nama, "Janet");
        assert_eq!(f.tempat_kerja, None);
        assert_eq!(f.jabatan_kerja.as_deref(), Some("Engineer"));
        assert_eq!(f.tahun_lulus, 2020);
    }

    #[test]
    fn patch_rejects_unknown_fields() {
        assert!(serde_json::from_value::<AlumniPatch>(json!({"role": "admin"})).is_err());
    }

    #[test]
    fn filter_search_is_case_insensitive_over_three_columns() {
        let f = fields();
        let by_name = AlumniFilter { search: Some("jAn".into()), ..Default::default() };
        let by_work = AlumniFilter { search: Some("maju".into()), ..Default::default() };
        let miss = AlumniFilter { search: Some("Engineer".into()), ..Default::default() };
        assert!(by_name.matches(&f));
        assert!(by_work.matches(&f));
        assert!(!miss.matches(&f), "jabatan_kerja is not searched");
    }

    #[test]
    fn filter_years_and_search_are_anded() {
        let f = fields();
        let ok = AlumniFilter { search: Some("jane".into()), tahun_lulus: Some(2020), tahun_mulai: Some(2016) };
        let wrong_year = AlumniFilter { search: Some("jane".into()), tahun_lulus: Some(2021), ..Default::default() };
        assert!(ok.matches(&f));
        assert!(!wrong_year.matches(&f));
        assert!(AlumniFilter { search: Some("  ".into()), ..Default::default() }.matches(&f));
    }

    #[test]
    fn detail_serializes_flat_without_password() {
        let now = Utc::now();
        let detail = AlumniDetail {
            alumni: Alumni { id: Uuid::new_v4(), fields: fields(), created_at: now, updated_at: now },
            jurusan: Some(Jurusan { id: Uuid::new_v4(), nama: "Teknik Informatika".into() }),
        };
        let v = serde_json::to_value(&detail).unwrap();
        assert_eq!(v["nama"], "Jane");
        assert_eq!(v["jurusan"]["nama"], "Teknik Informatika");
        assert!(v.get("password").is_none());
        assert!(v.get("fields").is_none());
    }
}
