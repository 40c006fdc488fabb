use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors, jurusan};

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alumni")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub jurusan_id: Option<Uuid>,
    pub nama: String,
    pub email: String,
    /// argon2 PHC string; never serialized.
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
    pub tempat_kerja: Option<String>,
    pub jabatan_kerja: Option<String>,
    pub tempat_kuliah: Option<String>,
    pub prodi_kuliah: Option<String>,
    pub tahun_mulai: i32,
    pub tahun_lulus: i32,
    pub kesesuaian_kerja: bool,
    pub kesesuaian_kuliah: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Jurusan,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Jurusan => Entity::belongs_to(jurusan::Entity)
                .from(Column::JurusanId)
                .to(jurusan::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
        }
    }
}

impl Related<jurusan::Entity> for Entity {
    fn to() -> RelationDef { Relation::Jurusan.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_nama(nama: &str) -> Result<(), errors::ModelError> {
    if nama.trim().is_empty() {
        return Err(errors::ModelError::Validation("nama wajib diisi".into()));
    }
    if nama.chars().count() > 255 {
        return Err(errors::ModelError::Validation("nama maksimal 255 karakter".into()));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };
    if !valid {
        return Err(errors::ModelError::Validation(format!("email tidak valid: {email}")));
    }
    if email.len() > 255 {
        return Err(errors::ModelError::Validation("email maksimal 255 karakter".into()));
    }
    Ok(())
}

/// Both years within [`MIN_YEAR`]..=[`MAX_YEAR`], graduation not before start.
pub fn validate_years(tahun_mulai: i32, tahun_lulus: i32) -> Result<(), errors::ModelError> {
    for (field, year) in [("tahun_mulai", tahun_mulai), ("tahun_lulus", tahun_lulus)] {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(errors::ModelError::Validation(format!(
                "{field} harus di antara {MIN_YEAR} dan {MAX_YEAR}"
            )));
        }
    }
    if tahun_lulus < tahun_mulai {
        return Err(errors::ModelError::Validation("tahun_lulus tidak boleh sebelum tahun_mulai".into()));
    }
    Ok(())
}

pub fn validate_optional_text(field: &str, value: Option<&str>) -> Result<(), errors::ModelError> {
    match value {
        Some(v) if v.chars().count() > 255 => Err(errors::ModelError::Validation(format!(
            "{field} maksimal 255 karakter"
        ))),
        _ => Ok(()),
    }
}
