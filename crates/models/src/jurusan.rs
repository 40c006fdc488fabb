//! Major/department referenced by alumni. Read-only for this service apart
//! from seeding.
use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{alumni, errors};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jurusan")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub nama: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Alumni,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Alumni => Entity::has_many(alumni::Entity).into() }
    }
}

impl Related<alumni::Entity> for Entity {
    fn to() -> RelationDef { Relation::Alumni.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(db: &DatabaseConnection, nama: &str) -> Result<Model, errors::ModelError> {
    if nama.trim().is_empty() { return Err(errors::ModelError::Validation("nama jurusan required".into())); }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        nama: Set(nama.trim().to_string()),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
