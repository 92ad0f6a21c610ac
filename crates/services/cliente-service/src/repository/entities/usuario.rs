//! Usuario database entity for SeaORM.
//!
//! One row per user. Type-specific columns are NULL for the other kinds.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "usuarios")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub secuencia: i64,
    pub tipo_usuario: String,
    pub nombre: String,
    #[sea_orm(unique)]
    pub email: String,
    pub cedula: Option<String>,
    pub fecha_nacimiento: Option<DateTimeUtc>,
    pub rut: Option<String>,
    pub fecha_constitucion: Option<DateTimeUtc>,
    pub fecha_creacion: DateTimeUtc,
    pub fecha_actualizacion: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::metodo_pago::Entity")]
    MetodoPago,
}

impl Related<super::metodo_pago::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MetodoPago.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
