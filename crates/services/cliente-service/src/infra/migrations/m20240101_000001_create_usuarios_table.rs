//! Migration: Create usuarios table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Usuarios::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Usuarios::Id).uuid().not_null().primary_key())
                    // Insertion order, creation dates only have whole seconds
                    .col(
                        ColumnDef::new(Usuarios::Secuencia)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Usuarios::TipoUsuario)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Usuarios::Nombre).string().not_null())
                    .col(
                        ColumnDef::new(Usuarios::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    // Natural customers
                    .col(ColumnDef::new(Usuarios::Cedula).string().null())
                    .col(
                        ColumnDef::new(Usuarios::FechaNacimiento)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    // Corporate customers
                    .col(ColumnDef::new(Usuarios::Rut).string().null())
                    .col(
                        ColumnDef::new(Usuarios::FechaConstitucion)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Usuarios::FechaCreacion)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Usuarios::FechaActualizacion)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_usuarios_fecha_creacion")
                    .table(Usuarios::Table)
                    .col(Usuarios::FechaCreacion)
                    .col(Usuarios::Secuencia)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Usuarios::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Usuarios {
    Table,
    Id,
    Secuencia,
    TipoUsuario,
    Nombre,
    Email,
    Cedula,
    FechaNacimiento,
    Rut,
    FechaConstitucion,
    FechaCreacion,
    FechaActualizacion,
}
