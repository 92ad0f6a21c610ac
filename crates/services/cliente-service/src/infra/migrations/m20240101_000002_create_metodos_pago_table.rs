//! Migration: Create metodos_pago table owned by usuarios.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_usuarios_table::Usuarios;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MetodosPago::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MetodosPago::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MetodosPago::UsuarioId).uuid().not_null())
                    .col(ColumnDef::new(MetodosPago::Posicion).integer().not_null())
                    .col(ColumnDef::new(MetodosPago::Tipo).string_len(32).not_null())
                    .col(ColumnDef::new(MetodosPago::Nombre).string().not_null())
                    .col(
                        ColumnDef::new(MetodosPago::TokenSeguridad)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MetodosPago::UltimosDigitos)
                            .string_len(4)
                            .null(),
                    )
                    .col(ColumnDef::new(MetodosPago::Marca).string().null())
                    .col(
                        ColumnDef::new(MetodosPago::Activo)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(MetodosPago::FechaCreacion)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MetodosPago::FechaActualizacion)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_metodos_pago_usuario")
                            .from(MetodosPago::Table, MetodosPago::UsuarioId)
                            .to(Usuarios::Table, Usuarios::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_metodos_pago_usuario_id")
                    .table(MetodosPago::Table)
                    .col(MetodosPago::UsuarioId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MetodosPago::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MetodosPago {
    Table,
    Id,
    UsuarioId,
    Posicion,
    Tipo,
    Nombre,
    TokenSeguridad,
    UltimosDigitos,
    Marca,
    Activo,
    FechaCreacion,
    FechaActualizacion,
}
