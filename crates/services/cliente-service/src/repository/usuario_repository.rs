//! User repository backed by the `usuarios` and `metodos_pago` tables.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Unchanged},
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use super::entities::{metodo_pago, usuario};
use super::mapper::{user_from_rows, user_to_rows};
use common::{AppError, AppResult};
use domain::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Users are loaded and saved as whole aggregates, payment methods included.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List all users, oldest first
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Persist a new user and its payment methods
    async fn add(&self, user: &User) -> AppResult<User>;

    /// Overwrite a stored user, replacing its payment methods
    async fn update(&self, user: &User) -> AppResult<User>;

    /// Delete a user and its payment methods
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn hydrate<C: ConnectionTrait>(
        conn: &C,
        rows: Vec<usuario::Model>,
    ) -> AppResult<Vec<User>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut methods: HashMap<Uuid, Vec<metodo_pago::Model>> = HashMap::new();
        for method in metodo_pago::Entity::find()
            .filter(metodo_pago::Column::UsuarioId.is_in(ids))
            .order_by_asc(metodo_pago::Column::Posicion)
            .all(conn)
            .await?
        {
            methods.entry(method.usuario_id).or_default().push(method);
        }

        rows.into_iter()
            .map(|row| {
                let owned = methods.remove(&row.id).unwrap_or_default();
                user_from_rows(row, owned)
            })
            .collect()
    }

    async fn insert_methods<C: ConnectionTrait>(
        conn: &C,
        methods: Vec<metodo_pago::Model>,
    ) -> AppResult<()> {
        if methods.is_empty() {
            return Ok(());
        }

        metodo_pago::Entity::insert_many(methods.into_iter().map(method_active_model))
            .exec_without_returning(conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let row = usuario::Entity::find_by_id(id).one(&self.db).await?;

        Ok(Self::hydrate(&self.db, row.into_iter().collect())
            .await?
            .pop())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = usuario::Entity::find()
            .filter(usuario::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await?;

        Ok(Self::hydrate(&self.db, row.into_iter().collect())
            .await?
            .pop())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let rows = usuario::Entity::find()
            .order_by_asc(usuario::Column::FechaCreacion)
            .order_by_asc(usuario::Column::Secuencia)
            .all(&self.db)
            .await?;

        Self::hydrate(&self.db, rows).await
    }

    async fn add(&self, user: &User) -> AppResult<User> {
        let (row, methods) = user_to_rows(user);

        let txn = self.db.begin().await?;
        let last = usuario::Entity::find()
            .order_by_desc(usuario::Column::Secuencia)
            .one(&txn)
            .await?
            .map_or(0, |last| last.secuencia);

        let mut active = usuario_active_model(row);
        active.secuencia = Set(last + 1);
        active.insert(&txn).await.map_err(map_unique_violation)?;
        Self::insert_methods(&txn, methods).await?;
        txn.commit().await?;

        tracing::debug!(user_id = %user.id(), "User stored");
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let (row, methods) = user_to_rows(user);

        let txn = self.db.begin().await?;
        if usuario::Entity::find_by_id(row.id).one(&txn).await?.is_none() {
            return Err(AppError::NotFound);
        }

        let mut active = usuario_active_model(row);
        active.id = Unchanged(user.id());
        active.secuencia = NotSet;
        active.update(&txn).await.map_err(map_unique_violation)?;

        metodo_pago::Entity::delete_many()
            .filter(metodo_pago::Column::UsuarioId.eq(user.id()))
            .exec(&txn)
            .await?;
        Self::insert_methods(&txn, methods).await?;
        txn.commit().await?;

        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let txn = self.db.begin().await?;

        metodo_pago::Entity::delete_many()
            .filter(metodo_pago::Column::UsuarioId.eq(id))
            .exec(&txn)
            .await?;

        let result = usuario::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        txn.commit().await?;
        Ok(())
    }
}

fn usuario_active_model(row: usuario::Model) -> usuario::ActiveModel {
    usuario::ActiveModel {
        id: Set(row.id),
        secuencia: Set(row.secuencia),
        tipo_usuario: Set(row.tipo_usuario),
        nombre: Set(row.nombre),
        email: Set(row.email),
        cedula: Set(row.cedula),
        fecha_nacimiento: Set(row.fecha_nacimiento),
        rut: Set(row.rut),
        fecha_constitucion: Set(row.fecha_constitucion),
        fecha_creacion: Set(row.fecha_creacion),
        fecha_actualizacion: Set(row.fecha_actualizacion),
    }
}

fn method_active_model(row: metodo_pago::Model) -> metodo_pago::ActiveModel {
    metodo_pago::ActiveModel {
        id: Set(row.id),
        usuario_id: Set(row.usuario_id),
        posicion: Set(row.posicion),
        tipo: Set(row.tipo),
        nombre: Set(row.nombre),
        token_seguridad: Set(row.token_seguridad),
        ultimos_digitos: Set(row.ultimos_digitos),
        marca: Set(row.marca),
        activo: Set(row.activo),
        fecha_creacion: Set(row.fecha_creacion),
        fecha_actualizacion: Set(row.fecha_actualizacion),
    }
}

/// Unique columns are the email, the key and the insertion sequence.
fn map_unique_violation(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) if msg.to_lowercase().contains("email") => {
            AppError::conflict("Email")
        }
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict("Usuario"),
        _ => AppError::from(err),
    }
}
