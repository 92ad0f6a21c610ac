//! User service - customer use cases.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{Email, FullName, User, UserFactory};

use super::dto::{CreateUserDto, PaymentMethodDto, UpdateUserDto, UserDto, UserPayload};
use super::mapper::{parse_optional_id, JsonUserMapper, UserMapper};
use crate::repository::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a user from the create DTO
    async fn create_user(&self, dto: CreateUserDto) -> AppResult<UserDto>;

    /// Create a user straight from an external JSON body
    async fn create_user_from_json(&self, payload: UserPayload) -> AppResult<UserDto>;

    async fn get_user(&self, id: Uuid) -> AppResult<UserDto>;

    async fn get_user_by_email(&self, email: &str) -> AppResult<UserDto>;

    /// List all users, oldest first
    async fn list_users(&self) -> AppResult<Vec<UserDto>>;

    /// Apply the non-empty fields of `dto` to a stored user
    async fn update_user(&self, dto: UpdateUserDto) -> AppResult<UserDto>;

    /// Delete a user together with its payment methods
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;

    /// Attach a new payment method to a user
    async fn add_payment_method(
        &self,
        user_id: Uuid,
        method: PaymentMethodDto,
    ) -> AppResult<UserDto>;

    async fn rename_payment_method(
        &self,
        user_id: Uuid,
        method_id: Uuid,
        name: String,
    ) -> AppResult<UserDto>;

    async fn deactivate_payment_method(
        &self,
        user_id: Uuid,
        method_id: Uuid,
    ) -> AppResult<UserDto>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    factory: UserFactory,
    mapper: UserMapper,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>, factory: UserFactory) -> Self {
        Self {
            repo,
            factory,
            mapper: UserMapper::new(factory),
        }
    }

    async fn load(&self, id: Uuid) -> AppResult<User> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    /// Validate and persist a modified aggregate.
    async fn save(&self, user: User) -> AppResult<UserDto> {
        self.factory.validate(&user)?;
        let saved = self.repo.update(&user).await?;
        Ok(self.mapper.to_dto(&saved))
    }

    async fn create(&self, dto: UserDto) -> AppResult<UserDto> {
        let user = self.mapper.to_entity(dto)?;

        if self
            .repo
            .find_by_email(user.email().address())
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Email"));
        }
        if self.repo.find_by_id(user.id()).await?.is_some() {
            return Err(AppError::conflict("Usuario"));
        }

        let created = self.repo.add(&user).await?;
        tracing::info!(user_id = %created.id(), kind = %created.kind, "User created");
        Ok(self.mapper.to_dto(&created))
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, dto: CreateUserDto) -> AppResult<UserDto> {
        self.create(dto.into()).await
    }

    async fn create_user_from_json(&self, payload: UserPayload) -> AppResult<UserDto> {
        self.create(JsonUserMapper.to_dto(payload)).await
    }

    async fn get_user(&self, id: Uuid) -> AppResult<UserDto> {
        let user = self.load(id).await?;
        Ok(self.mapper.to_dto(&user))
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<UserDto> {
        let user = self.repo.find_by_email(email).await?.ok_or_not_found()?;
        Ok(self.mapper.to_dto(&user))
    }

    async fn list_users(&self) -> AppResult<Vec<UserDto>> {
        let users = self.repo.list().await?;
        Ok(users.iter().map(|u| self.mapper.to_dto(u)).collect())
    }

    async fn update_user(&self, dto: UpdateUserDto) -> AppResult<UserDto> {
        let id = parse_optional_id(&dto.id)?
            .ok_or_else(|| AppError::validation("ID de usuario inválido"))?;
        let mut user = self.load(id).await?;

        if !dto.nombre.trim().is_empty() {
            user.rename(FullName::parse(&dto.nombre));
        }

        if !dto.email.trim().is_empty() {
            let email = Email::parse(&dto.email)?;
            if email != *user.email() {
                if let Some(other) = self.repo.find_by_email(email.address()).await? {
                    if other.id() != id {
                        return Err(AppError::conflict("Email"));
                    }
                }
                user.change_email(email);
            }
        }

        if !dto.metodos_pago.is_empty() {
            // Replacements always get a fresh identity
            let methods = dto
                .metodos_pago
                .into_iter()
                .map(|m| {
                    self.mapper.method_to_entity(PaymentMethodDto {
                        id: String::new(),
                        fecha_creacion: String::new(),
                        fecha_actualizacion: String::new(),
                        ..m
                    })
                })
                .collect::<AppResult<Vec<_>>>()?;
            user.replace_payment_methods(methods);
        }

        user.touch();
        let updated = self.save(user).await?;
        tracing::info!(user_id = %id, "User updated");
        Ok(updated)
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.repo.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn add_payment_method(
        &self,
        user_id: Uuid,
        method: PaymentMethodDto,
    ) -> AppResult<UserDto> {
        let mut user = self.load(user_id).await?;
        let method = self.mapper.method_to_entity(PaymentMethodDto {
            id: String::new(),
            activo: true,
            fecha_creacion: String::new(),
            fecha_actualizacion: String::new(),
            ..method
        })?;

        let method_id = method.id();
        user.add_payment_method(method);
        let updated = self.save(user).await?;
        tracing::info!(user_id = %user_id, method_id = %method_id, "Payment method added");
        Ok(updated)
    }

    async fn rename_payment_method(
        &self,
        user_id: Uuid,
        method_id: Uuid,
        name: String,
    ) -> AppResult<UserDto> {
        let mut user = self.load(user_id).await?;
        user.payment_method_mut(method_id)?.rename(name)?;
        user.touch();
        self.save(user).await
    }

    async fn deactivate_payment_method(
        &self,
        user_id: Uuid,
        method_id: Uuid,
    ) -> AppResult<UserDto> {
        let mut user = self.load(user_id).await?;
        user.payment_method_mut(method_id)?.deactivate();
        user.touch();

        let updated = self.save(user).await?;
        tracing::info!(user_id = %user_id, method_id = %method_id, "Payment method deactivated");
        Ok(updated)
    }
}
