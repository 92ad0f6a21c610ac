//! Repository layer for data access.

pub mod entities;
mod mapper;
mod usuario_repository;

pub use mapper::{user_from_rows, user_to_rows};
pub use usuario_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use usuario_repository::MockUserRepository;
