//! Application layer - DTOs, mappers and use cases.

pub mod dto;
pub mod mapper;
mod user_service;

pub use dto::{
    CreateUserDto, MessageResponse, PaymentMethodDto, PaymentMethodPayload,
    RenamePaymentMethodRequest, UpdateUserDto, UserDto, UserKindDto, UserPayload,
};
pub use mapper::{JsonUserMapper, UserMapper};
pub use user_service::{UserManager, UserService};
