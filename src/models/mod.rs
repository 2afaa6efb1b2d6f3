pub mod user;

pub use user::{
    CreateUserDto, PageQuery, UpdateUserDetailsDto, UpdateUserStatusDto, User, UserChanges,
    UserPage, UserStatus,
};
