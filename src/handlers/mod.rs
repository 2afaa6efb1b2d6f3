pub mod user;

pub use user::UserState;
