mod user;
mod verification_token;

pub use user::{CreateUser, User, UserType};
pub use verification_token::EmailVerificationToken;
