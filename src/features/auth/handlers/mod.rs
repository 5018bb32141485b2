pub mod auth_handler;

pub use auth_handler::{
    __path_get_me, __path_login, __path_resend_verification, __path_signup, __path_verify_email,
    get_me, login, resend_verification, signup, verify_email,
};
