mod auth_dto;

pub use auth_dto::{
    LoginRequestDto, LoginResponseDto, ResendVerificationRequestDto, SignupRequestDto,
    SignupResponseDto, VerifyEmailQuery, VerifyEmailResponseDto,
};
