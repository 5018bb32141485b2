//! Identity and verification: local accounts, HS256 access tokens and
//! role guards.

pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;
