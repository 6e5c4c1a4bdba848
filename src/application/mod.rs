//! Application Layer
//!
//! Business logic services and the DTOs that carry data between the HTTP
//! layer and the domain.

pub mod dto;
pub mod services;
