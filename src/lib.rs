//! # Material Chat Library
//!
//! This crate provides a chatroom backend with:
//! - RESTful HTTP API under `/api/v1` (users, chatrooms, messages, premium)
//! - The sign-up wizard state machine shared with the client dialog
//! - PostgreSQL for persistent storage
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core business entities, repository traits and the registration wizard
//! - **Application Layer**: Business logic services and DTOs
//! - **Infrastructure Layer**: Database repositories and metrics
//! - **Presentation Layer**: HTTP handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! material_chat/
//! +-- config/         Configuration management
//! +-- domain/         Domain entities, repository traits, registration wizard
//! +-- application/    Application services and DTOs
//! +-- infrastructure/ PostgreSQL repositories and Prometheus metrics
//! +-- presentation/   HTTP routes, handlers and middleware
//! +-- shared/         Common utilities (errors, validation, snowflake IDs)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers and middleware
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
