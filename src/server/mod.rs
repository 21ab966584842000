//! Discord bot, HTTP API and scheduled jobs.
//!
//! # Architecture
//!
//! - **Bot** (`bot/`) - Gateway event handlers and slash commands
//! - **Controller Layer** (`controller/`) - HTTP request handlers and DTO conversion
//! - **Service Layer** (`service/`) - Role decay, join-to-create channels, document
//!   parsing, upstream clients and job execution
//! - **Discord** (`discord/`) - Guild operations used by the services, behind a trait so
//!   services can be tested without a gateway connection
//! - **Model Layer** (`model/`) - Domain models shared between services
//! - **Error Layer** (`error/`) - Application error types and HTTP response mapping
//!
//! # Infrastructure
//!
//! - **Configuration** (`config`) - Environment-based application configuration
//! - **State** (`state`) - Shared application state (content cache, job runner)
//! - **Startup** (`startup`) - Tracing, HTTP client and upstream initialization
//! - **Router** (`router`) - Axum route configuration
//! - **Scheduler** (`scheduler/`) - Cron jobs for document sync and Destiny reports
//!
//! # Request Flow
//!
//! 1. **Router** receives the HTTP request and routes it to a controller
//! 2. **Controller** extracts parameters and calls the job runner or reads the cache
//! 3. **Service** runs the job against upstream services
//! 4. **Controller** converts the result to a DTO, or the error to a status code

pub mod bot;
pub mod config;
pub mod controller;
pub mod discord;
pub mod error;
pub mod model;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;
