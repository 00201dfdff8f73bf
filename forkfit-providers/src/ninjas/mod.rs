//! API Ninjas exercise database provider.
//!
//! A stateless passthrough: filters in, upstream JSON out.
//!
//! ## API Endpoints
//!
//! - `GET /v1/exercises?name=&muscle=&type=&difficulty=` (header `X-Api-Key`)

mod api;

pub use api::{DEFAULT_BASE_URL, ExercisesClient, SERVICE_NAME};
