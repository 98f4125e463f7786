//! Warden Engine: protocol adapter for the external data-protection engine
//!
//! The orchestration core never talks to the DR engine directly; it goes
//! through the [`ProtectionEngine`] trait defined here. The trait covers the
//! full engine surface the control plane consumes: the action catalog,
//! workload-policy CRUD, resource registration, resource-action binding, the
//! protect command, and the recovery/execution listing used by the recovery
//! workflow and the retention sweeper.
//!
//! [`RemoteEngine`] is the production implementation: a thin REST/JSON client
//! with a configurable endpoint, bearer token, and request timeout. Tests and
//! embedders can substitute any other implementation of the trait.
//!
//! # Example
//!
//! ```no_run
//! use warden_engine::{EngineConfig, ProtectionEngine, RemoteEngine};
//!
//! # async fn example() -> Result<(), warden_engine::EngineError> {
//! let engine = RemoteEngine::new(EngineConfig {
//!     endpoint: "http://dr-engine.internal:8780".to_string(),
//!     ..Default::default()
//! })?;
//!
//! // Wait for the engine to come up before driving it
//! engine.wait_until_ready().await;
//!
//! let policies = engine.list_workload_policies().await?;
//! println!("{} policies known to the engine", policies.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use api::ProtectionEngine;
pub use client::{EngineConfig, RemoteEngine};
pub use error::EngineError;
pub use types::{ActionDescriptor, EngineResource, PolicyExecution, ResourceAction, WorkloadPolicy};
