//! # Tasks Hub
//!
//! Client-side task store for the HR Tasks Hub board. Todo records come
//! from a remote JSON API, get decorated with board fields once, and are
//! then kept in memory and mirrored to a local key-value cache.
//!
//! ## Pieces
//!
//! - [`gateway`]: the remote method contract and its `reqwest` client
//! - [`identity`]: ids of tasks that only exist on this client
//! - [`cache`]: the persisted task collection
//! - [`enhance`]: randomised board decoration, seedable
//! - [`store`]: optimistic add/update/delete with rollback
//! - [`query`]: search, status filter, sort and board grouping
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use tasks_hub::enhance::Enhancer;
//! use tasks_hub::gateway::HttpGateway;
//! use tasks_hub::storage::FileStore;
//! use tasks_hub::store::TaskStore;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = HttpGateway::new("https://dummyjson.com", Duration::from_secs(10))?;
//! let slots = Arc::new(FileStore::open("/tmp/hub")?);
//! let mut store = TaskStore::new(gateway, slots, Enhancer::default());
//! store.init().await?;
//! println!("{} tasks", store.tasks().len());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod display;
pub mod enhance;
pub mod error;
pub mod fields;
pub mod gateway;
pub mod identity;
pub mod query;
pub mod storage;
pub mod store;
pub mod task;

#[cfg(test)]
mod testing;
