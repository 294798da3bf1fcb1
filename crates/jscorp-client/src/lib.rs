//! Client core for the JSCORP HR backend.
//!
//! Two pieces cooperate:
//!
//! - [`EndpointResolver`] picks the backend base URL once at startup from the
//!   stored override, build-time settings, the hosting naming convention, or
//!   the local default.
//! - [`Gateway`] owns the [`Session`], performs the login exchange, attaches
//!   the bearer token to every later call and classifies each outcome.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use jscorp_client::{EndpointResolver, Gateway, MemoryStore, Session};
//!
//! #[tokio::main]
//! async fn main() -> jscorp_client::Result<()> {
//!     let cfg = jscorp_common::config::load().expect("config");
//!     let store = Arc::new(MemoryStore::default());
//!     let endpoint = EndpointResolver::from_config(&cfg).resolve_with_store(store.as_ref(), &cfg.api);
//!     let session = Session::load(store);
//!     let gateway = Gateway::new(endpoint.base_url, session, cfg.timeouts)?;
//!
//!     gateway.login("admin", "secret").await?;
//!     let employees = gateway.list_employees().await?;
//!     println!("{} employees", employees.len());
//!     Ok(())
//! }
//! ```

pub mod bootstrap;
pub mod error;
pub mod gateway;
pub mod notice;
pub mod resolver;
pub mod resources;
pub mod session;
pub mod store;

pub use bootstrap::{BootstrapError, Resource, Snapshot};
pub use error::{ApiError, RequestOutcome, Result};
pub use gateway::Gateway;
pub use notice::{Notice, NoticeBoard, Origin};
pub use resolver::{EndpointResolver, EndpointSource, EndpointSources, ResolvedEndpoint};
pub use session::{Session, SessionState};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
