//! # Skylift Cloud
//!
//! Trait seams for the cloud services the console talks to: worker instance
//! lifecycle, object storage, and outbound email.
//!
//! The console never holds ambient service clients; each seam is constructed
//! once at startup and passed into the request handlers. The `dev` module
//! provides in-process implementations used by tests and `--dev` runs; a
//! production deployment plugs real SDK clients into the same traits.

pub mod dev;
mod error;
mod instance;
mod mailer;
mod storage;

pub use error::CloudError;
pub use instance::{InstanceService, InstanceState, LaunchSpec, WorkerInstance};
pub use mailer::{Mailer, OutboundMail};
pub use storage::ObjectStore;
