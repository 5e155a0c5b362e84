//! gitdrill core library: remote references, domain newtypes and the lesson layout.
//!
//! - [`remote`]: [`RemoteDescriptor`] parsing
//! - [`types`]: newtypes and [`UrlForm`]
//! - [`paths`]: on-disk layout of actor homes
//! - [`error`]: [`RemoteError`]

pub mod error;
pub mod paths;
pub mod remote;
pub mod types;

pub use error::RemoteError;
pub use remote::{RemoteDescriptor, DEFAULT_HOST, DEFAULT_SCHEME};
pub use types::{ActorName, ProjectName, UrlForm};
