//! Provider-facing descriptors (data) and strategies (behavior).
//!
//! `descriptor` exposes validated endpoint metadata (`ProviderDescriptor`), `client` the OAuth
//! client registration, and `strategy` the [`ProviderStrategy`] hooks the authenticator drives.
//! `bitbucket` is the concrete strategy.

pub mod bitbucket;
pub mod client;
pub mod descriptor;
pub mod strategy;

pub use bitbucket::*;
pub use client::*;
pub use descriptor::*;
pub use strategy::*;
