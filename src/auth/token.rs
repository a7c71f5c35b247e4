//! Token secrets and the bundle produced by a successful code exchange.

pub mod bundle;
pub mod secret;
