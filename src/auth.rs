//! Auth-domain scope vocabulary and token models.

pub mod scope;
pub mod token;

pub use scope::*;
pub use token::{bundle::*, secret::*};
