//! Shared types for the order relayer.
//!
//! These types are used across all relayer crates: the order snapshot taken
//! from the registry, token identities, routing results, settlement call
//! parameters and transaction hashes.

pub mod delivery;
pub mod order;
pub mod routing;
pub mod token;

pub use delivery::*;
pub use order::*;
pub use routing::*;
pub use token::*;

/// Network identifier (EVM chain id).
pub type ChainId = u64;
