//! # Quantum Governance
//!
//! Deterministic state machine for the governance contract: validator
//! registry, delegation book, DKG artifact collection, and protocol
//! parameters. Every mutating method mirrors the original contract's
//! gas-accounting split between a plain revert (gas refunded) and a
//! penalize outcome (all remaining gas consumed) — see
//! [`domain::GovernanceError::consumes_all_gas`].
//!
//! ## Layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | `domain` | Value objects, entities, error taxonomy |
//! | `storage` | 256-bit keyed word store and the scalar/array/mapping/bytes codec |
//! | `accessors` | Typed façade over the raw codec (offset+1 maps, swap-with-last removal) |
//! | `dkg_set` | Qualified-node filtering, hash-distance DKG/notary set derivation, group public key reconstruction |
//! | `handlers` | One function per contract method, matching the original dispatch table |
//! | `dispatch` | Selector → handler routing |
//! | `events` | Domain events published onto the shared event bus |

#![warn(clippy::all)]

pub mod accessors;
pub mod dispatch;
pub mod dkg_set;
pub mod domain;
pub mod events;
pub mod handlers;
pub mod state;
pub mod storage;

/// Re-exports of the types most callers need.
pub mod prelude {
    pub use crate::accessors::GovernanceAccessors;
    pub use crate::dispatch::{dispatch, GovernanceMethod};
    pub use crate::domain::*;
    pub use crate::events::GovernanceEvent;
    pub use crate::handlers::{CallContext, CallOutcome};
    pub use crate::state::GovernanceState;
    pub use crate::storage::{InMemoryWordStore, WordStore};
}
