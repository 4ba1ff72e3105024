//! Block-lattice BFT consensus engine.
//!
//! | module               | responsibility                                           |
//! |-----------------------|----------------------------------------------------------|
//! | `domain`              | block/position/witness types, error taxonomy             |
//! | `rlp`                 | wire encoding for `Block`                                |
//! | `pool`                | per-chain holding area for blocks awaiting ack-closure    |
//! | `lattice_data`        | the DAG itself: tips, sanity checks, admission            |
//! | `total_ordering`      | deterministic linearization of admitted blocks            |
//! | `consensus_timestamp` | median-based timestamp assignment over ordered blocks     |
//! | `coordinator`         | ties the above together behind one `RwLock`               |
//! | `ports`                | outbound traits for payload/witness/validation/delivery   |

#![warn(clippy::all)]

pub mod consensus_timestamp;
pub mod coordinator;
pub mod domain;
pub mod lattice_data;
pub mod pool;
pub mod ports;
pub mod rlp;
pub mod total_ordering;

pub mod prelude {
    pub use crate::coordinator::Lattice;
    pub use crate::domain::*;
    pub use crate::ports::{
        BlockConfirmed, BlockDelivered, BlockValidator, DefaultBlockValidator, PreparePayload, PrepareWitness,
    };
    pub use crate::rlp::{decode_block, encode_block, RlpDecodeError};
}
