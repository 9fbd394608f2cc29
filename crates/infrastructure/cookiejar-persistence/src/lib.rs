mod api;
mod codec;
mod error;
mod memory_store;
mod redb_store;

pub use api::*;
pub use codec::{decode_value, encode_value};
pub use error::*;
pub use memory_store::MemorySlotStore;
pub use redb_store::RedbSlotStore;
