//! Progress persistence.
//!
//! [`ProgressCodec`] defines what is written for a puzzle; [`KeyValueStore`]
//! is the durable map it is written to. Write scheduling (debouncing) is up
//! to the host.

mod codec;
mod store;

pub use codec::{
    decode_painted, encode_painted, painted_key, selected_key, CodecError, ProgressCodec,
    SavedProgress,
};
pub use store::{KeyValueStore, MemoryStore, StoreError};
