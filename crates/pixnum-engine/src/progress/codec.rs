//! Progress codec -- painted grids and selections in a key-value store.
//!
//! Layout per image identity:
//!
//! | Key | Value |
//! |-----|-------|
//! | `painted_v1_<id>` | raw painted grid, one byte per cell, row-major |
//! | `selected_v1_<id>` | selected palette index as decimal ASCII |

use thiserror::Error;

use super::store::{KeyValueStore, StoreError};

const PAINTED_PREFIX: &str = "painted_v1_";
const SELECTED_PREFIX: &str = "selected_v1_";

/// Store key of the painted grid for `image_id`.
pub fn painted_key(image_id: &str) -> String {
    format!("{PAINTED_PREFIX}{image_id}")
}

/// Store key of the selected palette index for `image_id`.
pub fn selected_key(image_id: &str) -> String {
    format!("{SELECTED_PREFIX}{image_id}")
}

/// A stored blob that cannot be restored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("painted blob has {actual} bytes, grid has {expected} cells")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Serialize a painted grid: the raw cell bytes.
pub fn encode_painted(painted: &[u8]) -> Vec<u8> {
    painted.to_vec()
}

/// Deserialize a painted grid of exactly `expected_len` cells.
pub fn decode_painted(bytes: &[u8], expected_len: usize) -> Result<Vec<u8>, CodecError> {
    if bytes.len() != expected_len {
        return Err(CodecError::LengthMismatch {
            expected: expected_len,
            actual: bytes.len(),
        });
    }
    Ok(bytes.to_vec())
}

fn encode_selected(selected: u8) -> Vec<u8> {
    selected.to_string().into_bytes()
}

fn decode_selected(bytes: &[u8]) -> Option<u8> {
    std::str::from_utf8(bytes)
        .ok()?
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|&i| i != 0)
}

/// Progress read back from a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedProgress {
    /// Painted grid, present only when stored with the expected length
    pub painted: Option<Vec<u8>>,
    /// Last selected palette index
    pub selected: Option<u8>,
}

/// Reads and writes puzzle progress through a [`KeyValueStore`].
pub struct ProgressCodec<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> ProgressCodec<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Write the painted grid and selected index of `image_id`.
    pub fn save(&self, image_id: &str, painted: &[u8], selected: u8) -> Result<(), StoreError> {
        self.store
            .set(&painted_key(image_id), &encode_painted(painted))?;
        self.store
            .set(&selected_key(image_id), &encode_selected(selected))?;
        tracing::trace!(image_id, cells = painted.len(), selected, "Saved progress");
        Ok(())
    }

    /// Read the progress of `image_id` for a grid of `expected_len` cells.
    ///
    /// A painted blob of any other length is discarded: the image changed
    /// since it was saved, so the grid must start unpainted.
    pub fn restore(&self, image_id: &str, expected_len: usize) -> Result<SavedProgress, StoreError> {
        let painted = match self.store.get(&painted_key(image_id))? {
            Some(bytes) => match decode_painted(&bytes, expected_len) {
                Ok(grid) => Some(grid),
                Err(err) => {
                    tracing::warn!(image_id, %err, "Discarding stored progress");
                    None
                }
            },
            None => None,
        };

        let selected = self
            .store
            .get(&selected_key(image_id))?
            .and_then(|bytes| decode_selected(&bytes));

        Ok(SavedProgress { painted, selected })
    }

    /// Delete the stored progress of `image_id`.
    pub fn clear(&self, image_id: &str) -> Result<(), StoreError> {
        self.store.delete(&painted_key(image_id))?;
        self.store.delete(&selected_key(image_id))
    }

    /// Delete the stored progress of every image in `image_ids`.
    pub fn reset_all<I, T>(&self, image_ids: I) -> Result<usize, StoreError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut count = 0;
        for id in image_ids {
            self.clear(id.as_ref())?;
            count += 1;
        }
        tracing::info!(images = count, "Reset all progress");
        Ok(count)
    }
}
