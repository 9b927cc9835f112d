//! Cursor-based pagination for the `ballots` listing.

use serde::{Deserialize, Serialize};

/// Default page size when `count` is not specified.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Maximum allowed page size.
pub const MAX_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    /// Opaque cursor from a previous response.
    pub cursor: Option<String>,
    pub count: Option<u32>,
}

impl PaginationParams {
    /// Effective page size, clamped to [1, MAX_PAGE_SIZE].
    pub fn effective_count(&self) -> u32 {
        self.count
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Offset encoded in the cursor; 0 if absent or malformed.
    pub fn decode_offset(&self) -> u64 {
        self.cursor.as_deref().and_then(decode_cursor).unwrap_or(0)
    }

    /// Slice one page out of `items` and compute the cursor for the next one.
    pub fn page<T: Clone>(&self, items: &[T]) -> (Vec<T>, PaginationMeta) {
        let count = self.effective_count();
        let offset = usize::try_from(self.decode_offset()).unwrap_or(usize::MAX);
        let page: Vec<T> = items
            .iter()
            .skip(offset)
            .take(count as usize)
            .cloned()
            .collect();
        let cursor = next_cursor(offset as u64, page.len(), count);
        (page, PaginationMeta { cursor })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    /// Cursor for the next page, or `None` on the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// Cursors are the big-endian offset in hex.
pub fn encode_cursor(offset: u64) -> String {
    hex::encode(offset.to_be_bytes())
}

pub fn decode_cursor(cursor: &str) -> Option<u64> {
    let mut buf = [0u8; 8];
    hex::decode_to_slice(cursor, &mut buf).ok()?;
    Some(u64::from_be_bytes(buf))
}

/// `None` once a short page has been returned.
pub fn next_cursor(current_offset: u64, returned: usize, page_size: u32) -> Option<String> {
    if (returned as u32) < page_size {
        None
    } else {
        Some(encode_cursor(current_offset + returned as u64))
    }
}
