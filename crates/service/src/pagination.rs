//! Cursor pagination utilities for service layer
//!
//! Listings are ordered by `id` ascending. A cursor is an opaque token
//! (URL-safe base64 of a small JSON document) naming the boundary row and the
//! direction to travel from it. No total count is ever computed.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Fixed page size for alumni listings.
pub const PAGE_SIZE: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Rows with `id` greater than the boundary.
    Next,
    /// Rows with `id` smaller than the boundary.
    Previous,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub id: Uuid,
    #[serde(rename = "dir")]
    pub direction: Direction,
}

impl Cursor {
    pub fn next(id: Uuid) -> Self { Self { id, direction: Direction::Next } }

    pub fn previous(id: Uuid) -> Self { Self { id, direction: Direction::Previous } }

    pub fn encode(&self) -> String {
        // serializing two plain fields cannot fail
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    pub fn decode(token: &str) -> Result<Self, ServiceError> {
        let invalid = || ServiceError::Validation("cursor tidak valid".into());
        let bytes = URL_SAFE_NO_PAD.decode(token.trim()).map_err(|_| invalid())?;
        serde_json::from_slice(&bytes).map_err(|_| invalid())
    }
}

/// What a repository must fetch for one page: rows beyond `cursor` in its
/// direction (ascending for `Next`/no cursor, descending for `Previous`),
/// at most `fetch` of them. `fetch` is one more than the page size so the
/// caller can tell whether another page exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub cursor: Option<Cursor>,
    pub fetch: u64,
}

impl Window {
    pub fn new(cursor: Option<Cursor>, page_size: usize) -> Self {
        Self { cursor, fetch: page_size as u64 + 1 }
    }

    pub fn direction(&self) -> Direction {
        self.cursor.map(|c| c.direction).unwrap_or(Direction::Next)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
    pub previous: Option<String>,
}

/// Turn the raw rows fetched for `window` into an ascending page with
/// forward/backward cursors.
pub fn build_page<T>(mut rows: Vec<T>, window: &Window, page_size: usize, id_of: impl Fn(&T) -> Uuid) -> CursorPage<T> {
    let has_more = rows.len() > page_size;
    rows.truncate(page_size);

    let (next, previous) = match window.direction() {
        Direction::Next => {
            let next = if has_more { rows.last().map(|r| Cursor::next(id_of(r))) } else { None };
            let previous = match window.cursor {
                Some(_) => rows.first().map(|r| Cursor::previous(id_of(r))),
                None => None,
            };
            (next, previous)
        }
        Direction::Previous => {
            rows.reverse();
            let previous = if has_more { rows.first().map(|r| Cursor::previous(id_of(r))) } else { None };
            let next = rows.last().map(|r| Cursor::next(id_of(r)));
            (next, previous)
        }
    };

    CursorPage {
        items: rows,
        next: next.map(|c| c.encode()),
        previous: previous.map(|c| c.encode()),
    }
}
