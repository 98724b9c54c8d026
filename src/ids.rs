//! Identifier assignment for the in-memory store.
//!
//! The database store leans on SQLite `AUTOINCREMENT` instead, which gives the
//! same guarantee: ids grow monotonically and are never handed out twice.

/// Returns `max(existing) + 1`, or `1` for an empty collection.
pub fn next_id<I>(existing: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    existing.into_iter().max().unwrap_or(0) + 1
}

/// Allocates ids for one collection, remembering the highest id ever issued.
///
/// `next_id` alone would hand out `3` again after the list `{1, 2, 3}` loses
/// its `3`. The high-water mark keeps that id retired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdAllocator {
    high_water: i64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next id given the ids currently present in the collection.
    pub fn allocate<I>(&mut self, existing: I) -> i64
    where
        I: IntoIterator<Item = i64>,
    {
        let id = next_id(existing.into_iter().chain(std::iter::once(self.high_water)));
        self.high_water = id;
        id
    }

    /// Highest id issued so far (`0` before the first allocation).
    pub fn high_water(&self) -> i64 {
        self.high_water
    }
}
