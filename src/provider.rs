use crate::error::ProviderError;
use crate::types::{Column, Row};

// ─── RowProvider ────────────────────────────────────────────────────────────

/// Pull stream of the cells of one row, consumed by the unmapper.
///
/// Single consumer; implementations need not be thread-safe.
pub trait RowProvider {
    /// Key of the row being streamed. Stable across calls.
    fn key(&self) -> &[u8];

    /// Advance by one cell. End of stream and transport failures come back as
    /// distinct [`ProviderError`] variants.
    fn next_column(&mut self) -> Result<Column, ProviderError>;

    /// Push back the column most recently returned by [`next_column`](Self::next_column).
    /// Only one cell of pushback is supported.
    fn rewind(&mut self);
}

impl<P: RowProvider + ?Sized> RowProvider for &mut P {
    #[inline]
    fn key(&self) -> &[u8] {
        (**self).key()
    }

    #[inline]
    fn next_column(&mut self) -> Result<Column, ProviderError> {
        (**self).next_column()
    }

    #[inline]
    fn rewind(&mut self) {
        (**self).rewind()
    }
}

// ─── MemoryProvider ─────────────────────────────────────────────────────────

/// Provider over columns already in memory.
///
/// Without a window the stream ends with [`ProviderError::Done`]. A window
/// models one paged fetch of at most `limit` cells: it serves `min(limit, len)`
/// cells and then reports [`ProviderError::EndAtLimit`] when the page was
/// filled, [`ProviderError::EndBeforeLimit`] otherwise.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    key: Vec<u8>,
    columns: Vec<Column>,
    pos: usize,
    limit: Option<usize>,
    /// Whether the last call to `next_column` returned a column.
    returned: bool,
    rewinds: usize,
}

impl MemoryProvider {
    pub fn new(key: Vec<u8>, columns: Vec<Column>) -> Self {
        Self {
            key,
            columns,
            ..Self::default()
        }
    }

    pub fn from_row(row: Row) -> Self {
        Self::new(row.key, row.columns)
    }

    /// Serve at most `limit` cells, then report a windowed end of stream.
    pub fn with_window(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Number of times `rewind` pushed a column back.
    pub fn rewinds(&self) -> usize {
        self.rewinds
    }

    /// Cells not yet consumed.
    pub fn remaining(&self) -> usize {
        self.visible() - self.pos
    }

    #[inline]
    fn visible(&self) -> usize {
        match self.limit {
            Some(limit) => limit.min(self.columns.len()),
            None => self.columns.len(),
        }
    }
}

impl From<Row> for MemoryProvider {
    fn from(row: Row) -> Self {
        Self::from_row(row)
    }
}

impl RowProvider for MemoryProvider {
    #[inline]
    fn key(&self) -> &[u8] {
        &self.key
    }

    fn next_column(&mut self) -> Result<Column, ProviderError> {
        if self.pos >= self.visible() {
            self.returned = false;
            return Err(match self.limit {
                None => ProviderError::Done,
                Some(limit) if self.columns.len() >= limit => ProviderError::EndAtLimit,
                Some(_) => ProviderError::EndBeforeLimit,
            });
        }
        let column = self.columns[self.pos].clone();
        self.pos += 1;
        self.returned = true;
        Ok(column)
    }

    fn rewind(&mut self) {
        if self.returned {
            self.pos -= 1;
            self.returned = false;
            self.rewinds += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(n: usize) -> Vec<Column> {
        (0..n)
            .map(|i| Column::new(vec![i as u8], vec![i as u8]))
            .collect()
    }

    #[test]
    fn test_unbounded_ends_with_done() {
        let mut p = MemoryProvider::new(b"k".to_vec(), columns(2));
        assert_eq!(p.key(), b"k");
        assert_eq!(p.next_column().unwrap().name, [0]);
        assert_eq!(p.next_column().unwrap().name, [1]);
        assert!(matches!(p.next_column(), Err(ProviderError::Done)));
        assert!(matches!(p.next_column(), Err(ProviderError::Done)));
    }

    #[test]
    fn test_window_end_sentinels() {
        let mut filled = MemoryProvider::new(vec![1], columns(3)).with_window(2);
        assert_eq!(filled.remaining(), 2);
        filled.next_column().unwrap();
        filled.next_column().unwrap();
        assert!(matches!(filled.next_column(), Err(ProviderError::EndAtLimit)));

        let mut short = MemoryProvider::new(vec![1], columns(1)).with_window(5);
        short.next_column().unwrap();
        assert!(matches!(
            short.next_column(),
            Err(ProviderError::EndBeforeLimit)
        ));
    }

    #[test]
    fn test_rewind_replays_last_column() {
        let mut p = MemoryProvider::new(vec![1], columns(2));
        let first = p.next_column().unwrap();
        p.rewind();
        assert_eq!(p.rewinds(), 1);
        assert_eq!(p.next_column().unwrap(), first);
        assert_eq!(p.remaining(), 1);
    }

    #[test]
    fn test_rewind_after_end_is_a_no_op() {
        let mut p = MemoryProvider::new(vec![1], columns(1));
        p.next_column().unwrap();
        assert!(p.next_column().is_err());
        p.rewind();
        assert_eq!(p.rewinds(), 0);
        assert!(matches!(p.next_column(), Err(ProviderError::Done)));
    }
}
