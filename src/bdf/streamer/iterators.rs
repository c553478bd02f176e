use std::io::BufRead;

use super::{BdfError, BdfStreamReader};
use crate::bdf::models::Subset;

/// Iterator over the remaining subsets of a BDF stream
///
/// Stops after the first error.
pub struct SubsetIterator<R: BufRead> {
    reader: BdfStreamReader<R>,
    failed: bool,
}

impl<R: BufRead> SubsetIterator<R> {
    pub(super) fn new(reader: BdfStreamReader<R>) -> Self {
        Self {
            reader,
            failed: false,
        }
    }

    /// Give the reader back, e.g. to query the global header
    pub fn into_reader(self) -> BdfStreamReader<R> {
        self.reader
    }
}

impl<R: BufRead> Iterator for SubsetIterator<R> {
    type Item = Result<Subset, BdfError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.reader.next_subset() {
            Ok(Some(subset)) => Some(Ok(subset)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
