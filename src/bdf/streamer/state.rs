use std::fmt;

/// Position of the reader in the life cycle of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReaderState {
    /// No stream is open
    NoStream,
    /// The global header has been read, no subset yet
    AtBeginning,
    /// At least one subset has been read
    Reading,
    /// The closing top-level boundary has been seen
    AtEnd,
}

impl ReaderState {
    /// Every state
    pub const ALL: [ReaderState; 4] = [
        ReaderState::NoStream,
        ReaderState::AtBeginning,
        ReaderState::Reading,
        ReaderState::AtEnd,
    ];

    /// Whether `operation` may be called in this state
    pub fn permits(&self, operation: Operation) -> bool {
        use Operation::*;
        match self {
            ReaderState::NoStream => matches!(operation, Open | Close),
            ReaderState::AtBeginning => !matches!(operation, Open),
            ReaderState::Reading => !matches!(operation, Open),
            ReaderState::AtEnd => matches!(operation, TestEnd | Query | ReadNext | ReadAll | Close),
        }
    }
}

impl fmt::Display for ReaderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReaderState::NoStream => "NoStream",
            ReaderState::AtBeginning => "AtBeginning",
            ReaderState::Reading => "Reading",
            ReaderState::AtEnd => "AtEnd",
        };
        f.write_str(name)
    }
}

/// Classification of the reader's public operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Opening a stream
    Open,
    /// Reading a field of the global header
    Query,
    /// Testing for the end of the stream
    TestEnd,
    /// Reading the next subset
    Read,
    /// Reading a batch of subsets
    ReadNext,
    /// Reading every remaining subset
    ReadAll,
    /// Closing the stream, always permitted
    Close,
}

impl Operation {
    /// Every operation
    pub const ALL: [Operation; 7] = [
        Operation::Open,
        Operation::Query,
        Operation::TestEnd,
        Operation::Read,
        Operation::ReadNext,
        Operation::ReadAll,
        Operation::Close,
    ];
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Open => "open",
            Operation::Query => "query",
            Operation::TestEnd => "has_subset",
            Operation::Read => "get_subset",
            Operation::ReadNext => "next_subsets",
            Operation::ReadAll => "all_remaining_subsets",
            Operation::Close => "close",
        };
        f.write_str(name)
    }
}
