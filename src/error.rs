use thiserror::Error;

/// Failure to build or write a segment.
///
/// Construction errors mean the segment never existed. A write error only
/// comes from a kanji segment, after the pairs before the bad one were
/// already appended to the sink.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SegmentError {
	/// Input breaks the character-set or structural rule of the segment kind.
	#[error("Invalid input: {0}")]
	InvalidInput(String),
	/// A character has no representation in the target encoding.
	#[error("Unsupported character: {0}")]
	UnsupportedCharacter(String),
}

pub type Result<T> = std::result::Result<T, SegmentError>;
