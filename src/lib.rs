//! Packs QR code data segments into bits.
//!
//! Each [`QrSegment`] is built from one run of same-kind input (numeric,
//! alphanumeric, byte or kanji) and validated right away. [`QrSegment::write`]
//! then appends the payload bits to any [`BitSink`]. Mode indicators,
//! character count fields, version selection and error correction are left
//! to the caller.
#![forbid(unsafe_code)]

mod bits;
mod error;
mod segment;
mod transcode;

pub use bits::{BitBuffer, BitSink};
pub use error::{Result, SegmentError};
pub use segment::{alphanumeric_code, QrSegment};
pub use transcode::{ShiftJis, Transcoder, Utf8};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum QrMode {
	Numeric,
	Alphanumeric,
	Byte,
	Kanji,
}

impl QrMode {
	/// The 4-bit mode indicator that precedes a segment in the symbol.
	pub fn mode_bits(self) -> u32 {
		use QrMode::*;
		match self {
			Numeric      => 0x1,
			Alphanumeric => 0x2,
			Byte         => 0x4,
			Kanji        => 0x8,
		}
	}
}
