use std::fmt;

use bitvec::prelude::*;

/// Append-only destination for packed segment bits.
///
/// `put` appends the low `width` bits of `value`, most significant bit
/// first. Higher bits of `value` are ignored. A width above 32 is a caller
/// bug and panics.
pub trait BitSink {
	fn put(&mut self, value: u32, width: u8);
}

fn check_width(width: u8) {
	assert!(width <= 32, "Width out of range");
}

fn get_bit(x: u32, i: u8) -> bool {
	(x >> i) & 1 != 0
}

impl BitSink for Vec<bool> {
	fn put(&mut self, value: u32, width: u8) {
		check_width(width);
		self.extend((0 .. width).rev().map(|i| get_bit(value, i)));
	}
}

/// In-memory bit stream, packed eight bits per byte.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct BitBuffer(BitVec<u8, Msb0>);

impl BitBuffer {
	pub fn new() -> Self {
		Self(BitVec::new())
	}
	pub fn with_capacity(bits: usize) -> Self {
		Self(BitVec::with_capacity(bits))
	}
	pub fn len(&self) -> usize {
		self.0.len()
	}
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
	pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
		self.0.iter().by_vals()
	}
	/// Packs the bits into bytes; a trailing partial byte is padded with zeros.
	pub fn to_bytes(&self) -> Vec<u8> {
		self.0.chunks(8)
			.map(|chunk| chunk.iter().by_vals().enumerate()
				.fold(0u8, |acc, (i, bit)| acc | (u8::from(bit) << (7 - i))))
			.collect()
	}
}

impl BitSink for BitBuffer {
	fn put(&mut self, value: u32, width: u8) {
		check_width(width);
		self.0.reserve(usize::from(width));
		for i in (0 .. width).rev() {
			self.0.push(get_bit(value, i));
		}
	}
}

impl fmt::Display for BitBuffer {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		for bit in self.bits() {
			f.write_str(if bit { "1" } else { "0" })?;
		}
		Ok(())
	}
}
