use log::{debug, trace};

use crate::bits::BitSink;
use crate::error::{Result, SegmentError};
use crate::transcode::{ShiftJis, Transcoder};
use crate::QrMode;

/// One run of same-kind input, validated and ready to be packed.
///
/// Every constructor checks its whole input up front, so an existing
/// segment always holds a legal payload. Nothing can change it afterwards.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrSegment {
	payload: Payload,
}

#[derive(Clone, PartialEq, Eq, Debug)]
enum Payload {
	// Digit values 0-9
	Numeric(Vec<u8>),
	// Only characters from ALPHANUMERIC_CHARSET, hence pure ASCII
	Alphanumeric(String),
	Byte(Vec<u8>),
	// Shift_JIS byte pairs
	Kanji(Vec<[u8; 2]>),
}

impl QrSegment {
	pub fn make_numeric(text: &str) -> Result<Self> {
		let digits = text.chars().enumerate()
			.map(|(i, c)| match c {
				'0' ..= '9' => Ok(c as u8 - b'0'),
				_ => Err(SegmentError::InvalidInput(
					format!("non-digit character {:?} at position {}", c, i))),
			})
			.collect::<Result<Vec<u8>>>()
			.inspect_err(|e| debug!("Numeric segment rejected: {}", e))?;
		Ok(QrSegment::new(Payload::Numeric(digits)))
	}
	pub fn make_alphanumeric(text: &str) -> Result<Self> {
		if let Some((i, c)) = text.chars().enumerate().find(|&(_, c)| alphanumeric_code(c).is_none()) {
			let err = SegmentError::InvalidInput(
				format!("character {:?} at position {} is not in the alphanumeric set", c, i));
			debug!("Alphanumeric segment rejected: {}", err);
			return Err(err);
		}
		Ok(QrSegment::new(Payload::Alphanumeric(text.to_owned())))
	}
	pub fn make_bytes(data: &[u8]) -> Self {
		QrSegment::new(Payload::Byte(data.to_vec()))
	}
	/// Byte segment holding the UTF-8 form of `text`.
	pub fn make_text(text: &str) -> Self {
		QrSegment::make_bytes(text.as_bytes())
	}
	/// Byte segment holding `text` as produced by `transcoder`.
	pub fn make_text_with<T: Transcoder + ?Sized>(text: &str, transcoder: &T) -> Result<Self> {
		let data: Vec<u8> = transcoder.encode(text)
			.inspect_err(|e| debug!("Byte segment rejected: {}", e))?;
		Ok(QrSegment::new(Payload::Byte(data)))
	}
	pub fn make_kanji(text: &str) -> Result<Self> {
		QrSegment::make_kanji_with(text, &ShiftJis)
	}
	pub fn make_kanji_with<T: Transcoder + ?Sized>(text: &str, transcoder: &T) -> Result<Self> {
		let data: Vec<u8> = transcoder.encode(text)
			.inspect_err(|e| debug!("Kanji segment rejected: {}", e))?;
		QrSegment::make_kanji_bytes(&data)
	}
	/// Kanji segment from text that is already Shift_JIS encoded.
	///
	/// Only the byte count is checked here. Whether each pair falls in a
	/// kanji range is decided when the segment is written.
	pub fn make_kanji_bytes(data: &[u8]) -> Result<Self> {
		if data.len() % 2 != 0 {
			let err = SegmentError::InvalidInput(
				format!("double-byte text has odd length {}", data.len()));
			debug!("Kanji segment rejected: {}", err);
			return Err(err);
		}
		let pairs: Vec<[u8; 2]> = data.chunks_exact(2).map(|p| [p[0], p[1]]).collect();
		Ok(QrSegment::new(Payload::Kanji(pairs)))
	}
	fn new(payload: Payload) -> Self {
		let seg = Self { payload };
		debug!("Built {:?} segment of {} units", seg.mode(), seg.num_chars());
		seg
	}
	pub fn mode(&self) -> QrMode {
		match self.payload {
			Payload::Numeric(_)      => QrMode::Numeric,
			Payload::Alphanumeric(_) => QrMode::Alphanumeric,
			Payload::Byte(_)         => QrMode::Byte,
			Payload::Kanji(_)        => QrMode::Kanji,
		}
	}
	/// Digits, characters, bytes or double-byte characters, depending on the mode.
	/// This is the character count the symbol header carries, not a bit count.
	pub fn num_chars(&self) -> usize {
		match &self.payload {
			Payload::Numeric(digits)    => digits.len(),
			Payload::Alphanumeric(text) => text.len(),
			Payload::Byte(data)         => data.len(),
			Payload::Kanji(pairs)       => pairs.len(),
		}
	}
	/// Number of bits a successful `write` appends.
	pub fn data_bits(&self) -> usize {
		let n: usize = self.num_chars();
		match self.payload {
			Payload::Numeric(_)      => n / 3 * 10 + [0, 4, 7][n % 3],
			Payload::Alphanumeric(_) => n / 2 * 11 + n % 2 * 6,
			Payload::Byte(_)         => n * 8,
			Payload::Kanji(_)        => n * 13,
		}
	}
	/// Appends the packed payload to `sink`.
	///
	/// Only kanji segments can fail, on a pair outside both kanji ranges.
	/// Pairs before it have already been appended by then and stay in the sink.
	pub fn write<S: BitSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
		trace!("Writing {:?} segment, {} bits", self.mode(), self.data_bits());
		match &self.payload {
			Payload::Numeric(digits) => {
				for group in digits.chunks(3) {
					let value: u32 = group.iter().fold(0, |acc, &d| acc * 10 + u32::from(d));
					let width: u8 = match group.len() {
						3 => 10,
						2 => 7,
						_ => 4,
					};
					sink.put(value, width);
				}
			}
			Payload::Alphanumeric(text) => {
				for pair in text.as_bytes().chunks(2) {
					let value: u32 = pair.iter()
						.fold(0, |acc, &b| acc * 45 + u32::from(ALPHANUMERIC_CODES[usize::from(b)]));
					sink.put(value, if pair.len() == 2 { 11 } else { 6 });
				}
			}
			Payload::Byte(data) => {
				for &b in data {
					sink.put(u32::from(b), 8);
				}
			}
			Payload::Kanji(pairs) => {
				for &pair in pairs {
					let value: u32 = kanji_value(pair)
						.inspect_err(|e| debug!("Kanji write aborted: {}", e))?;
					sink.put(value, 13);
				}
			}
		}
		Ok(())
	}
	pub fn is_numeric(text: &str) -> bool {
		text.chars().all(|c| ('0' ..= '9').contains(&c))
	}
	pub fn is_alphanumeric(text: &str) -> bool {
		text.chars().all(|c| alphanumeric_code(c).is_some())
	}
}

const ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

const NO_CODE: u8 = 0xFF;

// Indexed by ASCII value
static ALPHANUMERIC_CODES: [u8; 128] = build_alphanumeric_codes();

const fn build_alphanumeric_codes() -> [u8; 128] {
	let charset: &[u8] = ALPHANUMERIC_CHARSET.as_bytes();
	let mut table = [NO_CODE; 128];
	let mut i = 0;
	while i < charset.len() {
		table[charset[i] as usize] = i as u8;
		i += 1;
	}
	table
}

/// Code 0-44 of `c` in the alphanumeric set, if it belongs to it.
pub fn alphanumeric_code(c: char) -> Option<u8> {
	ALPHANUMERIC_CODES.get(c as usize).copied().filter(|&code| code != NO_CODE)
}

// Maps a Shift_JIS pair onto its 13-bit kanji value
fn kanji_value(pair: [u8; 2]) -> Result<u32> {
	let code: u16 = u16::from_be_bytes(pair);
	if (0x8140 ..= 0x9FFC).contains(&code) {
		let v: u16 = code - 0x8140;
		Ok(u32::from(if v >= 0x40 { v - 1 } else { v }))
	} else if (0xE040 ..= 0xEBBF).contains(&code) {
		Ok(u32::from(code - 0xC140))
	} else {
		Err(SegmentError::UnsupportedCharacter(
			format!("double-byte code 0x{:04X} is outside the kanji ranges", code)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bits::BitBuffer;

	fn bits_of(seg: &QrSegment) -> String {
		let mut bb = BitBuffer::new();
		seg.write(&mut bb).unwrap();
		bb.to_string()
	}

	#[test]
	fn alphanumeric_table() {
		assert_eq!(alphanumeric_code('0'), Some(0));
		assert_eq!(alphanumeric_code('9'), Some(9));
		assert_eq!(alphanumeric_code('A'), Some(10));
		assert_eq!(alphanumeric_code('Z'), Some(35));
		assert_eq!(alphanumeric_code(' '), Some(36));
		assert_eq!(alphanumeric_code(':'), Some(44));
		for c in ['a', 'z', '#', '\0', '\u{7F}', 'Ä', '点'] {
			assert_eq!(alphanumeric_code(c), None, "{:?}", c);
		}
		let coded = (0u8 ..= 127).filter(|&b| alphanumeric_code(char::from(b)).is_some()).count();
		assert_eq!(coded, 45);
	}

	#[test]
	fn kanji_value_first_range() {
		assert_eq!(kanji_value([0x81, 0x40]), Ok(0));
		assert_eq!(kanji_value([0x81, 0x7E]), Ok(0x3E));
		assert_eq!(kanji_value([0x81, 0x80]), Ok(0x3F));
		assert_eq!(kanji_value([0x93, 0x5F]), Ok(4638));
		assert_eq!(kanji_value([0x9F, 0xFC]), Ok(0x1EBB));
	}

	#[test]
	fn kanji_value_second_range() {
		assert_eq!(kanji_value([0xE0, 0x40]), Ok(0x1F00));
		assert_eq!(kanji_value([0xE4, 0xAA]), Ok(0x236A));
		assert_eq!(kanji_value([0xEB, 0xBF]), Ok(0x2A7F));
	}

	#[test]
	fn kanji_value_out_of_range() {
		for pair in [[0x81, 0x3F], [0x9F, 0xFD], [0xA0, 0x00], [0xE0, 0x3F], [0xEB, 0xC0], [0x41, 0x42]] {
			assert!(matches!(kanji_value(pair), Err(SegmentError::UnsupportedCharacter(_))), "{:02X?}", pair);
		}
	}

	#[test]
	fn numeric_remainders() {
		assert_eq!(bits_of(&QrSegment::make_numeric("").unwrap()), "");
		assert_eq!(bits_of(&QrSegment::make_numeric("7").unwrap()), "0111");
		assert_eq!(bits_of(&QrSegment::make_numeric("99").unwrap()), "1100011");
		assert_eq!(bits_of(&QrSegment::make_numeric("999").unwrap()), "1111100111");
		assert_eq!(bits_of(&QrSegment::make_numeric("000").unwrap()), "0000000000");
	}

	#[test]
	fn numeric_rejects_non_ascii_digits() {
		for text in ["12a", "-1", " 1", "\u{0661}", "1.5"] {
			assert!(matches!(QrSegment::make_numeric(text), Err(SegmentError::InvalidInput(_))), "{:?}", text);
		}
	}

	#[test]
	fn alphanumeric_single_char() {
		assert_eq!(bits_of(&QrSegment::make_alphanumeric(":").unwrap()), "101100");
		assert_eq!(bits_of(&QrSegment::make_alphanumeric("::").unwrap()), "11111101000");
	}

	#[test]
	fn kanji_odd_bytes() {
		assert!(matches!(QrSegment::make_kanji_bytes(&[0x93]), Err(SegmentError::InvalidInput(_))));
		let seg = QrSegment::make_kanji_bytes(&[]).unwrap();
		assert_eq!(seg.num_chars(), 0);
		assert_eq!(bits_of(&seg), "");
	}

	#[test]
	fn predicates() {
		assert!(QrSegment::is_numeric(""));
		assert!(QrSegment::is_numeric("0123"));
		assert!(!QrSegment::is_numeric("12 3"));
		assert!(QrSegment::is_alphanumeric("HELLO WORLD $%*+-./:"));
		assert!(!QrSegment::is_alphanumeric("Hello"));
	}

	#[test]
	fn mode_per_variant() {
		assert_eq!(QrSegment::make_numeric("1").unwrap().mode(), QrMode::Numeric);
		assert_eq!(QrSegment::make_alphanumeric("A").unwrap().mode(), QrMode::Alphanumeric);
		assert_eq!(QrSegment::make_bytes(b"a").mode(), QrMode::Byte);
		assert_eq!(QrSegment::make_kanji("点").unwrap().mode(), QrMode::Kanji);
	}

	#[test]
	fn segments_are_shareable() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<QrSegment>();
	}
}
