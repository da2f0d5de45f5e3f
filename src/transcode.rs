use encoding_rs::SHIFT_JIS;
use log::debug;

use crate::error::{Result, SegmentError};

/// Text to bytes conversion used by the byte and kanji segments.
pub trait Transcoder {
	fn encode(&self, text: &str) -> Result<Vec<u8>>;
}

/// The canonical byte encoding for byte segments. Never fails.
#[derive(Clone, Copy, Default, Debug)]
pub struct Utf8;

impl Transcoder for Utf8 {
	fn encode(&self, text: &str) -> Result<Vec<u8>> {
		Ok(text.as_bytes().to_vec())
	}
}

/// Shift_JIS, the legacy double-byte encoding kanji segments are defined over.
#[derive(Clone, Copy, Default, Debug)]
pub struct ShiftJis;

impl Transcoder for ShiftJis {
	fn encode(&self, text: &str) -> Result<Vec<u8>> {
		let (bytes, _, haderrors) = SHIFT_JIS.encode(text);
		if haderrors {
			// encoding_rs substitutes numeric character references, so locate the culprit ourselves
			let culprit: Option<char> = text.chars().find(|c| {
				let mut buf = [0u8; 4];
				SHIFT_JIS.encode(c.encode_utf8(&mut buf)).2
			});
			debug!("Shift_JIS cannot represent {:?}", culprit);
			return Err(SegmentError::UnsupportedCharacter(match culprit {
				Some(c) => format!("U+{:04X} has no Shift_JIS mapping", u32::from(c)),
				None => "text has no Shift_JIS mapping".to_string(),
			}));
		}
		Ok(bytes.into_owned())
	}
}
