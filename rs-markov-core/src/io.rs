use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{MarkovError, Result};

/// Text encodings accepted for training input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Encoding {
	#[default]
	Utf8,
	/// ISO-8859-1, every byte maps to the code point of the same value
	Latin1,
	Ascii,
}

impl Encoding {
	pub fn name(&self) -> &'static str {
		match self {
			Encoding::Utf8 => "utf-8",
			Encoding::Latin1 => "latin-1",
			Encoding::Ascii => "ascii",
		}
	}

	/// Decodes raw bytes into a string.
	///
	/// # Errors
	/// Returns `MarkovError::Decode` if `bytes` is not valid in this encoding.
	pub fn decode(&self, bytes: Vec<u8>) -> Result<String> {
		match self {
			Encoding::Utf8 => String::from_utf8(bytes).map_err(|e| MarkovError::Decode {
				encoding: self.name(),
				reason: e.utf8_error().to_string(),
			}),
			Encoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
			Encoding::Ascii => {
				let invalid = bytes.iter().position(|b| !b.is_ascii());
				match invalid {
					Some(offset) => Err(MarkovError::Decode {
						encoding: self.name(),
						reason: format!("non-ascii byte 0x{:02x} at offset {}", bytes[offset], offset),
					}),
					None => Ok(bytes.into_iter().map(char::from).collect()),
				}
			}
		}
	}
}

impl FromStr for Encoding {
	type Err = MarkovError;

	fn from_str(s: &str) -> Result<Self> {
		match s.to_ascii_lowercase().as_str() {
			"utf-8" | "utf8" => Ok(Encoding::Utf8),
			"latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(Encoding::Latin1),
			"ascii" | "us-ascii" => Ok(Encoding::Ascii),
			_ => Err(MarkovError::UnsupportedEncoding(s.to_owned())),
		}
	}
}

impl fmt::Display for Encoding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Reads a whole text file into memory using the given encoding.
///
/// Line endings are normalized: `\r\n` and a lone `\r` both become `\n`.
pub fn read_text<P: AsRef<Path>>(path: P, encoding: Encoding) -> Result<String> {
	let bytes = std::fs::read(path)?;
	let text = encoding.decode(bytes)?;
	Ok(normalize_newlines(text))
}

fn normalize_newlines(text: String) -> String {
	if !text.contains('\r') {
		return text;
	}
	text.replace("\r\n", "\n").replace('\r', "\n")
}
