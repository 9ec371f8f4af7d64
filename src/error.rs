use std::{fmt, io, path::PathBuf};

use thiserror::Error;

use crate::intrinsics::IntrinsicKind;

/// 1-based position of a node in its source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
	pub line: usize,
	pub column: usize,
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "line {}, column {}", self.line, self.column)
	}
}

/// A document is well-formed markup/JSON but an intrinsic inside it is not
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
	#[error("malformed {kind} at {location}: expected {expected}")]
	Shape {
		kind: IntrinsicKind,
		expected: String,
		location: Location,
	},

	#[error("invalid {field} for {kind} at {location}: `{value}` is not an integer")]
	Type {
		kind: IntrinsicKind,
		field: &'static str,
		value: String,
		location: Location,
	},

	#[error("unsupported recursive structure at {location}: {reason}")]
	Structural { reason: String, location: Location },

	#[error("mapping key at {location} is not a scalar")]
	InvalidKey { location: Location },
}

#[derive(Debug, Error)]
pub enum DecodeError {
	#[error("YAML parse error: {0}")]
	Yaml(String),

	#[error("JSON parse error: {0}")]
	Json(String),

	#[error("expected a single YAML document, found {0}")]
	MultipleDocuments(usize),

	#[error(transparent)]
	Codec(#[from] CodecError),
}

#[derive(Debug, Error)]
pub enum ConvertError {
	#[error("I/O error on {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("failed to load {path}: {source}")]
	Decode {
		path: PathBuf,
		#[source]
		source: DecodeError,
	},

	#[error("failed to serialize {path}: {source}")]
	Serialize {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},
}
