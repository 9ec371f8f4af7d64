use jsonc_parser::ParseOptions;
use jsonc_parser::ast::Value as JsonValue;
use jsonc_parser::common::Ranged;

use crate::error::{DecodeError, Location};

use super::parser::{self, CfnParser, ObjectEntry};
use super::types::{Scalar, Value};

impl Value {
	/// Decode JSON text. With `intrinsics` set, single-key objects whose key
	/// is a registered long-form name become intrinsic nodes; otherwise the
	/// document is read as plain data.
	pub fn from_json(text: &str, intrinsics: bool) -> Result<Self, DecodeError> {
		let parse_options = ParseOptions {
			allow_comments: true,
			allow_trailing_commas: true,
			allow_loose_object_property_names: false,
			allow_hexadecimal_numbers: false,
			allow_single_quoted_strings: false,
			allow_unary_plus_numbers: false,
		};

		let parse_result = jsonc_parser::parse_to_ast(text, &Default::default(), &parse_options)
			.map_err(|err| DecodeError::Json(err.to_string()))?;

		let root = parse_result
			.value
			.ok_or_else(|| DecodeError::Json("document is empty".to_string()))?;

		let parser = JsonCfnParser::new(text, intrinsics);
		Ok(parser::decode(&parser, &root)?)
	}
}

/// JSON parser implementation
pub struct JsonCfnParser<'a> {
	text: &'a str,
	intrinsics: bool,
}

impl<'a> JsonCfnParser<'a> {
	pub fn new(text: &'a str, intrinsics: bool) -> Self {
		Self { text, intrinsics }
	}

	fn byte_offset_to_location(&self, offset: usize) -> Location {
		let mut line = 1;
		let mut column = 1;

		for (byte_idx, ch) in self.text.char_indices() {
			if byte_idx >= offset {
				break;
			}
			if ch == '\n' {
				line += 1;
				column = 1;
			} else {
				column += 1;
			}
		}

		Location { line, column }
	}
}

/// Integers that fit in an i64 stay integers; anything else JSON calls a
/// number, including larger integers, is read as the nearest f64
fn number_scalar(text: &str) -> Scalar {
	if let Ok(i) = text.parse::<i64>() {
		return Scalar::Int(i);
	}
	match text.parse::<f64>() {
		Ok(x) => Scalar::Float(x),
		Err(_) => Scalar::String(text.to_string()),
	}
}

impl<'a> CfnParser for JsonCfnParser<'a> {
	type Node = JsonValue<'a>;

	fn node_as_scalar(&self, node: &Self::Node) -> Option<Scalar> {
		match node {
			JsonValue::StringLit(s) => Some(Scalar::String(s.value.to_string())),
			JsonValue::NumberLit(n) => Some(number_scalar(n.value)),
			JsonValue::BooleanLit(b) => Some(Scalar::Bool(b.value)),
			JsonValue::NullKeyword(_) => Some(Scalar::Null),
			_ => None,
		}
	}

	fn array_items(&self, node: &Self::Node) -> Option<Vec<Self::Node>> {
		node.as_array().map(|arr| arr.elements.clone())
	}

	fn object_entries(&self, node: &Self::Node) -> Option<Vec<ObjectEntry<Self::Node>>> {
		// JSON keys are always strings
		node.as_object().map(|obj| {
			obj.properties
				.iter()
				.map(|prop| (Some(prop.name.as_str().to_string()), prop.value.clone()))
				.collect()
		})
	}

	fn node_location(&self, node: &Self::Node) -> Location {
		self.byte_offset_to_location(node.range().start)
	}

	fn long_form_enabled(&self) -> bool {
		self.intrinsics
	}
}
