use std::marker::PhantomData;

use saphyr::{LoadableYamlNode, MarkedYaml, Scalar as YamlScalar, YamlData};

use crate::error::{CodecError, DecodeError, Location};

use super::parser::{self, CfnParser, ObjectEntry, ParseResult};
use super::types::{Scalar, Value};

impl Value {
	/// Decode a single-document YAML text. Short-form tags (`!Ref x`) and
	/// long-form keys (`Ref: x`) both become intrinsic nodes.
	pub fn from_yaml(text: &str) -> Result<Self, DecodeError> {
		let docs =
			MarkedYaml::load_from_str(text).map_err(|err| DecodeError::Yaml(err.to_string()))?;

		match docs.as_slice() {
			[] => Ok(Value::Scalar(Scalar::Null)),
			[doc] => {
				let parser = YamlCfnParser::new(text);
				Ok(parser::decode(&parser, doc)?)
			}
			_ => Err(DecodeError::MultipleDocuments(docs.len())),
		}
	}
}

/// YAML parser implementation over saphyr's marked nodes
pub struct YamlCfnParser<'a> {
	input: PhantomData<&'a str>,
}

impl<'a> YamlCfnParser<'a> {
	pub fn new(_text: &'a str) -> Self {
		Self { input: PhantomData }
	}
}

impl<'a> CfnParser for YamlCfnParser<'a> {
	type Node = MarkedYaml<'a>;

	fn node_as_scalar(&self, node: &Self::Node) -> Option<Scalar> {
		match &node.data {
			YamlData::Value(YamlScalar::String(s)) => Some(Scalar::String(s.to_string())),
			YamlData::Value(YamlScalar::Integer(i)) => Some(Scalar::Int(*i)),
			YamlData::Value(YamlScalar::FloatingPoint(f)) => Some(Scalar::Float(f.into_inner())),
			YamlData::Value(YamlScalar::Boolean(b)) => Some(Scalar::Bool(*b)),
			YamlData::Value(YamlScalar::Null) => Some(Scalar::Null),
			// Unresolved scalar text
			YamlData::Representation(text, _, _) => Some(Scalar::String(text.to_string())),
			_ => None,
		}
	}

	fn array_items(&self, node: &Self::Node) -> Option<Vec<Self::Node>> {
		match &node.data {
			YamlData::Sequence(seq) => Some(seq.to_vec()),
			_ => None,
		}
	}

	fn object_entries(&self, node: &Self::Node) -> Option<Vec<ObjectEntry<Self::Node>>> {
		match &node.data {
			YamlData::Mapping(map) => {
				let entries = map
					.iter()
					.map(|(k, v)| {
						// Non-scalar (or tagged) keys have no string form
						let key = match self.node_as_scalar(k) {
							Some(Scalar::String(s)) => Some(s),
							Some(other) => Some(other.to_string()),
							None => None,
						};
						(key, v.clone())
					})
					.collect();
				Some(entries)
			}
			_ => None,
		}
	}

	fn node_location(&self, node: &Self::Node) -> Location {
		let start = node.span.start;
		Location {
			line: start.line(),
			column: start.col() + 1,
		}
	}

	fn node_tag(&self, node: &Self::Node) -> Option<(String, Self::Node)> {
		let YamlData::Tagged(tag, inner) = &node.data else {
			return None;
		};

		// `!Ref` resolves to the primary handle; anything else keeps its
		// full prefix so it never collides with a registry name
		let name = if tag.handle == "!" || tag.handle.is_empty() {
			tag.suffix.to_string()
		} else {
			format!("{}{}", tag.handle, tag.suffix)
		};
		Some((name, (**inner).clone()))
	}

	fn check_structure(&self, node: &Self::Node) -> ParseResult<()> {
		match &node.data {
			YamlData::Alias(_) => Err(CodecError::Structural {
				reason: "alias refers to a node that is still being built".to_string(),
				location: self.node_location(node),
			}),
			YamlData::BadValue => Err(CodecError::Structural {
				reason: "node could not be resolved".to_string(),
				location: self.node_location(node),
			}),
			_ => Ok(()),
		}
	}
}
