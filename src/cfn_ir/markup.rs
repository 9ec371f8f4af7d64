use crate::emitter::{self, EmitterOptions, MarkupNode};
use crate::error::{CodecError, Location};
use crate::intrinsics::IntrinsicKind;

use super::parser::{self, CfnParser, ObjectEntry};
use super::types::{Intrinsic, Mapping, Scalar, Value};

impl Value {
	/// Encode as a markup tree using short-form tags
	pub fn to_markup(&self) -> MarkupNode {
		encode(self)
	}

	/// Encode and emit as YAML text
	pub fn to_yaml_string(&self, options: &EmitterOptions) -> String {
		emitter::emit(&self.to_markup(), options)
	}

	/// Decode a markup tree, e.g. one produced by [`Value::to_markup`]
	pub fn from_markup(node: &MarkupNode) -> Result<Self, CodecError> {
		parser::decode(&MarkupCfnParser, node)
	}
}

/// Encode a value as a markup tree. Intrinsics use their short tag, except
/// that a non-scalar payload of a scalar-or-nested function is written as a
/// single-key long-form mapping.
pub fn encode(value: &Value) -> MarkupNode {
	match value {
		Value::Scalar(scalar) => MarkupNode::scalar(scalar.clone()),
		Value::Sequence(items) => MarkupNode::sequence(items.iter().map(encode).collect()),
		Value::Mapping(map) => MarkupNode::mapping(encode_entries(map)),
		Value::Node(node) => encode_intrinsic(node),
	}
}

fn encode_entries(map: &Mapping) -> Vec<(String, MarkupNode)> {
	map.iter()
		.map(|(key, value)| (key.clone(), encode(value)))
		.collect()
}

fn tagged_text(kind: IntrinsicKind, text: impl Into<String>) -> MarkupNode {
	MarkupNode::string(text).with_tag(kind.short_tag())
}

fn tagged_sequence(kind: IntrinsicKind, items: Vec<MarkupNode>) -> MarkupNode {
	MarkupNode::sequence(items).with_tag(kind.short_tag())
}

fn encode_intrinsic(node: &Intrinsic) -> MarkupNode {
	let kind = node.kind();

	match node {
		Intrinsic::Ref { reference } => tagged_text(kind, reference.as_str()),
		Intrinsic::Condition { condition } => tagged_text(kind, condition.as_str()),
		Intrinsic::GetAtt {
			resource,
			attribute,
		} => tagged_text(kind, format!("{resource}.{attribute}")),

		Intrinsic::GetAZs { region: payload }
		| Intrinsic::ImportValue { reference: payload }
		| Intrinsic::Base64 { value: payload } => scalar_or_long_form(kind, payload),

		Intrinsic::Cidr {
			ip_block,
			count,
			cidr_bits,
		} => tagged_sequence(
			kind,
			vec![
				encode(ip_block),
				MarkupNode::scalar(Scalar::Int(*count)),
				MarkupNode::scalar(Scalar::Int(*cidr_bits)),
			],
		),

		Intrinsic::FindInMap {
			map_name,
			top_level_key,
			second_level_key,
		} => tagged_sequence(
			kind,
			vec![
				MarkupNode::string(map_name.as_str()),
				encode(top_level_key),
				MarkupNode::string(second_level_key.as_str()),
			],
		),

		Intrinsic::Join { delimiter, values } => tagged_sequence(
			kind,
			vec![
				MarkupNode::string(delimiter.as_str()),
				MarkupNode::sequence(values.iter().map(encode).collect()),
			],
		),

		Intrinsic::Select { index, selection } => tagged_sequence(
			kind,
			vec![MarkupNode::scalar(Scalar::Int(*index)), encode(selection)],
		),

		Intrinsic::Split { delimiter, source } => tagged_sequence(
			kind,
			vec![MarkupNode::string(delimiter.as_str()), encode(source)],
		),

		Intrinsic::Sub {
			template,
			variables,
		} => {
			if variables.is_empty() {
				tagged_text(kind, template.as_str())
			} else {
				tagged_sequence(
					kind,
					vec![
						MarkupNode::string(template.as_str()),
						MarkupNode::mapping(encode_entries(variables)),
					],
				)
			}
		}

		Intrinsic::Transform { name, parameters } => MarkupNode::mapping(vec![
			("Name".to_string(), MarkupNode::string(name.as_str())),
			(
				"Parameters".to_string(),
				MarkupNode::mapping(encode_entries(parameters)),
			),
		])
		.with_tag(kind.short_tag()),

		Intrinsic::Conditional { operands, .. } => {
			tagged_sequence(kind, operands.iter().map(encode).collect())
		}
	}
}

/// `!Base64 text` for scalar payloads, `Fn::Base64: {...}` otherwise.
/// Null has no tagged text form that reads back as null.
fn scalar_or_long_form(kind: IntrinsicKind, payload: &Value) -> MarkupNode {
	match payload {
		Value::Scalar(scalar) if *scalar != Scalar::Null => tagged_text(kind, scalar.to_string()),
		_ => MarkupNode::mapping(vec![(kind.json_key().to_string(), encode(payload))]),
	}
}

/// Reads markup trees, so encoded output can be decoded without text
pub struct MarkupCfnParser;

impl CfnParser for MarkupCfnParser {
	type Node = MarkupNode;

	fn node_as_scalar(&self, node: &Self::Node) -> Option<Scalar> {
		match node {
			MarkupNode::Scalar { tag: None, value } => Some(value.clone()),
			_ => None,
		}
	}

	fn array_items(&self, node: &Self::Node) -> Option<Vec<Self::Node>> {
		match node {
			MarkupNode::Sequence { tag: None, items } => Some(items.clone()),
			_ => None,
		}
	}

	fn object_entries(&self, node: &Self::Node) -> Option<Vec<ObjectEntry<Self::Node>>> {
		match node {
			MarkupNode::Mapping { tag: None, entries } => Some(
				entries
					.iter()
					.map(|(key, value)| (Some(key.clone()), value.clone()))
					.collect(),
			),
			_ => None,
		}
	}

	fn node_location(&self, _node: &Self::Node) -> Location {
		Location::default()
	}

	fn node_tag(&self, node: &Self::Node) -> Option<(String, Self::Node)> {
		let tag = node.tag()?;
		let name = tag.strip_prefix('!').unwrap_or(tag);
		Some((name.to_string(), node.untagged()))
	}
}
