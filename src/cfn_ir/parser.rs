use crate::error::{CodecError, Location};
use crate::intrinsics::{self, Arity, IntrinsicKind};

use super::types::{ConditionalOp, Intrinsic, Mapping, Scalar, Value};

/// Result type for decoding operations
pub type ParseResult<T> = Result<T, CodecError>;

/// Entry in a mapping; the key is `None` when it is not a scalar
pub type ObjectEntry<N> = (Option<String>, N);

/// Operations the decoder needs from a parsed document tree.
/// Each input format (markup, JSON, the encoder's own output) implements
/// this for its node type.
pub trait CfnParser {
	/// The underlying node type (must be cloneable)
	type Node: Clone;

	// ===== Scalar operations =====

	/// Interpret an untagged leaf node as a scalar
	fn node_as_scalar(&self, node: &Self::Node) -> Option<Scalar>;

	// ===== Collection operations =====

	/// Elements of an untagged sequence node (owned copies)
	fn array_items(&self, node: &Self::Node) -> Option<Vec<Self::Node>>;

	/// Entries of an untagged mapping node, in source order (owned copies)
	fn object_entries(&self, node: &Self::Node) -> Option<Vec<ObjectEntry<Self::Node>>>;

	// ===== Position and structure =====

	/// Where this node starts in the source
	fn node_location(&self, node: &Self::Node) -> Location;

	/// Explicit tag on this node, without a leading `!` for local tags,
	/// together with the node's content stripped of the tag
	fn node_tag(&self, _node: &Self::Node) -> Option<(String, Self::Node)> {
		None
	}

	/// Fail on nodes that only make sense as a back-reference into an
	/// ancestor that is still being built
	fn check_structure(&self, _node: &Self::Node) -> ParseResult<()> {
		Ok(())
	}

	/// Whether single-key mappings like `Fn::Join: [...]` are intrinsics
	fn long_form_enabled(&self) -> bool {
		true
	}

	// ===== High-level helpers with default implementations =====

	/// Check if this node represents an intrinsic function.
	/// Returns the kind and the argument node; unknown tags and keys are
	/// plain data and yield `None`.
	fn detect_intrinsic(&self, node: &Self::Node) -> Option<(IntrinsicKind, Self::Node)> {
		// Short form: !Ref MyBucket
		if let Some((tag, inner)) = self.node_tag(node) {
			return intrinsics::get_intrinsic_by_tag(&tag).map(|def| (def.kind, inner));
		}

		// Long form: Ref: MyBucket
		if !self.long_form_enabled() {
			return None;
		}
		let entries = self.object_entries(node)?;
		if let [(Some(key), value_node)] = entries.as_slice()
			&& let Some(def) = intrinsics::get_intrinsic_by_json_key(key)
		{
			return Some((def.kind, value_node.clone()));
		}

		None
	}
}

/// Decode a node tree into a `Value`, recognising intrinsics in both
/// short-tag and long-key form at any depth
pub fn decode<P: CfnParser>(parser: &P, node: &P::Node) -> ParseResult<Value> {
	parser.check_structure(node)?;

	// Check for intrinsics BEFORE treating the node as plain data
	if let Some((kind, inner)) = parser.detect_intrinsic(node) {
		let location = parser.node_location(node);
		return parse_intrinsic(parser, kind, &inner, location).map(Value::node);
	}

	if let Some((tag, inner)) = parser.node_tag(node) {
		tracing::debug!(%tag, location = %parser.node_location(node), "passing unknown tag through as data");
		// Tagged content is data: `!Custom {Ref: x}` stays a mapping
		parser.check_structure(&inner)?;
		return decode_data(parser, &inner);
	}

	decode_data(parser, node)
}

/// Decode a node as plain data, without looking for a long-form key on the
/// node itself. Children go through `decode` as usual.
fn decode_data<P: CfnParser>(parser: &P, node: &P::Node) -> ParseResult<Value> {
	if let Some(scalar) = parser.node_as_scalar(node) {
		return Ok(Value::Scalar(scalar));
	}

	if let Some(items) = parser.array_items(node) {
		let items = items
			.iter()
			.map(|item| decode(parser, item))
			.collect::<ParseResult<Vec<_>>>()?;
		return Ok(Value::Sequence(items));
	}

	if let Some(entries) = parser.object_entries(node) {
		return decode_mapping(parser, entries).map(Value::Mapping);
	}

	Ok(Value::Scalar(Scalar::Null))
}

fn decode_mapping<P: CfnParser>(
	parser: &P,
	entries: Vec<ObjectEntry<P::Node>>,
) -> ParseResult<Mapping> {
	let mut map = Mapping::with_capacity(entries.len());
	for (key, value_node) in entries {
		let key = key.ok_or_else(|| CodecError::InvalidKey {
			location: parser.node_location(&value_node),
		})?;
		map.insert(key, decode(parser, &value_node)?);
	}
	Ok(map)
}

fn parse_intrinsic<P: CfnParser>(
	parser: &P,
	kind: IntrinsicKind,
	node: &P::Node,
	location: Location,
) -> ParseResult<Intrinsic> {
	let args = Args {
		parser,
		kind,
		location,
	};

	match kind {
		IntrinsicKind::Ref => parse_ref(&args, node),
		IntrinsicKind::Condition => parse_condition(&args, node),
		IntrinsicKind::GetAtt => parse_getatt(&args, node),
		IntrinsicKind::GetAZs => Ok(Intrinsic::GetAZs {
			region: decode(parser, node)?,
		}),
		IntrinsicKind::ImportValue => Ok(Intrinsic::ImportValue {
			reference: decode(parser, node)?,
		}),
		IntrinsicKind::Base64 => Ok(Intrinsic::Base64 {
			value: decode(parser, node)?,
		}),
		IntrinsicKind::Cidr => parse_cidr(&args, node),
		IntrinsicKind::FindInMap => parse_find_in_map(&args, node),
		IntrinsicKind::Join => parse_join(&args, node),
		IntrinsicKind::Select => parse_select(&args, node),
		IntrinsicKind::Split => parse_split(&args, node),
		IntrinsicKind::Sub => parse_sub(&args, node),
		IntrinsicKind::Transform => parse_transform(&args, node),
		IntrinsicKind::And
		| IntrinsicKind::Or
		| IntrinsicKind::Not
		| IntrinsicKind::Equals
		| IntrinsicKind::If => parse_conditional(&args, node),
	}
}

/// Context shared by the per-intrinsic readers
struct Args<'p, P> {
	parser: &'p P,
	kind: IntrinsicKind,
	location: Location,
}

impl<P: CfnParser> Args<'_, P> {
	fn malformed(&self) -> CodecError {
		CodecError::Shape {
			kind: self.kind,
			expected: self.kind.arity().to_string(),
			location: self.location,
		}
	}

	fn malformed_field(&self, field: &str, expected: &str, node: &P::Node) -> CodecError {
		CodecError::Shape {
			kind: self.kind,
			expected: format!("`{field}` to be {expected}"),
			location: self.parser.node_location(node),
		}
	}

	/// Elements of the argument sequence, length-checked against the registry
	fn sequence(&self, node: &P::Node) -> ParseResult<Vec<P::Node>> {
		let items = self
			.parser
			.array_items(node)
			.ok_or_else(|| self.malformed())?;

		match self.kind.arity() {
			Arity::Sequence(len) | Arity::ScalarOrSequence(len) if items.len() != len => {
				Err(self.malformed())
			}
			_ => Ok(items),
		}
	}

	/// Lexical text of a scalar field
	fn text(&self, field: &str, node: &P::Node) -> ParseResult<String> {
		match self.parser.node_as_scalar(node) {
			Some(Scalar::Null) | None => Err(self.malformed_field(field, "a scalar", node)),
			Some(scalar) => Ok(scalar.to_string()),
		}
	}

	/// Integer field; accepts numbers and base-10 strings, range unchecked
	fn integer(&self, field: &'static str, node: &P::Node) -> ParseResult<i64> {
		let invalid = |value: String| CodecError::Type {
			kind: self.kind,
			field,
			value,
			location: self.parser.node_location(node),
		};

		match self.parser.node_as_scalar(node) {
			Some(Scalar::Int(i)) => Ok(i),
			Some(Scalar::Float(x)) if x.fract() == 0.0 && x.abs() < i64::MAX as f64 => Ok(x as i64),
			Some(Scalar::String(s)) => s.parse::<i64>().map_err(|_| invalid(s)),
			Some(other) => Err(invalid(other.to_string())),
			None => Err(invalid(describe_node(self.parser, node))),
		}
	}

	/// Variables/parameters mapping; null means empty
	fn mapping(&self, field: &str, node: &P::Node) -> ParseResult<Mapping> {
		match decode(self.parser, node)? {
			Value::Mapping(map) => Ok(map),
			Value::Scalar(Scalar::Null) => Ok(Mapping::new()),
			_ => Err(self.malformed_field(field, "a mapping", node)),
		}
	}
}

/// Short description of a non-scalar node for error messages
fn describe_node<P: CfnParser>(parser: &P, node: &P::Node) -> String {
	if let Some((kind, _)) = parser.detect_intrinsic(node) {
		kind.to_string()
	} else if parser.array_items(node).is_some() {
		"a sequence".to_string()
	} else if parser.object_entries(node).is_some() {
		"a mapping".to_string()
	} else {
		"a non-scalar value".to_string()
	}
}

fn parse_ref<P: CfnParser>(args: &Args<'_, P>, node: &P::Node) -> ParseResult<Intrinsic> {
	match args.parser.node_as_scalar(node) {
		Some(Scalar::Null) | None => Err(args.malformed()),
		Some(scalar) => Ok(Intrinsic::Ref {
			reference: scalar.to_string(),
		}),
	}
}

fn parse_condition<P: CfnParser>(args: &Args<'_, P>, node: &P::Node) -> ParseResult<Intrinsic> {
	match args.parser.node_as_scalar(node) {
		Some(Scalar::Null) | None => Err(args.malformed()),
		Some(scalar) => Ok(Intrinsic::Condition {
			condition: scalar.to_string(),
		}),
	}
}

fn parse_getatt<P: CfnParser>(args: &Args<'_, P>, node: &P::Node) -> ParseResult<Intrinsic> {
	// String form: "ResourceName.AttributeName", split on the first dot
	if let Some(Scalar::String(s)) = args.parser.node_as_scalar(node) {
		return match s.split_once('.') {
			Some((resource, attribute)) => Ok(Intrinsic::GetAtt {
				resource: resource.to_string(),
				attribute: attribute.to_string(),
			}),
			None => Err(args.malformed_field("resource.attribute", "dotted", node)),
		};
	}

	// Array form: [ResourceName, AttributeName]
	let items = args.sequence(node)?;
	Ok(Intrinsic::GetAtt {
		resource: args.text("resource", &items[0])?,
		attribute: args.text("attribute", &items[1])?,
	})
}

fn parse_cidr<P: CfnParser>(args: &Args<'_, P>, node: &P::Node) -> ParseResult<Intrinsic> {
	// Cidr: [ipBlock, count, cidrBits]
	let items = args.sequence(node)?;
	Ok(Intrinsic::Cidr {
		ip_block: decode(args.parser, &items[0])?,
		count: args.integer("count", &items[1])?,
		cidr_bits: args.integer("cidrBits", &items[2])?,
	})
}

fn parse_find_in_map<P: CfnParser>(args: &Args<'_, P>, node: &P::Node) -> ParseResult<Intrinsic> {
	// FindInMap: [MapName, TopLevelKey, SecondLevelKey]
	let items = args.sequence(node)?;
	Ok(Intrinsic::FindInMap {
		map_name: args.text("mapName", &items[0])?,
		top_level_key: decode(args.parser, &items[1])?,
		second_level_key: args.text("secondLevelKey", &items[2])?,
	})
}

fn parse_join<P: CfnParser>(args: &Args<'_, P>, node: &P::Node) -> ParseResult<Intrinsic> {
	// Join: [delimiter, [values]]; a lone value stands for a one-element list
	let items = args.sequence(node)?;
	let delimiter = args.text("delimiter", &items[0])?;
	let values = match decode(args.parser, &items[1])? {
		Value::Sequence(values) => values,
		single => vec![single],
	};

	Ok(Intrinsic::Join { delimiter, values })
}

fn parse_select<P: CfnParser>(args: &Args<'_, P>, node: &P::Node) -> ParseResult<Intrinsic> {
	// Select: [index, list]
	let items = args.sequence(node)?;
	Ok(Intrinsic::Select {
		index: args.integer("index", &items[0])?,
		selection: decode(args.parser, &items[1])?,
	})
}

fn parse_split<P: CfnParser>(args: &Args<'_, P>, node: &P::Node) -> ParseResult<Intrinsic> {
	// Split: [delimiter, source]
	let items = args.sequence(node)?;
	Ok(Intrinsic::Split {
		delimiter: args.text("delimiter", &items[0])?,
		source: decode(args.parser, &items[1])?,
	})
}

fn parse_sub<P: CfnParser>(args: &Args<'_, P>, node: &P::Node) -> ParseResult<Intrinsic> {
	// String form: "template with ${Var}"
	if let Some(scalar) = args.parser.node_as_scalar(node) {
		if scalar == Scalar::Null {
			return Err(args.malformed());
		}
		return Ok(Intrinsic::Sub {
			template: scalar.to_string(),
			variables: Mapping::new(),
		});
	}

	// Array form: ["template", {Var1: val1}]
	let items = args.sequence(node)?;
	Ok(Intrinsic::Sub {
		template: args.text("template", &items[0])?,
		variables: args.mapping("variables", &items[1])?,
	})
}

fn parse_transform<P: CfnParser>(args: &Args<'_, P>, node: &P::Node) -> ParseResult<Intrinsic> {
	// Transform: { Name: macro, Parameters: {...} }
	let entries = args
		.parser
		.object_entries(node)
		.ok_or_else(|| args.malformed())?;

	let mut name = None;
	let mut parameters = Mapping::new();
	for (key, value_node) in &entries {
		match key.as_deref() {
			Some("Name") => name = Some(args.text("Name", value_node)?),
			Some("Parameters") => parameters = args.mapping("Parameters", value_node)?,
			_ => {}
		}
	}

	let name = name.ok_or_else(|| args.malformed())?;
	Ok(Intrinsic::Transform { name, parameters })
}

fn parse_conditional<P: CfnParser>(args: &Args<'_, P>, node: &P::Node) -> ParseResult<Intrinsic> {
	let Some(op) = ConditionalOp::from_kind(args.kind) else {
		return Err(args.malformed());
	};

	let operands = args
		.sequence(node)?
		.iter()
		.map(|item| decode(args.parser, item))
		.collect::<ParseResult<Vec<_>>>()?;

	Ok(Intrinsic::Conditional { op, operands })
}
