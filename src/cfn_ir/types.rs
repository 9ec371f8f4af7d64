use std::fmt;

use indexmap::IndexMap;

use crate::intrinsics::IntrinsicKind;

/// Ordered mapping; keys are unique and keep source order
pub type Mapping = IndexMap<String, Value>;

/// A leaf value. Integers and floats stay distinct so that `Cidr`/`Select`
/// indices can tell `6` from `'6'` from `6.0`.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
}

/// A value in a CloudFormation template
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Scalar(Scalar),
	Sequence(Vec<Value>),
	Mapping(Mapping),
	Node(Box<Intrinsic>),
}

/// The five condition functions share one payload shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalOp {
	And,
	Or,
	Not,
	Equals,
	If,
}

/// A CloudFormation intrinsic function call
#[derive(Debug, Clone, PartialEq)]
pub enum Intrinsic {
	/// !Ref / { "Ref": "LogicalId" }
	Ref { reference: String },

	/// !Condition / { "Condition": "ConditionName" }
	Condition { condition: String },

	/// !GetAtt / { "Fn::GetAtt": ["LogicalId", "Attribute"] } / "LogicalId.Attribute"
	GetAtt { resource: String, attribute: String },

	/// !GetAZs / { "Fn::GetAZs": "region" }
	GetAZs { region: Value },

	/// !ImportValue / { "Fn::ImportValue": name }
	ImportValue { reference: Value },

	/// !Base64 / { "Fn::Base64": value }
	Base64 { value: Value },

	/// !Cidr / { "Fn::Cidr": [ipBlock, count, cidrBits] }
	Cidr {
		ip_block: Value,
		count: i64,
		cidr_bits: i64,
	},

	/// !FindInMap / { "Fn::FindInMap": [MapName, TopLevelKey, SecondLevelKey] }
	FindInMap {
		map_name: String,
		top_level_key: Value,
		second_level_key: String,
	},

	/// !Join / { "Fn::Join": [delimiter, [values]] }
	Join { delimiter: String, values: Vec<Value> },

	/// !Select / { "Fn::Select": [index, list] }
	Select { index: i64, selection: Value },

	/// !Split / { "Fn::Split": [delimiter, source] }
	Split { delimiter: String, source: Value },

	// !Sub / { "Fn::Sub": "template" } or { "Fn::Sub": ["template", {vars}] }
	// An empty `variables` and an absent one are the same thing.
	Sub { template: String, variables: Mapping },

	/// !Transform / { "Fn::Transform": { "Name": ..., "Parameters": {...} } }
	Transform { name: String, parameters: Mapping },

	/// !And, !Or, !Not, !Equals, !If
	Conditional {
		op: ConditionalOp,
		operands: Vec<Value>,
	},
}

impl Intrinsic {
	pub fn kind(&self) -> IntrinsicKind {
		match self {
			Intrinsic::Ref { .. } => IntrinsicKind::Ref,
			Intrinsic::Condition { .. } => IntrinsicKind::Condition,
			Intrinsic::GetAtt { .. } => IntrinsicKind::GetAtt,
			Intrinsic::GetAZs { .. } => IntrinsicKind::GetAZs,
			Intrinsic::ImportValue { .. } => IntrinsicKind::ImportValue,
			Intrinsic::Base64 { .. } => IntrinsicKind::Base64,
			Intrinsic::Cidr { .. } => IntrinsicKind::Cidr,
			Intrinsic::FindInMap { .. } => IntrinsicKind::FindInMap,
			Intrinsic::Join { .. } => IntrinsicKind::Join,
			Intrinsic::Select { .. } => IntrinsicKind::Select,
			Intrinsic::Split { .. } => IntrinsicKind::Split,
			Intrinsic::Sub { .. } => IntrinsicKind::Sub,
			Intrinsic::Transform { .. } => IntrinsicKind::Transform,
			Intrinsic::Conditional { op, .. } => op.kind(),
		}
	}
}

impl ConditionalOp {
	pub fn kind(self) -> IntrinsicKind {
		match self {
			ConditionalOp::And => IntrinsicKind::And,
			ConditionalOp::Or => IntrinsicKind::Or,
			ConditionalOp::Not => IntrinsicKind::Not,
			ConditionalOp::Equals => IntrinsicKind::Equals,
			ConditionalOp::If => IntrinsicKind::If,
		}
	}

	pub fn from_kind(kind: IntrinsicKind) -> Option<Self> {
		match kind {
			IntrinsicKind::And => Some(ConditionalOp::And),
			IntrinsicKind::Or => Some(ConditionalOp::Or),
			IntrinsicKind::Not => Some(ConditionalOp::Not),
			IntrinsicKind::Equals => Some(ConditionalOp::Equals),
			IntrinsicKind::If => Some(ConditionalOp::If),
			_ => None,
		}
	}
}

impl Value {
	pub fn string(s: impl Into<String>) -> Self {
		Value::Scalar(Scalar::String(s.into()))
	}

	pub fn int(i: i64) -> Self {
		Value::Scalar(Scalar::Int(i))
	}

	pub fn node(intrinsic: Intrinsic) -> Self {
		Value::Node(Box::new(intrinsic))
	}

	/// Try to get this value as a string
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Scalar(Scalar::String(s)) => Some(s.as_str()),
			_ => None,
		}
	}

	/// Try to get this value as a scalar
	pub fn as_scalar(&self) -> Option<&Scalar> {
		match self {
			Value::Scalar(s) => Some(s),
			_ => None,
		}
	}

	/// Try to get this value as a sequence
	pub fn as_sequence(&self) -> Option<&[Value]> {
		match self {
			Value::Sequence(items) => Some(items),
			_ => None,
		}
	}

	/// Try to get this value as a mapping
	pub fn as_mapping(&self) -> Option<&Mapping> {
		match self {
			Value::Mapping(map) => Some(map),
			_ => None,
		}
	}

	/// Try to get this value as an intrinsic node
	pub fn as_intrinsic(&self) -> Option<&Intrinsic> {
		match self {
			Value::Node(node) => Some(node),
			_ => None,
		}
	}
}

impl From<Intrinsic> for Value {
	fn from(intrinsic: Intrinsic) -> Self {
		Value::node(intrinsic)
	}
}

impl From<Scalar> for Value {
	fn from(scalar: Scalar) -> Self {
		Value::Scalar(scalar)
	}
}

/// Lexical form, as a YAML plain scalar would spell it
impl fmt::Display for Scalar {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Scalar::Null => write!(f, "null"),
			Scalar::Bool(b) => write!(f, "{b}"),
			Scalar::Int(i) => write!(f, "{i}"),
			Scalar::Float(x) if x.is_nan() => write!(f, ".nan"),
			Scalar::Float(x) if x.is_infinite() => {
				write!(f, "{}", if *x > 0.0 { ".inf" } else { "-.inf" })
			}
			Scalar::Float(x) if x.fract() == 0.0 && x.abs() < 1e15 => write!(f, "{x:.1}"),
			Scalar::Float(x) if x.fract() == 0.0 => write!(f, "{x:e}"),
			Scalar::Float(x) => write!(f, "{x}"),
			Scalar::String(s) => write!(f, "{s}"),
		}
	}
}
