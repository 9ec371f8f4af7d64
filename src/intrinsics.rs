//! Declarative registry of CloudFormation intrinsic functions

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
	Ref,
	Condition,
	GetAtt,
	GetAZs,
	ImportValue,
	Base64,
	Cidr,
	FindInMap,
	Join,
	Select,
	Split,
	Sub,
	Transform,
	And,
	Or,
	Not,
	Equals,
	If,
}

/// Argument shape accepted by an intrinsic on decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
	/// A single scalar (`!Ref name`)
	Scalar,
	/// A scalar or a fixed-length sequence (`!GetAtt a.b`, `!Sub [tpl, vars]`)
	ScalarOrSequence(usize),
	/// A scalar or any nested value (`!Base64 {...}`)
	ScalarOrNested,
	/// A sequence of exactly this many elements
	Sequence(usize),
	/// A sequence of any length
	Variadic,
	/// A mapping with fixed keys
	Mapping,
}

/// Definition of an intrinsic function
#[derive(Debug)]
pub struct IntrinsicDef {
	pub kind: IntrinsicKind,
	pub yaml_tag: &'static str,
	pub json_key: &'static str,
	pub arity: Arity,
}

/// Global registry of all intrinsics
pub static INTRINSICS: &[IntrinsicDef] = &[
	IntrinsicDef {
		kind: IntrinsicKind::Ref,
		yaml_tag: "Ref",
		json_key: "Ref",
		arity: Arity::Scalar,
	},
	IntrinsicDef {
		kind: IntrinsicKind::Condition,
		yaml_tag: "Condition",
		json_key: "Condition",
		arity: Arity::Scalar,
	},
	IntrinsicDef {
		kind: IntrinsicKind::GetAtt,
		yaml_tag: "GetAtt",
		json_key: "Fn::GetAtt",
		arity: Arity::ScalarOrSequence(2),
	},
	IntrinsicDef {
		kind: IntrinsicKind::GetAZs,
		yaml_tag: "GetAZs",
		json_key: "Fn::GetAZs",
		arity: Arity::ScalarOrNested,
	},
	IntrinsicDef {
		kind: IntrinsicKind::ImportValue,
		yaml_tag: "ImportValue",
		json_key: "Fn::ImportValue",
		arity: Arity::ScalarOrNested,
	},
	IntrinsicDef {
		kind: IntrinsicKind::Base64,
		yaml_tag: "Base64",
		json_key: "Fn::Base64",
		arity: Arity::ScalarOrNested,
	},
	IntrinsicDef {
		kind: IntrinsicKind::Cidr,
		yaml_tag: "Cidr",
		json_key: "Fn::Cidr",
		arity: Arity::Sequence(3),
	},
	IntrinsicDef {
		kind: IntrinsicKind::FindInMap,
		yaml_tag: "FindInMap",
		json_key: "Fn::FindInMap",
		arity: Arity::Sequence(3),
	},
	IntrinsicDef {
		kind: IntrinsicKind::Join,
		yaml_tag: "Join",
		json_key: "Fn::Join",
		arity: Arity::Sequence(2),
	},
	IntrinsicDef {
		kind: IntrinsicKind::Select,
		yaml_tag: "Select",
		json_key: "Fn::Select",
		arity: Arity::Sequence(2),
	},
	IntrinsicDef {
		kind: IntrinsicKind::Split,
		yaml_tag: "Split",
		json_key: "Fn::Split",
		arity: Arity::Sequence(2),
	},
	IntrinsicDef {
		kind: IntrinsicKind::Sub,
		yaml_tag: "Sub",
		json_key: "Fn::Sub",
		arity: Arity::ScalarOrSequence(2),
	},
	IntrinsicDef {
		kind: IntrinsicKind::Transform,
		yaml_tag: "Transform",
		json_key: "Fn::Transform",
		arity: Arity::Mapping,
	},
	IntrinsicDef {
		kind: IntrinsicKind::And,
		yaml_tag: "And",
		json_key: "Fn::And",
		arity: Arity::Variadic,
	},
	IntrinsicDef {
		kind: IntrinsicKind::Or,
		yaml_tag: "Or",
		json_key: "Fn::Or",
		arity: Arity::Variadic,
	},
	IntrinsicDef {
		kind: IntrinsicKind::Not,
		yaml_tag: "Not",
		json_key: "Fn::Not",
		arity: Arity::Variadic,
	},
	IntrinsicDef {
		kind: IntrinsicKind::Equals,
		yaml_tag: "Equals",
		json_key: "Fn::Equals",
		arity: Arity::Variadic,
	},
	IntrinsicDef {
		kind: IntrinsicKind::If,
		yaml_tag: "If",
		json_key: "Fn::If",
		arity: Arity::Variadic,
	},
];

/// Look up intrinsic by YAML tag (without the leading `!`)
pub fn get_intrinsic_by_tag(tag: &str) -> Option<&'static IntrinsicDef> {
	INTRINSICS.iter().find(|i| i.yaml_tag == tag)
}

/// Look up intrinsic by JSON key
pub fn get_intrinsic_by_json_key(key: &str) -> Option<&'static IntrinsicDef> {
	INTRINSICS.iter().find(|i| i.json_key == key)
}

impl IntrinsicKind {
	/// Registry row for this kind
	pub fn def(self) -> &'static IntrinsicDef {
		// Every variant has exactly one row; the table test below pins that.
		match INTRINSICS.iter().find(|i| i.kind == self) {
			Some(def) => def,
			None => unreachable!("intrinsic {self:?} missing from registry"),
		}
	}

	/// Short YAML tag including the `!`, e.g. `!GetAtt`
	pub fn short_tag(self) -> String {
		format!("!{}", self.def().yaml_tag)
	}

	pub fn json_key(self) -> &'static str {
		self.def().json_key
	}

	pub fn arity(self) -> Arity {
		self.def().arity
	}
}

impl fmt::Display for Arity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Arity::Scalar => write!(f, "a scalar"),
			Arity::ScalarOrSequence(n) => write!(f, "a scalar or a {n}-element sequence"),
			Arity::ScalarOrNested => write!(f, "a scalar or nested value"),
			Arity::Sequence(n) => write!(f, "a {n}-element sequence"),
			Arity::Variadic => write!(f, "a sequence"),
			Arity::Mapping => write!(f, "a mapping with `Name` and `Parameters`"),
		}
	}
}

impl fmt::Display for IntrinsicKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "!{}", self.def().yaml_tag)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_kind_has_one_row() {
		for def in INTRINSICS {
			let rows = INTRINSICS.iter().filter(|i| i.kind == def.kind).count();
			assert_eq!(rows, 1, "{:?} registered {} times", def.kind, rows);
		}
		assert_eq!(INTRINSICS.len(), 18);
	}

	#[test]
	fn lookups_are_exact_and_case_sensitive() {
		assert_eq!(get_intrinsic_by_tag("Ref").unwrap().kind, IntrinsicKind::Ref);
		assert_eq!(
			get_intrinsic_by_json_key("Fn::GetAZs").unwrap().kind,
			IntrinsicKind::GetAZs
		);
		assert!(get_intrinsic_by_tag("ref").is_none());
		assert!(get_intrinsic_by_tag("!Ref").is_none());
		assert!(get_intrinsic_by_json_key("Fn::Ref").is_none());
		assert!(get_intrinsic_by_json_key("GetAtt").is_none());
	}

	#[test]
	fn unqualified_long_keys() {
		assert_eq!(IntrinsicKind::Ref.json_key(), "Ref");
		assert_eq!(IntrinsicKind::Condition.json_key(), "Condition");
		for def in INTRINSICS {
			if !matches!(def.kind, IntrinsicKind::Ref | IntrinsicKind::Condition) {
				assert_eq!(def.json_key, format!("Fn::{}", def.yaml_tag));
			}
		}
	}

	#[test]
	fn display_uses_short_tag() {
		assert_eq!(IntrinsicKind::FindInMap.to_string(), "!FindInMap");
		assert_eq!(IntrinsicKind::Not.short_tag(), "!Not");
	}
}
