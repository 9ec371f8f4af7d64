use crate::cfn_ir::types::Scalar;

/// Generic markup tree handed to the emitter. Tags are written verbatim
/// (including the leading `!`).
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
	Scalar {
		tag: Option<String>,
		value: Scalar,
	},
	Sequence {
		tag: Option<String>,
		items: Vec<MarkupNode>,
	},
	Mapping {
		tag: Option<String>,
		entries: Vec<(String, MarkupNode)>,
	},
}

impl MarkupNode {
	pub fn scalar(value: Scalar) -> Self {
		MarkupNode::Scalar { tag: None, value }
	}

	pub fn string(s: impl Into<String>) -> Self {
		MarkupNode::scalar(Scalar::String(s.into()))
	}

	pub fn sequence(items: Vec<MarkupNode>) -> Self {
		MarkupNode::Sequence { tag: None, items }
	}

	pub fn mapping(entries: Vec<(String, MarkupNode)>) -> Self {
		MarkupNode::Mapping { tag: None, entries }
	}

	pub fn tag(&self) -> Option<&str> {
		match self {
			MarkupNode::Scalar { tag, .. }
			| MarkupNode::Sequence { tag, .. }
			| MarkupNode::Mapping { tag, .. } => tag.as_deref(),
		}
	}

	/// Attach a tag, replacing any existing one
	pub fn with_tag(mut self, new_tag: impl Into<String>) -> Self {
		match &mut self {
			MarkupNode::Scalar { tag, .. }
			| MarkupNode::Sequence { tag, .. }
			| MarkupNode::Mapping { tag, .. } => *tag = Some(new_tag.into()),
		}
		self
	}

	/// The same node without its tag
	pub fn untagged(&self) -> Self {
		match self {
			MarkupNode::Scalar { value, .. } => MarkupNode::scalar(value.clone()),
			MarkupNode::Sequence { items, .. } => MarkupNode::sequence(items.clone()),
			MarkupNode::Mapping { entries, .. } => MarkupNode::mapping(entries.clone()),
		}
	}
}
