//! YAML text emitter for markup trees
//!
//! Layout follows the common block/flow conventions: a collection whose
//! children are all scalars goes inline (`[a, b]`), anything deeper is
//! written in block style. Tags are written in front of their node, with
//! tagged block collections opening on the next line.

pub mod node;
pub mod options;
mod scalar;

pub use node::MarkupNode;
pub use options::{EmitterOptions, FlowStyle, LineBreak, ScalarStyle};

use scalar::Rendered;

use crate::cfn_ir::types::Scalar;

/// Serialize a markup tree as a single YAML document
pub fn emit(node: &MarkupNode, options: &EmitterOptions) -> String {
	let options = options.normalized();
	let mut emitter = Emitter {
		options: &options,
		out: String::new(),
		column: 0,
	};
	emitter.document(node);

	match options.line_break {
		LineBreak::Unix => emitter.out,
		other => emitter.out.replace('\n', other.as_str()),
	}
}

/// Where a node starts relative to its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
	/// Top of the document, at column 0
	Root,
	/// Right after `key:`
	MappingValue,
	/// Right after `- `
	SequenceItem,
}

struct Emitter<'o> {
	options: &'o EmitterOptions,
	out: String,
	column: usize,
}

impl Emitter<'_> {
	fn write(&mut self, text: &str) {
		self.out.push_str(text);
		match text.rfind('\n') {
			Some(i) => self.column = text[i + 1..].chars().count(),
			None => self.column += text.chars().count(),
		}
	}

	fn newline(&mut self) {
		self.write("\n");
	}

	fn write_indent(&mut self, width: usize) {
		self.write(&" ".repeat(width));
	}

	fn document(&mut self, node: &MarkupNode) {
		if self.options.explicit_start {
			if node.tag().is_none() && self.is_block_collection(node) {
				self.write("---");
				self.newline();
			} else {
				self.write("--- ");
			}
		}

		self.node(node, 0, Position::Root);

		if self.options.explicit_end {
			self.write("...");
			self.newline();
		}
	}

	/// Indentation for content that continues below the current line
	fn content_indent(&self, indent: usize, position: Position) -> usize {
		match position {
			Position::Root => self.options.indent,
			Position::MappingValue | Position::SequenceItem => indent + self.options.indent,
		}
	}

	fn separate(&mut self, position: Position) {
		if position == Position::MappingValue {
			self.write(" ");
		}
	}

	fn node(&mut self, node: &MarkupNode, indent: usize, position: Position) {
		match node {
			MarkupNode::Scalar { tag, value } => {
				self.separate(position);
				if let Some(tag) = tag {
					self.write(tag);
					self.write(" ");
				}
				let rendered = scalar::render_block(value, tag.is_some(), self.options);
				self.write_scalar(rendered, self.content_indent(indent, position));
			}

			_ if !self.is_block_collection(node) => {
				self.separate(position);
				self.flow_collection(node, self.content_indent(indent, position));
				self.newline();
			}

			MarkupNode::Sequence { tag, items } => {
				let dash = match position {
					Position::Root => self.options.indicator_indent,
					Position::MappingValue => indent + self.options.indicator_indent,
					Position::SequenceItem => indent + 2,
				};
				let inline_first = self.open_block(tag.as_deref(), position);

				for (i, item) in items.iter().enumerate() {
					if i > 0 || !inline_first {
						self.write_indent(dash);
					}
					self.write("- ");
					self.node(item, dash, Position::SequenceItem);
				}
			}

			MarkupNode::Mapping { tag, entries } => {
				let column = match position {
					Position::Root => 0,
					Position::MappingValue => indent + self.options.indent,
					Position::SequenceItem => indent + 2,
				};
				let inline_first = self.open_block(tag.as_deref(), position);

				for (i, (key, value)) in entries.iter().enumerate() {
					if i > 0 || !inline_first {
						self.write_indent(column);
					}
					let key = self.key(key, false);
					self.write(&key);
					self.write(":");
					self.node(value, column, Position::MappingValue);
				}
			}
		}
	}

	/// Write whatever precedes the first entry of a block collection.
	/// Returns true when that entry continues on the current line.
	fn open_block(&mut self, tag: Option<&str>, position: Position) -> bool {
		match (tag, position) {
			(Some(tag), _) => {
				self.separate(position);
				self.write(tag);
				self.newline();
				false
			}
			(None, Position::SequenceItem) => true,
			(None, Position::MappingValue) => {
				self.newline();
				false
			}
			(None, Position::Root) => false,
		}
	}

	fn write_scalar(&mut self, rendered: Rendered, content_indent: usize) {
		match rendered {
			Rendered::Inline(text) => {
				self.write(&text);
				self.newline();
			}
			Rendered::Block { header, lines } => {
				self.write(&header);
				self.newline();
				for line in lines {
					if !line.is_empty() {
						self.write_indent(content_indent);
						self.write(&line);
					}
					self.newline();
				}
			}
		}
	}

	fn key(&self, key: &str, flow: bool) -> String {
		let key = Scalar::String(key.to_string());
		scalar::render_inline(&key, false, flow, self.options)
	}

	fn is_block_collection(&self, node: &MarkupNode) -> bool {
		let simple = |child: &MarkupNode| match child {
			MarkupNode::Scalar { value, .. } => {
				!matches!(value, Scalar::String(s) if s.contains('\n'))
			}
			_ => false,
		};

		match node {
			MarkupNode::Scalar { .. } => false,
			MarkupNode::Sequence { items, .. } if items.is_empty() => false,
			MarkupNode::Mapping { entries, .. } if entries.is_empty() => false,
			MarkupNode::Sequence { items, .. } => match self.options.flow_style {
				FlowStyle::Flow => false,
				FlowStyle::Block => true,
				FlowStyle::Auto => !items.iter().all(simple),
			},
			MarkupNode::Mapping { entries, .. } => match self.options.flow_style {
				FlowStyle::Flow => false,
				FlowStyle::Block => true,
				FlowStyle::Auto => !entries.iter().all(|(_, value)| simple(value)),
			},
		}
	}

	/// Write a flow collection, breaking between items past the line width
	fn flow_collection(&mut self, node: &MarkupNode, wrap_indent: usize) {
		let (open, close, parts): (&str, &str, Vec<String>) = match node {
			MarkupNode::Sequence { items, .. } => {
				("[", "]", items.iter().map(|item| self.flow_node(item)).collect())
			}
			MarkupNode::Mapping { entries, .. } => ("{", "}", self.flow_entries(entries)),
			MarkupNode::Scalar { .. } => {
				let text = self.flow_node(node);
				self.write(&text);
				return;
			}
		};

		if let Some(tag) = node.tag() {
			self.write(tag);
			self.write(" ");
		}
		self.write(open);
		for (i, part) in parts.iter().enumerate() {
			if i > 0 {
				self.write(",");
				if self.exceeds_width(part.chars().count() + 2) {
					self.newline();
					self.write_indent(wrap_indent);
				} else {
					self.write(" ");
				}
			}
			self.write(part);
		}
		self.write(close);
	}

	fn exceeds_width(&self, extra: usize) -> bool {
		self.options.split_lines
			&& self
				.options
				.width
				.is_some_and(|width| self.column + extra > width)
	}

	fn flow_entries(&self, entries: &[(String, MarkupNode)]) -> Vec<String> {
		entries
			.iter()
			.map(|(key, value)| format!("{}: {}", self.key(key, true), self.flow_node(value)))
			.collect()
	}

	/// Single-line rendering of any node
	fn flow_node(&self, node: &MarkupNode) -> String {
		let body = match node {
			MarkupNode::Scalar { tag, value } => {
				scalar::render_inline(value, tag.is_some(), true, self.options)
			}
			MarkupNode::Sequence { items, .. } => {
				let items: Vec<String> = items.iter().map(|item| self.flow_node(item)).collect();
				format!("[{}]", items.join(", "))
			}
			MarkupNode::Mapping { entries, .. } => {
				format!("{{{}}}", self.flow_entries(entries).join(", "))
			}
		};

		match node.tag() {
			Some(tag) => format!("{tag} {body}"),
			None => body,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn emit_default(node: &MarkupNode) -> String {
		emit(node, &EmitterOptions::default())
	}

	fn strings(items: &[&str]) -> Vec<MarkupNode> {
		items.iter().map(|s| MarkupNode::string(*s)).collect()
	}

	#[test]
	fn scalar_documents() {
		assert_eq!(emit_default(&MarkupNode::string("hello")), "hello\n");
		assert_eq!(emit_default(&MarkupNode::scalar(Scalar::Int(42))), "42\n");
		assert_eq!(
			emit_default(&MarkupNode::string("x").with_tag("!Ref")),
			"!Ref 'x'\n"
		);
	}

	#[test]
	fn scalar_children_go_inline() {
		let node = MarkupNode::sequence(strings(&["a", "b", "c"]));
		assert_eq!(emit_default(&node), "[a, b, c]\n");

		let node = MarkupNode::mapping(vec![("key".to_string(), MarkupNode::string("value"))]);
		assert_eq!(emit_default(&node), "{key: value}\n");
	}

	#[test]
	fn nested_collections_go_block() {
		let node = MarkupNode::mapping(vec![
			(
				"Parameters".to_string(),
				MarkupNode::mapping(vec![("key".to_string(), MarkupNode::string("value"))]),
			),
			("list".to_string(), MarkupNode::sequence(strings(&["x", "y"]))),
		]);
		assert_eq!(
			emit_default(&node),
			"Parameters: {key: value}\nlist: [x, y]\n"
		);

		let outer = MarkupNode::mapping(vec![("Outer".to_string(), node)]);
		assert_eq!(
			emit_default(&outer),
			"Outer:\n  Parameters: {key: value}\n  list: [x, y]\n"
		);
	}

	#[test]
	fn block_sequences_sit_under_their_key() {
		let node = MarkupNode::mapping(vec![(
			"Items".to_string(),
			MarkupNode::sequence(vec![
				MarkupNode::sequence(strings(&["a"])),
				MarkupNode::mapping(vec![
					("k1".to_string(), MarkupNode::string("v1")),
					("k2".to_string(), MarkupNode::sequence(vec![])),
				]),
			]),
		)]);
		assert_eq!(
			emit_default(&node),
			"Items:\n- [a]\n- k1: v1\n  k2: []\n"
		);

		let options = EmitterOptions::block();
		assert_eq!(
			emit(&node, &options),
			"Items:\n- - a\n- k1: v1\n  k2: []\n"
		);
	}

	#[test]
	fn indicator_indent_shifts_dashes() {
		let node = MarkupNode::mapping(vec![(
			"Items".to_string(),
			MarkupNode::sequence(strings(&["a", "b"])),
		)]);
		let options = EmitterOptions {
			indicator_indent: 2,
			indent: 4,
			..EmitterOptions::block()
		};
		assert_eq!(emit(&node, &options), "Items:\n  - a\n  - b\n");
	}

	#[test]
	fn tagged_block_collections_open_on_next_line() {
		let node = MarkupNode::sequence(vec![
			MarkupNode::string(":"),
			MarkupNode::sequence(strings(&["a", "b", "c"])),
		])
		.with_tag("!Join");
		assert_eq!(emit_default(&node), "!Join\n- ':'\n- [a, b, c]\n");

		let wrapped = MarkupNode::mapping(vec![("Value".to_string(), node)]);
		assert_eq!(
			emit_default(&wrapped),
			"Value: !Join\n- ':'\n- [a, b, c]\n"
		);
	}

	#[test]
	fn tagged_flow_collections_stay_inline() {
		let node = MarkupNode::sequence(vec![
			MarkupNode::string("x").with_tag("!Ref"),
			MarkupNode::string("b"),
		])
		.with_tag("!And");
		assert_eq!(emit_default(&node), "!And [!Ref 'x', b]\n");
	}

	#[test]
	fn multiline_values_use_literal_blocks() {
		let node = MarkupNode::mapping(vec![(
			"UserData".to_string(),
			MarkupNode::string("#!/bin/bash\necho hi\n"),
		)]);
		assert_eq!(
			emit_default(&node),
			"UserData: |\n  #!/bin/bash\n  echo hi\n"
		);

		let node = MarkupNode::sequence(vec![MarkupNode::string("a\n\nb")]);
		assert_eq!(emit_default(&node), "- |-\n  a\n\n  b\n");
	}

	#[test]
	fn long_flow_sequences_wrap() {
		let items: Vec<MarkupNode> = (0..12).map(|i| MarkupNode::string(format!("item{i:02}"))).collect();
		let node = MarkupNode::sequence(items);
		let options = EmitterOptions {
			width: Some(40),
			..EmitterOptions::default()
		};
		let text = emit(&node, &options);
		assert!(text.lines().count() > 1);
		assert!(text.lines().all(|line| line.len() <= 40), "{text}");
		assert!(text.lines().skip(1).all(|line| line.starts_with("  ")));

		let unbounded = EmitterOptions {
			width: None,
			..EmitterOptions::default()
		};
		assert_eq!(emit(&node, &unbounded).lines().count(), 1);
	}

	#[test]
	fn document_markers_and_line_breaks() {
		let node = MarkupNode::mapping(vec![
			("a".to_string(), MarkupNode::sequence(strings(&["x"]))),
			("b".to_string(), MarkupNode::scalar(Scalar::Bool(true))),
		]);
		let options = EmitterOptions {
			explicit_start: true,
			explicit_end: true,
			line_break: LineBreak::Windows,
			flow_style: FlowStyle::Block,
			..EmitterOptions::default()
		};
		assert_eq!(
			emit(&node, &options),
			"---\r\na:\r\n- x\r\nb: true\r\n...\r\n"
		);

		let options = EmitterOptions {
			explicit_start: true,
			..EmitterOptions::default()
		};
		assert_eq!(
			emit(&MarkupNode::string("v").with_tag("!Ref"), &options),
			"--- !Ref 'v'\n"
		);
	}

	#[test]
	fn forced_flow_and_scalar_styles() {
		let node = MarkupNode::mapping(vec![(
			"outer".to_string(),
			MarkupNode::mapping(vec![("inner".to_string(), MarkupNode::string("v"))]),
		)]);
		let options = EmitterOptions {
			flow_style: FlowStyle::Flow,
			scalar_style: ScalarStyle::DoubleQuoted,
			..EmitterOptions::default()
		};
		assert_eq!(emit(&node, &options), "{\"outer\": {\"inner\": \"v\"}}\n");
	}

	#[test]
	fn awkward_keys_are_quoted() {
		let node = MarkupNode::mapping(vec![
			("".to_string(), MarkupNode::scalar(Scalar::Null)),
			("123".to_string(), MarkupNode::scalar(Scalar::Int(1))),
			("Fn::Base64".to_string(), MarkupNode::sequence(vec![MarkupNode::sequence(vec![])])),
		]);
		assert_eq!(
			emit_default(&node),
			"'': null\n'123': 1\nFn::Base64:\n- []\n"
		);
	}
}
