/// How collections are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowStyle {
	/// Flow (`[a, b]`) when every child is a scalar, block otherwise
	#[default]
	Auto,
	Flow,
	Block,
}

/// Preferred style for string scalars. Non-string scalars are always plain,
/// and a string that would read back as something else is always quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalarStyle {
	#[default]
	Plain,
	SingleQuoted,
	DoubleQuoted,
	Literal,
	Folded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineBreak {
	#[default]
	Unix,
	Windows,
	Mac,
}

impl LineBreak {
	pub fn as_str(self) -> &'static str {
		match self {
			LineBreak::Unix => "\n",
			LineBreak::Windows => "\r\n",
			LineBreak::Mac => "\r",
		}
	}
}

/// Layout settings for YAML output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitterOptions {
	/// Spaces per nesting level, clamped to `2..=9`
	pub indent: usize,
	/// Extra spaces before a `-` under a mapping key; kept below `indent`
	pub indicator_indent: usize,
	/// Preferred line width for flow collections; `None` never wraps
	pub width: Option<usize>,
	/// Allow breaking long flow collections across lines
	pub split_lines: bool,
	pub flow_style: FlowStyle,
	pub scalar_style: ScalarStyle,
	pub line_break: LineBreak,
	/// Write non-ASCII characters as-is instead of escaping them
	pub allow_unicode: bool,
	/// Start the document with `---`
	pub explicit_start: bool,
	/// End the document with `...`
	pub explicit_end: bool,
}

impl Default for EmitterOptions {
	fn default() -> Self {
		Self {
			indent: 2,
			indicator_indent: 0,
			width: Some(80),
			split_lines: true,
			flow_style: FlowStyle::Auto,
			scalar_style: ScalarStyle::Plain,
			line_break: LineBreak::Unix,
			allow_unicode: true,
			explicit_start: false,
			explicit_end: false,
		}
	}
}

impl EmitterOptions {
	/// Settings for converting plain JSON: everything in block style on
	/// unbounded lines
	pub fn block() -> Self {
		Self {
			width: None,
			flow_style: FlowStyle::Block,
			..Self::default()
		}
	}

	/// Copy with out-of-range values pulled back into range
	pub fn normalized(&self) -> Self {
		let indent = self.indent.clamp(2, 9);
		Self {
			indent,
			indicator_indent: self.indicator_indent.min(indent - 1),
			width: self.width.map(|w| w.max(20)),
			..self.clone()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn normalized_clamps_indentation() {
		let options = EmitterOptions {
			indent: 12,
			indicator_indent: 15,
			..EmitterOptions::default()
		}
		.normalized();
		assert_eq!(options.indent, 9);
		assert_eq!(options.indicator_indent, 8);

		let options = EmitterOptions {
			indent: 0,
			..EmitterOptions::default()
		}
		.normalized();
		assert_eq!(options.indent, 2);
		assert_eq!(options.indicator_indent, 0);
	}

	#[test]
	fn block_preset_disables_wrapping() {
		let options = EmitterOptions::block();
		assert_eq!(options.flow_style, FlowStyle::Block);
		assert_eq!(options.width, None);
		assert_eq!(options.indent, 2);
	}
}
