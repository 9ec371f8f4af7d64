//! Scalar quoting: picks a style that reads back as the same string

use crate::cfn_ir::types::Scalar;

use super::options::{EmitterOptions, ScalarStyle};

/// A scalar ready to be written
#[derive(Debug, PartialEq)]
pub(super) enum Rendered {
	/// Fits on the current line
	Inline(String),
	/// `|` or `>` header followed by content lines (empty = blank line)
	Block { header: String, lines: Vec<String> },
}

/// Plain-looking words YAML 1.1 or 1.2 would resolve to null or a bool
const RESERVED_WORDS: &[&str] = &[
	"~", "null", "Null", "NULL", "true", "True", "TRUE", "false", "False", "FALSE", "yes", "Yes",
	"YES", "no", "No", "NO", "on", "On", "ON", "off", "Off", "OFF", "y", "Y", "n", "N",
];

/// Render a scalar in block context, where literal and folded styles are available
pub(super) fn render_block(value: &Scalar, tagged: bool, options: &EmitterOptions) -> Rendered {
	if let Scalar::String(text) = value {
		let block = match options.scalar_style {
			ScalarStyle::Literal => block_scalar(text, '|', options.allow_unicode),
			ScalarStyle::Folded => block_scalar(text, '>', options.allow_unicode)
				.or_else(|| block_scalar(text, '|', options.allow_unicode)),
			ScalarStyle::Plain if text.contains('\n') => {
				block_scalar(text, '|', options.allow_unicode)
			}
			_ => None,
		};
		if let Some(block) = block {
			return block;
		}
	}

	Rendered::Inline(render_inline(value, tagged, false, options))
}

/// Render a scalar on a single line. Also used for mapping keys.
pub(super) fn render_inline(
	value: &Scalar,
	tagged: bool,
	flow: bool,
	options: &EmitterOptions,
) -> String {
	let text = match value {
		Scalar::String(s) => s.clone(),
		other if !tagged => return other.to_string(),
		// A tag on a number or bool still wants string text after it
		other => other.to_string(),
	};

	let unicode = options.allow_unicode;
	match options.scalar_style {
		ScalarStyle::DoubleQuoted => double_quoted(&text, unicode),
		ScalarStyle::SingleQuoted => quoted(&text, unicode),
		_ if !tagged && plain_allowed(&text, flow, unicode) => text,
		_ => quoted(&text, unicode),
	}
}

/// Single quotes when they can carry the text, double quotes otherwise
fn quoted(text: &str, allow_unicode: bool) -> String {
	if text.chars().all(|c| is_printable(c, allow_unicode)) {
		format!("'{}'", text.replace('\'', "''"))
	} else {
		double_quoted(text, allow_unicode)
	}
}

fn is_printable(c: char, allow_unicode: bool) -> bool {
	match c {
		' '..='~' => true,
		'\u{feff}' | '\u{2028}' | '\u{2029}' => false,
		c if c.is_control() => false,
		_ => allow_unicode,
	}
}

fn plain_allowed(text: &str, flow: bool, allow_unicode: bool) -> bool {
	let mut chars = text.chars();
	let Some(first) = chars.next() else {
		return false;
	};
	let second = chars.next();

	if text.starts_with(' ') || text.ends_with(' ') {
		return false;
	}
	if !text.chars().all(|c| is_printable(c, allow_unicode)) {
		return false;
	}
	if text.starts_with("---") || text.starts_with("...") {
		return false;
	}

	match first {
		'-' | '?' | ':' => {
			let ends_indicator =
				|c: char| c == ' ' || (flow && matches!(c, ',' | '[' | ']' | '{' | '}'));
			if second.is_none_or(ends_indicator) {
				return false;
			}
		}
		',' | '[' | ']' | '{' | '}' | '#' | '&' | '*' | '!' | '|' | '>' | '\'' | '"' | '%'
		| '@' | '`' => return false,
		_ => {}
	}

	if text.contains(": ") || text.contains(" #") || text.ends_with(':') {
		return false;
	}
	if flow && text.contains([',', '[', ']', '{', '}', ':']) {
		return false;
	}

	!resolves_to_other_type(text)
}

/// Would a YAML loader read this plain text as a non-string?
fn resolves_to_other_type(text: &str) -> bool {
	RESERVED_WORDS.contains(&text) || looks_numeric(text) || looks_like_date(text)
}

fn looks_numeric(text: &str) -> bool {
	let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
	if unsigned.is_empty() {
		return false;
	}

	let lower = unsigned.to_ascii_lowercase();
	if matches!(lower.as_str(), ".inf" | ".nan") {
		return true;
	}

	let radix_digits = lower
		.strip_prefix("0x")
		.or_else(|| lower.strip_prefix("0o"))
		.or_else(|| lower.strip_prefix("0b"));
	if let Some(digits) = radix_digits
		&& !digits.is_empty()
		&& digits.chars().all(|c| c.is_ascii_hexdigit() || c == '_')
	{
		return true;
	}

	let digit_groups = |s: &str| {
		s.starts_with(|c: char| c.is_ascii_digit())
			&& s.chars().all(|c| c.is_ascii_digit() || c == '_')
	};
	// 1_000 and the YAML 1.1 base-60 form 1:30
	if unsigned.split(':').all(digit_groups) {
		return true;
	}

	unsigned.parse::<f64>().is_ok()
}

/// `2010-09-09` style prefixes, which YAML 1.1 loaders read as timestamps
fn looks_like_date(text: &str) -> bool {
	let mut parts = text.splitn(3, '-');
	let (Some(year), Some(month), Some(rest)) = (parts.next(), parts.next(), parts.next()) else {
		return false;
	};
	let day_digits = rest.chars().take_while(char::is_ascii_digit).count();

	year.len() == 4
		&& year.chars().all(|c| c.is_ascii_digit())
		&& (1..=2).contains(&month.len())
		&& month.chars().all(|c| c.is_ascii_digit())
		&& (1..=2).contains(&day_digits)
}

pub(super) fn double_quoted(text: &str, allow_unicode: bool) -> String {
	let mut out = String::with_capacity(text.len() + 2);
	out.push('"');
	for c in text.chars() {
		match c {
			'"' => out.push_str("\\\""),
			'\\' => out.push_str("\\\\"),
			'\0' => out.push_str("\\0"),
			'\u{7}' => out.push_str("\\a"),
			'\u{8}' => out.push_str("\\b"),
			'\t' => out.push_str("\\t"),
			'\n' => out.push_str("\\n"),
			'\u{b}' => out.push_str("\\v"),
			'\u{c}' => out.push_str("\\f"),
			'\r' => out.push_str("\\r"),
			'\u{1b}' => out.push_str("\\e"),
			'\u{85}' => out.push_str("\\N"),
			'\u{a0}' if !allow_unicode => out.push_str("\\_"),
			'\u{2028}' => out.push_str("\\L"),
			'\u{2029}' => out.push_str("\\P"),
			c if is_printable(c, allow_unicode) => out.push(c),
			c if (c as u32) <= 0xff => out.push_str(&format!("\\x{:02X}", c as u32)),
			c if (c as u32) <= 0xffff => out.push_str(&format!("\\u{:04X}", c as u32)),
			c => out.push_str(&format!("\\U{:08X}", c as u32)),
		}
	}
	out.push('"');
	out
}

/// Literal (`|`) or folded (`>`) rendering, if the text survives it
fn block_scalar(text: &str, indicator: char, allow_unicode: bool) -> Option<Rendered> {
	if text.trim().is_empty() {
		return None;
	}
	if !text.chars().all(|c| c == '\n' || is_printable(c, allow_unicode)) {
		return None;
	}
	// Indentation is detected from the first non-empty line
	if text
		.split('\n')
		.find(|line| !line.is_empty())
		.is_some_and(|line| line.starts_with(' '))
	{
		return None;
	}

	let trailing = text.len() - text.trim_end_matches('\n').len();
	let chomp = match trailing {
		0 => "-",
		1 => "",
		_ => "+",
	};
	let body = if trailing == 0 {
		text
	} else {
		&text[..text.len() - 1]
	};
	let body_lines: Vec<&str> = body.split('\n').collect();

	let lines = if indicator == '>' {
		// Folding joins adjacent lines, so every line break needs a blank line
		if trailing > 1 || body_lines.iter().any(|line| line.starts_with([' ', '\t'])) {
			return None;
		}
		let mut lines = Vec::with_capacity(body_lines.len() * 2);
		for (i, line) in body_lines.iter().enumerate() {
			lines.push(line.to_string());
			if !line.is_empty() && i + 1 < body_lines.len() {
				lines.push(String::new());
			}
		}
		lines
	} else {
		body_lines.iter().map(|line| line.to_string()).collect()
	};

	Some(Rendered::Block {
		header: format!("{indicator}{chomp}"),
		lines,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn plain(text: &str) -> String {
		render_inline(
			&Scalar::String(text.to_string()),
			false,
			false,
			&EmitterOptions::default(),
		)
	}

	fn flow(text: &str) -> String {
		render_inline(
			&Scalar::String(text.to_string()),
			false,
			true,
			&EmitterOptions::default(),
		)
	}

	#[test]
	fn ordinary_words_stay_plain() {
		assert_eq!(plain("HVM64"), "HVM64");
		assert_eq!(plain("a|b|c"), "a|b|c");
		assert_eq!(plain("192.168.0.0/24"), "192.168.0.0/24");
		assert_eq!(plain("AWS::Region"), "AWS::Region");
		assert_eq!(plain("hello world"), "hello world");
	}

	#[test]
	fn strings_that_read_as_other_types_are_quoted() {
		assert_eq!(plain("6"), "'6'");
		assert_eq!(plain("-1.5e3"), "'-1.5e3'");
		assert_eq!(plain("0x1F"), "'0x1F'");
		assert_eq!(plain("true"), "'true'");
		assert_eq!(plain("No"), "'No'");
		assert_eq!(plain("~"), "'~'");
		assert_eq!(plain("null"), "'null'");
		assert_eq!(plain(".inf"), "'.inf'");
		assert_eq!(plain("2010-09-09"), "'2010-09-09'");
		assert_eq!(plain(""), "''");
	}

	#[test]
	fn indicators_force_quotes() {
		assert_eq!(plain("|"), "'|'");
		assert_eq!(plain(":"), "':'");
		assert_eq!(plain("- item"), "'- item'");
		assert_eq!(plain("*alias"), "'*alias'");
		assert_eq!(plain("key: value"), "'key: value'");
		assert_eq!(plain("trailing:"), "'trailing:'");
		assert_eq!(plain(" padded"), "' padded'");
		assert_eq!(plain("it's"), "it's");
		assert_eq!(plain("'quoted'"), "'''quoted'''");
	}

	#[test]
	fn flow_context_quotes_flow_indicators() {
		assert_eq!(flow("Fn::Base64"), "'Fn::Base64'");
		assert_eq!(flow("a,b"), "'a,b'");
		assert_eq!(flow("${Var}"), "'${Var}'");
		assert_eq!(plain("${Var}"), "${Var}");
	}

	#[test]
	fn tagged_scalars_are_single_quoted() {
		let options = EmitterOptions::default();
		let value = Scalar::String("logicalName".to_string());
		assert_eq!(render_inline(&value, true, false, &options), "'logicalName'");
		assert_eq!(render_inline(&Scalar::Int(5), true, false, &options), "'5'");
	}

	#[test]
	fn non_strings_ignore_scalar_style() {
		let options = EmitterOptions {
			scalar_style: ScalarStyle::DoubleQuoted,
			..EmitterOptions::default()
		};
		assert_eq!(render_inline(&Scalar::Int(6), false, false, &options), "6");
		assert_eq!(render_inline(&Scalar::Bool(true), false, false, &options), "true");
		assert_eq!(render_inline(&Scalar::Null, false, false, &options), "null");
		assert_eq!(
			render_inline(&Scalar::String("x".into()), false, false, &options),
			"\"x\""
		);
	}

	#[test]
	fn double_quotes_escape_controls() {
		assert_eq!(double_quoted("a\"b\\c", true), r#""a\"b\\c""#);
		assert_eq!(double_quoted("tab\there", true), r#""tab\there""#);
		assert_eq!(double_quoted("\u{1}", true), r#""\x01""#);
		assert_eq!(double_quoted("é", false), r#""\xE9""#);
		assert_eq!(double_quoted("日", false), r#""\u65E5""#);
		assert_eq!(double_quoted("é", true), "\"é\"");
		assert_eq!(plain("café"), "café");
	}

	#[test]
	fn multiline_strings_use_literal_blocks() {
		let options = EmitterOptions::default();
		let render = |text: &str| render_block(&Scalar::String(text.to_string()), false, &options);

		assert_eq!(
			render("line1\nline2"),
			Rendered::Block {
				header: "|-".to_string(),
				lines: vec!["line1".to_string(), "line2".to_string()],
			}
		);
		assert_eq!(
			render("#!/bin/bash\necho hi\n"),
			Rendered::Block {
				header: "|".to_string(),
				lines: vec!["#!/bin/bash".to_string(), "echo hi".to_string()],
			}
		);
		assert_eq!(
			render("a\n\n"),
			Rendered::Block {
				header: "|+".to_string(),
				lines: vec!["a".to_string(), String::new()],
			}
		);
		// Leading indentation cannot be auto-detected
		assert_eq!(render("  a\nb"), Rendered::Inline(r#""  a\nb""#.to_string()));
	}

	#[test]
	fn folded_blocks_double_line_breaks() {
		let options = EmitterOptions {
			scalar_style: ScalarStyle::Folded,
			..EmitterOptions::default()
		};
		assert_eq!(
			render_block(&Scalar::String("a\nb\n".to_string()), false, &options),
			Rendered::Block {
				header: ">".to_string(),
				lines: vec!["a".to_string(), String::new(), "b".to_string()],
			}
		);
	}
}
