//! # cfn-convert CLI
//!
//! Converts CloudFormation templates between YAML and JSON, file by file,
//! writing each result next to its input.

use std::path::PathBuf;
use std::process::ExitCode;

use cfn_convert::{
	Conversion, EmitterOptions, FlowStyle, JsonOptions, LineBreak, ScalarStyle,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cfn-convert")]
#[command(author, version, about, long_about = None)]
struct Cli {
	/// Enable verbose logging
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Produce JSON templates
	Json {
		#[command(subcommand)]
		command: JsonCommands,
	},

	/// Produce YAML templates
	Yaml {
		#[command(subcommand)]
		command: YamlCommands,
	},
}

#[derive(Subcommand)]
enum JsonCommands {
	/// Convert YAML templates to JSON (`x.yaml` -> `x.json`)
	FromYaml {
		/// Spaces per indentation level
		#[arg(long, default_value_t = 2, env = "CFN_CONVERT_JSON_INDENT")]
		indent: usize,

		/// Write each document on one line
		#[arg(long)]
		compact: bool,

		#[arg(required = true)]
		files: Vec<PathBuf>,
	},
}

#[derive(Subcommand)]
enum YamlCommands {
	/// Convert JSON templates to YAML (`x.json` -> `x.yaml`)
	FromJson {
		/// Write `Fn::*` and `Ref` objects as short-form tags
		#[arg(long)]
		cfn: bool,

		#[command(flatten)]
		emitter: EmitterArgs,

		#[arg(required = true)]
		files: Vec<PathBuf>,
	},
}

#[derive(Args)]
struct EmitterArgs {
	/// Spaces per indentation level (2-9)
	#[arg(long, default_value_t = 2, env = "CFN_CONVERT_YAML_INDENT")]
	indent: usize,

	/// Spaces before a `-` under a mapping key
	#[arg(long, default_value_t = 0, env = "CFN_CONVERT_YAML_INDICATOR_INDENT")]
	indicator_indent: usize,

	/// Preferred line width; negative or absent means unlimited
	#[arg(long, allow_negative_numbers = true, env = "CFN_CONVERT_YAML_WIDTH")]
	width: Option<i64>,

	/// Never break long flow collections
	#[arg(long)]
	no_split_lines: bool,

	#[arg(long, value_enum, default_value_t = FlowStyleArg::Block, env = "CFN_CONVERT_YAML_FLOW_STYLE")]
	flow_style: FlowStyleArg,

	#[arg(long, value_enum, default_value_t = ScalarStyleArg::Plain, env = "CFN_CONVERT_YAML_SCALAR_STYLE")]
	scalar_style: ScalarStyleArg,

	#[arg(long, value_enum, default_value_t = LineBreakArg::Unix, env = "CFN_CONVERT_YAML_LINE_BREAK")]
	line_break: LineBreakArg,

	/// Escape non-ASCII characters
	#[arg(long)]
	disallow_unicode: bool,

	/// Start each document with `---`
	#[arg(long)]
	explicit_start: bool,

	/// End each document with `...`
	#[arg(long)]
	explicit_end: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum FlowStyleArg {
	Auto,
	Flow,
	Block,
}

#[derive(Copy, Clone, ValueEnum)]
enum ScalarStyleArg {
	Plain,
	SingleQuoted,
	DoubleQuoted,
	Literal,
	Folded,
}

#[derive(Copy, Clone, ValueEnum)]
enum LineBreakArg {
	Unix,
	Windows,
	Mac,
}

impl From<FlowStyleArg> for FlowStyle {
	fn from(arg: FlowStyleArg) -> Self {
		match arg {
			FlowStyleArg::Auto => FlowStyle::Auto,
			FlowStyleArg::Flow => FlowStyle::Flow,
			FlowStyleArg::Block => FlowStyle::Block,
		}
	}
}

impl From<ScalarStyleArg> for ScalarStyle {
	fn from(arg: ScalarStyleArg) -> Self {
		match arg {
			ScalarStyleArg::Plain => ScalarStyle::Plain,
			ScalarStyleArg::SingleQuoted => ScalarStyle::SingleQuoted,
			ScalarStyleArg::DoubleQuoted => ScalarStyle::DoubleQuoted,
			ScalarStyleArg::Literal => ScalarStyle::Literal,
			ScalarStyleArg::Folded => ScalarStyle::Folded,
		}
	}
}

impl From<LineBreakArg> for LineBreak {
	fn from(arg: LineBreakArg) -> Self {
		match arg {
			LineBreakArg::Unix => LineBreak::Unix,
			LineBreakArg::Windows => LineBreak::Windows,
			LineBreakArg::Mac => LineBreak::Mac,
		}
	}
}

impl From<EmitterArgs> for EmitterOptions {
	fn from(args: EmitterArgs) -> Self {
		Self {
			indent: args.indent,
			indicator_indent: args.indicator_indent,
			width: args
				.width
				.and_then(|width| usize::try_from(width).ok()),
			split_lines: !args.no_split_lines,
			flow_style: args.flow_style.into(),
			scalar_style: args.scalar_style.into(),
			line_break: args.line_break.into(),
			allow_unicode: !args.disallow_unicode,
			explicit_start: args.explicit_start,
			explicit_end: args.explicit_end,
		}
	}
}

/// `RUST_LOG` as given, `info` when unset or invalid; `--verbose` adds debug
fn log_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
	let filter = rust_log
		.filter(|directives| !directives.trim().is_empty())
		.and_then(|directives| EnvFilter::try_new(directives).ok())
		.unwrap_or_else(|| EnvFilter::new("info"));

	if verbose {
		filter.add_directive(tracing::Level::DEBUG.into())
	} else {
		filter
	}
}

fn main() -> ExitCode {
	let cli = Cli::parse();

	// Initialize tracing
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref(), cli.verbose))
		.init();

	let (conversion, files) = match cli.command {
		Commands::Json {
			command:
				JsonCommands::FromYaml {
					indent,
					compact,
					files,
				},
		} => {
			let options = JsonOptions {
				indent: (!compact).then_some(indent),
			};
			(Conversion::YamlToJson(options), files)
		}
		Commands::Yaml {
			command: YamlCommands::FromJson {
				cfn,
				emitter,
				files,
			},
		} => {
			let conversion = Conversion::JsonToYaml {
				intrinsics: cfn,
				options: emitter.into(),
			};
			(conversion, files)
		}
	};

	let results = conversion.convert_all(&files);
	let failed = results.iter().filter(|result| result.is_err()).count();

	if failed > 0 {
		tracing::warn!(failed, total = results.len(), "some files were not converted");
		ExitCode::FAILURE
	} else {
		tracing::info!(total = results.len(), "done");
		ExitCode::SUCCESS
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tracing_subscriber::filter::LevelFilter;

	#[test]
	fn rust_log_level_is_kept() {
		assert_eq!(log_filter(Some("warn"), false).max_level_hint(), Some(LevelFilter::WARN));
		assert_eq!(log_filter(Some("error"), false).max_level_hint(), Some(LevelFilter::ERROR));
	}

	#[test]
	fn info_when_rust_log_is_unset_or_empty() {
		assert_eq!(log_filter(None, false).max_level_hint(), Some(LevelFilter::INFO));
		assert_eq!(log_filter(Some(""), false).max_level_hint(), Some(LevelFilter::INFO));
	}

	#[test]
	fn verbose_raises_to_debug() {
		assert_eq!(log_filter(None, true).max_level_hint(), Some(LevelFilter::DEBUG));
		assert_eq!(log_filter(Some("warn"), true).max_level_hint(), Some(LevelFilter::DEBUG));
	}

	#[test]
	fn emitter_flags_map_onto_options() {
		let cli = Cli::parse_from([
			"cfn-convert",
			"yaml",
			"from-json",
			"--width",
			"-1",
			"--flow-style",
			"auto",
			"stack.json",
		]);
		let Commands::Yaml {
			command: YamlCommands::FromJson { emitter, .. },
		} = cli.command
		else {
			panic!("expected yaml from-json");
		};
		let options = EmitterOptions::from(emitter);
		assert_eq!(options.width, None);
		assert_eq!(options.flow_style, FlowStyle::Auto);
	}
}
