//! Batch conversion of template files between markup and JSON

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tempfile::NamedTempFile;

use crate::cfn_ir::json_out::JsonOptions;
use crate::cfn_ir::types::Value;
use crate::emitter::EmitterOptions;
use crate::error::ConvertError;

/// What to do with each input file
#[derive(Debug, Clone)]
pub enum Conversion {
	/// Read markup (short or long intrinsic forms), write long-form JSON
	YamlToJson(JsonOptions),
	/// Read JSON, write markup. With `intrinsics` set, long-form keys come
	/// out as short tags; otherwise the JSON is treated as plain data.
	JsonToYaml {
		intrinsics: bool,
		options: EmitterOptions,
	},
}

impl Conversion {
	/// Extension of the sibling file written for each input
	pub fn output_extension(&self) -> &'static str {
		match self {
			Conversion::YamlToJson(_) => "json",
			Conversion::JsonToYaml { .. } => "yaml",
		}
	}

	/// Convert one file, writing its sibling output. Nothing is written
	/// unless the whole document converted.
	pub fn convert_file(&self, input: &Path) -> Result<PathBuf, ConvertError> {
		let text = fs::read_to_string(input).map_err(|source| ConvertError::Io {
			path: input.to_path_buf(),
			source,
		})?;
		let decode_failed = |source| ConvertError::Decode {
			path: input.to_path_buf(),
			source,
		};

		let output_text = match self {
			Conversion::YamlToJson(options) => Value::from_yaml(&text)
				.map_err(decode_failed)?
				.to_json_string(options)
				.map_err(|source| ConvertError::Serialize {
					path: input.to_path_buf(),
					source,
				})?,
			Conversion::JsonToYaml {
				intrinsics,
				options,
			} => Value::from_json(&text, *intrinsics)
				.map_err(decode_failed)?
				.to_yaml_string(options),
		};

		let output = input.with_extension(self.output_extension());
		write_atomically(&output, &output_text)?;

		tracing::debug!(input = %input.display(), output = %output.display(), "converted");
		Ok(output)
	}

	/// Convert every file in parallel. Results come back in input order; a
	/// failure is logged and does not stop the other files.
	pub fn convert_all(&self, files: &[PathBuf]) -> Vec<Result<PathBuf, ConvertError>> {
		files
			.par_iter()
			.map(|file| {
				let result = self.convert_file(file);
				if let Err(err) = &result {
					tracing::error!(file = %file.display(), "{err}");
				}
				result
			})
			.collect()
	}
}

/// Write through a temporary file in the target directory, then rename
fn write_atomically(path: &Path, contents: &str) -> Result<(), ConvertError> {
	let io_failed = |source| ConvertError::Io {
		path: path.to_path_buf(),
		source,
	};

	let dir = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};

	let mut file = NamedTempFile::new_in(dir).map_err(io_failed)?;
	file.write_all(contents.as_bytes()).map_err(io_failed)?;
	file.persist(path).map_err(|err| io_failed(err.error))?;
	Ok(())
}
