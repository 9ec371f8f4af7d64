// tests/fixtures.rs
use std::path::Path;

use cfn_convert::{EmitterOptions, JsonOptions, Value};

fn expect_text(path: &Path, actual: &str) -> datatest_stable::Result<()> {
	let expected = std::fs::read_to_string(path)?;
	if actual == expected {
		Ok(())
	} else {
		Err(format!(
			"Output differs from {}\n--- expected\n{expected}\n--- actual\n{actual}",
			path.display()
		)
		.into())
	}
}

/// `x.yaml` converts to exactly `x.json`
fn test_yaml_to_json(path: &Path) -> datatest_stable::Result<()> {
	let content = std::fs::read_to_string(path)?;
	let value = Value::from_yaml(&content)?;
	let json = value.to_json_string(&JsonOptions::default())?;
	expect_text(&path.with_extension("json"), &json)?;

	// Long-form JSON reads back to the same model
	let reloaded = Value::from_json(&json, true)?;
	if reloaded != value {
		return Err(format!("JSON output of {} does not reload", path.display()).into());
	}
	Ok(())
}

/// `x.json` converts to exactly `x.yaml`, using short-form tags
fn test_json_to_yaml(path: &Path) -> datatest_stable::Result<()> {
	let content = std::fs::read_to_string(path)?;
	let value = Value::from_json(&content, true)?;
	let yaml = value.to_yaml_string(&EmitterOptions::block());
	expect_text(&path.with_extension("yaml"), &yaml)?;

	let reloaded = Value::from_yaml(&yaml)?;
	if reloaded != value {
		return Err(format!("YAML output of {} does not reload", path.display()).into());
	}
	Ok(())
}

fn test_bad_template(path: &Path) -> datatest_stable::Result<()> {
	let content = std::fs::read_to_string(path)?;
	let result = match path.extension().and_then(|ext| ext.to_str()) {
		Some("json") => Value::from_json(&content, true),
		_ => Value::from_yaml(&content),
	};
	match result {
		Err(_) => Ok(()), // Decode error = expected
		Ok(value) => Err(format!("Expected a decode error but got {value:?}").into()),
	}
}

datatest_stable::harness! {
	{ test = test_yaml_to_json, root = "tests/fixtures/yaml", pattern = r"\.yaml$" },
	{ test = test_json_to_yaml, root = "tests/fixtures/json", pattern = r"\.json$" },
	{ test = test_bad_template, root = "tests/fixtures/bad", pattern = r"\.yaml$|\.json$" },
}
