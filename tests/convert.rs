use std::fs;

use cfn_convert::{Conversion, ConvertError, EmitterOptions, JsonOptions};
use tempfile::tempdir;

#[test]
fn converts_every_file_next_to_its_input() {
	let dir = tempdir().unwrap();
	let first = dir.path().join("first.yaml");
	let second = dir.path().join("second.yml");
	fs::write(&first, "Value: !Ref Bucket\n").unwrap();
	fs::write(&second, "Items: [1, 2]\n").unwrap();

	let conversion = Conversion::YamlToJson(JsonOptions { indent: None });
	let results = conversion.convert_all(&[first.clone(), second.clone()]);

	assert_eq!(results.len(), 2);
	assert_eq!(results[0].as_ref().unwrap(), &dir.path().join("first.json"));
	assert_eq!(results[1].as_ref().unwrap(), &dir.path().join("second.json"));
	assert_eq!(
		fs::read_to_string(dir.path().join("first.json")).unwrap(),
		r#"{"Value":{"Ref":"Bucket"}}"#
	);
	assert_eq!(
		fs::read_to_string(dir.path().join("second.json")).unwrap(),
		r#"{"Items":[1,2]}"#
	);
}

#[test]
fn a_failed_file_writes_nothing_and_others_still_convert() {
	let dir = tempdir().unwrap();
	let bad = dir.path().join("bad.yaml");
	let good = dir.path().join("good.yaml");
	let missing = dir.path().join("missing.yaml");
	fs::write(&bad, "Cidr: !Cidr [10.0.0.0/16]\n").unwrap();
	fs::write(&good, "Name: ok\n").unwrap();

	let conversion = Conversion::YamlToJson(JsonOptions::default());
	let results = conversion.convert_all(&[bad, good, missing]);

	assert!(matches!(results[0], Err(ConvertError::Decode { .. })));
	assert!(results[1].is_ok());
	assert!(matches!(results[2], Err(ConvertError::Io { .. })));

	assert!(!dir.path().join("bad.json").exists());
	assert!(!dir.path().join("missing.json").exists());
	assert_eq!(
		fs::read_to_string(dir.path().join("good.json")).unwrap(),
		"{\n  \"Name\": \"ok\"\n}\n"
	);

	// Only the converted output and the inputs remain; no stray temp files
	let mut names: Vec<_> = fs::read_dir(dir.path())
		.unwrap()
		.map(|entry| entry.unwrap().file_name().into_string().unwrap())
		.collect();
	names.sort();
	assert_eq!(names, ["bad.yaml", "good.json", "good.yaml"]);
}

#[test]
fn json_to_yaml_writes_short_tags_when_asked() {
	let dir = tempdir().unwrap();
	let input = dir.path().join("stack.json");
	fs::write(&input, r#"{"Bucket": {"Ref": "Name"}}"#).unwrap();

	let with_tags = Conversion::JsonToYaml {
		intrinsics: true,
		options: EmitterOptions::block(),
	};
	let output = with_tags.convert_file(&input).unwrap();
	assert_eq!(output, dir.path().join("stack.yaml"));
	assert_eq!(fs::read_to_string(&output).unwrap(), "Bucket: !Ref 'Name'\n");

	let plain = Conversion::JsonToYaml {
		intrinsics: false,
		options: EmitterOptions::block(),
	};
	plain.convert_file(&input).unwrap();
	assert_eq!(
		fs::read_to_string(&output).unwrap(),
		"Bucket:\n  Ref: Name\n"
	);
}
