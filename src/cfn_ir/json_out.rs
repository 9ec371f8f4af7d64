use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Number, Value as Json};

use super::types::{Intrinsic, Mapping, Scalar, Value};

/// Layout for JSON text output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonOptions {
	/// Spaces per nesting level; `None` writes everything on one line
	pub indent: Option<usize>,
}

impl Default for JsonOptions {
	fn default() -> Self {
		Self { indent: Some(2) }
	}
}

impl Value {
	/// Encode using long-form keys (`{"Fn::Join": [...]}`)
	pub fn to_json(&self) -> Json {
		encode(self)
	}

	/// Encode and serialize. Pretty output ends with a newline.
	pub fn to_json_string(&self, options: &JsonOptions) -> Result<String, serde_json::Error> {
		let json = self.to_json();

		let Some(width) = options.indent else {
			return serde_json::to_string(&json);
		};

		let indent = " ".repeat(width);
		let mut buf = Vec::new();
		let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
		json.serialize(&mut ser)?;

		let mut text = String::from_utf8_lossy(&buf).into_owned();
		text.push('\n');
		Ok(text)
	}
}

/// Encode a value as JSON data. Non-finite floats have no JSON form and
/// become `null`.
pub fn encode(value: &Value) -> Json {
	match value {
		Value::Scalar(scalar) => encode_scalar(scalar),
		Value::Sequence(items) => Json::Array(items.iter().map(encode).collect()),
		Value::Mapping(map) => Json::Object(encode_mapping(map)),
		Value::Node(node) => encode_intrinsic(node),
	}
}

fn encode_scalar(scalar: &Scalar) -> Json {
	match scalar {
		Scalar::Null => Json::Null,
		Scalar::Bool(b) => Json::Bool(*b),
		Scalar::Int(i) => Json::Number((*i).into()),
		Scalar::Float(x) => Number::from_f64(*x).map_or(Json::Null, Json::Number),
		Scalar::String(s) => Json::String(s.clone()),
	}
}

fn encode_mapping(map: &Mapping) -> Map<String, Json> {
	map.iter()
		.map(|(key, value)| (key.clone(), encode(value)))
		.collect()
}

fn encode_intrinsic(node: &Intrinsic) -> Json {
	let body = match node {
		Intrinsic::Ref { reference } => Json::String(reference.clone()),
		Intrinsic::Condition { condition } => Json::String(condition.clone()),
		Intrinsic::GetAtt {
			resource,
			attribute,
		} => Json::Array(vec![
			Json::String(resource.clone()),
			Json::String(attribute.clone()),
		]),
		Intrinsic::GetAZs { region } => encode(region),
		Intrinsic::ImportValue { reference } => encode(reference),
		Intrinsic::Base64 { value } => encode(value),
		Intrinsic::Cidr {
			ip_block,
			count,
			cidr_bits,
		} => Json::Array(vec![
			encode(ip_block),
			Json::Number((*count).into()),
			Json::Number((*cidr_bits).into()),
		]),
		Intrinsic::FindInMap {
			map_name,
			top_level_key,
			second_level_key,
		} => Json::Array(vec![
			Json::String(map_name.clone()),
			encode(top_level_key),
			Json::String(second_level_key.clone()),
		]),
		Intrinsic::Join { delimiter, values } => Json::Array(vec![
			Json::String(delimiter.clone()),
			Json::Array(values.iter().map(encode).collect()),
		]),
		Intrinsic::Select { index, selection } => {
			Json::Array(vec![Json::Number((*index).into()), encode(selection)])
		}
		Intrinsic::Split { delimiter, source } => {
			Json::Array(vec![Json::String(delimiter.clone()), encode(source)])
		}
		Intrinsic::Sub {
			template,
			variables,
		} => {
			if variables.is_empty() {
				Json::String(template.clone())
			} else {
				Json::Array(vec![
					Json::String(template.clone()),
					Json::Object(encode_mapping(variables)),
				])
			}
		}
		Intrinsic::Transform { name, parameters } => {
			let mut body = Map::new();
			body.insert("Name".to_string(), Json::String(name.clone()));
			body.insert("Parameters".to_string(), Json::Object(encode_mapping(parameters)));
			Json::Object(body)
		}
		Intrinsic::Conditional { operands, .. } => {
			Json::Array(operands.iter().map(encode).collect())
		}
	};

	let mut object = Map::new();
	object.insert(node.kind().json_key().to_string(), body);
	Json::Object(object)
}
