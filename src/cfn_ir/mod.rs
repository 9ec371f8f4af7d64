//! CloudFormation intermediate representation
//!
//! `types` holds the value model. `parser` decodes any node tree that
//! implements `CfnParser`; `yaml`, `json` and `markup` are the adapters.
//! `markup` and `json_out` encode back out.

pub mod json;
pub mod json_out;
pub mod markup;
pub mod parser;
pub mod types;
pub mod yaml;
