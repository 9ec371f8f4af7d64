//! Convert CloudFormation templates between YAML and JSON while keeping
//! intrinsic functions (`!Ref`, `Fn::Join`, ...) intact.

pub mod cfn_ir;
pub mod convert;
pub mod emitter;
pub mod error;
pub mod intrinsics;

pub use cfn_ir::json_out::JsonOptions;
pub use cfn_ir::types::{ConditionalOp, Intrinsic, Mapping, Scalar, Value};
pub use convert::Conversion;
pub use emitter::{EmitterOptions, FlowStyle, LineBreak, MarkupNode, ScalarStyle};
pub use error::{CodecError, ConvertError, DecodeError, Location};
