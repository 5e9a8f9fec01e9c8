//! Checked-in protobuf/gRPC code generated with buf from `proto/`.
//!
//! Regenerate after editing the proto files, then commit the output.

mod gen;

pub use gen::*;
