// @generated
// This file wires up buf-generated protobuf code
// Note: The prost files already include!() the tonic files automatically

pub mod user {
    include!("user.v1.rs");
    // user.v1.tonic.rs is auto-included by user.v1.rs
}
