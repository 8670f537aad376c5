//! Generates the `sclc.v1` protobuf types and the descriptor set used for gRPC reflection.
//!
//! Every message derives serde and `utoipa::ToSchema` so that the REST API can accept and return
//! the same types. `#[serde(default)]` lets JSON bodies omit fields, matching protobuf semantics.

use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let proto = root.join("sclc.proto");
    let descriptor = PathBuf::from(std::env::var("OUT_DIR")?).join("proto_descriptor.bin");

    println!("cargo:rerun-if-changed={}", proto.display());

    tonic_build::configure()
        .build_server(true)
        .build_client(false)
        .type_attribute(
            ".",
            "#[derive(serde::Serialize, serde::Deserialize, utoipa::ToSchema)]",
        )
        .type_attribute(".", "#[serde(default)]")
        .file_descriptor_set_path(descriptor)
        .compile_protos(&[proto], &[root])?;

    Ok(())
}
