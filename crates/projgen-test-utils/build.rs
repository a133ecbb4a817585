use projgen_codegen::{emit, CodeGen, CodeGenConfig};
use std::path::PathBuf;

const SCHEMA: &str = "schema/fixture.graphql";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed={}", SCHEMA);
    println!("cargo:rerun-if-changed=build.rs");

    let schema = std::fs::read_to_string(SCHEMA)?;
    let config = CodeGenConfig::default();
    let result = CodeGen::from_schemas(config.clone(), &[schema]).generate();
    let source = emit::render_single_file(&result, &config)?;

    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);
    std::fs::write(out_dir.join("projections.rs"), source)?;
    Ok(())
}
