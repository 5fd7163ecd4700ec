use std::fs;
use std::process::Command;

use mcpgen_core::config::CompositionStrategy;
use mcpgen_core::ir::GenerationInput;
use mcpgen_core::{CodeGenerator, catalog, parse};
use mcpgen_fastmcp::{FastMcpConfig, FastMcpGenerator};

const PETSTORE: &str = include_str!("../../mcpgen-core/tests/fixtures/petstore.yaml");
const SECURED: &str = include_str!("../../mcpgen-core/tests/fixtures/secured.json");

fn compile_python(document: &str, strategy: CompositionStrategy) {
    let spec = parse::from_str(document).unwrap();
    let input = GenerationInput::new(&spec, catalog::derive(&spec).unwrap());
    let mut config = FastMcpConfig::default();
    config.composition.strategy = strategy;
    let files = FastMcpGenerator.generate(&input, &config).unwrap();

    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();

    let mut paths = Vec::new();
    for file in &files {
        let dest = dir.join(&file.path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&dest, &file.content).unwrap();
        paths.push(file.path.clone());
    }

    let compile = Command::new("python3")
        .arg("-m")
        .arg("py_compile")
        .args(&paths)
        .current_dir(dir)
        .output()
        .expect("failed to run python3");
    if !compile.status.success() {
        panic!(
            "py_compile failed:\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&compile.stdout),
            String::from_utf8_lossy(&compile.stderr),
        );
    }
}

#[test]
#[ignore] // Requires Python 3
fn generated_petstore_compiles() {
    compile_python(PETSTORE, CompositionStrategy::Mount);
}

#[test]
#[ignore] // Requires Python 3
fn generated_secured_import_compiles() {
    compile_python(SECURED, CompositionStrategy::Import);
}
