use std::{fs, path::Path};

/// Reads the preload script and prepares it for `initialization_script`.
///
/// With `isolate` set the body runs inside its own strict-mode function scope,
/// so top-level declarations never become properties of the page's `window`.
pub(crate) fn read_preload_script(path: &Path, isolate: bool) -> Result<String, String> {
    let source = fs::read_to_string(path).map_err(|error| {
        format!(
            "Failed to read preload script {}: {}",
            path.display(),
            error
        )
    })?;

    if source.trim().is_empty() {
        return Err(format!("Preload script {} is empty.", path.display()));
    }

    Ok(if isolate {
        isolate_script(&source)
    } else {
        source
    })
}

fn isolate_script(source: &str) -> String {
    format!("(function () {{\n'use strict';\n{source}\n}})();\n")
}
