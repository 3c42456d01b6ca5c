//! Output path resolution and the final document write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use gradiomd_shared::{GradioMdError, Result};

/// Resolve the user's output argument against `cwd`.
///
/// No argument (or an empty one) means `cwd/{default_filename}`. An existing
/// directory, a path ending in a separator, or a path whose last component has
/// no extension is treated as a directory and gets `default_filename` appended.
/// Anything else is the file path itself.
pub fn resolve_output_path(
    input: Option<&str>,
    cwd: &Path,
    default_filename: &str,
) -> Result<PathBuf> {
    let raw = match input {
        Some(raw) if !raw.is_empty() => raw.trim(),
        _ => return Ok(cwd.join(default_filename)),
    };

    let resolved = cwd.join(raw);

    match std::fs::metadata(&resolved) {
        Ok(meta) if meta.is_dir() => return Ok(resolved.join(default_filename)),
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(GradioMdError::io(&resolved, e)),
    }

    if raw.ends_with(['/', '\\']) {
        return Ok(resolved.join(default_filename));
    }

    if resolved.extension().is_none() {
        return Ok(resolved.join(default_filename));
    }

    Ok(resolved)
}

/// Write `content` to `path`, creating parent directories as needed.
///
/// The text goes to a sibling temp file first and is then renamed into place,
/// so an interrupted run never leaves a half-written document behind.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| GradioMdError::usage(format!("{} is not a file path", path.display())))?;
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    if !parent.as_os_str().is_empty() {
        std::fs::create_dir_all(parent).map_err(|e| GradioMdError::io(parent, e))?;
    }

    let temp = parent.join(format!(".{file_name}.tmp"));
    std::fs::write(&temp, content).map_err(|e| GradioMdError::io(&temp, e))?;

    if let Err(e) = std::fs::rename(&temp, path) {
        let _ = std::fs::remove_file(&temp);
        return Err(GradioMdError::io(path, e));
    }

    debug!(path = %path.display(), bytes = content.len(), "wrote output");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
