use std::fs;
use std::path::PathBuf;

use crate::EngineResult;

/// Returns the Winddown data directory, creating it if needed.
///
/// On Windows: `%LOCALAPPDATA%\winddown`; elsewhere the platform's
/// local data directory.
pub fn data_dir() -> EngineResult<PathBuf> {
    let base = dirs::data_local_dir().ok_or("could not determine local data directory")?;
    let dir = base.join("winddown");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Returns the path to the PID file.
pub fn pid_path() -> EngineResult<PathBuf> {
    Ok(data_dir()?.join("winddown.pid"))
}

/// Writes the current process's PID to the PID file.
///
/// Called when the daemon starts. The PID file lets the CLI detect a
/// running daemon even when the pipe check fails, and forcibly kill a
/// stuck daemon process.
pub fn write_pid_file() -> EngineResult<()> {
    let path = pid_path()?;
    fs::write(&path, std::process::id().to_string())?;
    Ok(())
}

/// Reads the PID from the PID file, if it exists.
pub fn read_pid_file() -> EngineResult<Option<u32>> {
    let path = pid_path()?;

    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)?;
    let pid: u32 = contents
        .trim()
        .parse()
        .map_err(|e| format!("invalid PID file contents: {e}"))?;

    Ok(Some(pid))
}

/// Removes the PID file. Called on clean daemon shutdown.
pub fn remove_pid_file() -> EngineResult<()> {
    let path = pid_path()?;

    if path.exists() {
        fs::remove_file(&path)?;
    }

    Ok(())
}
