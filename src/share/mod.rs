//! Share dispatch
//!
//! Hands a finished export archive to the platform's generic file-share
//! mechanism. On desktop platforms that is the default open/send handler;
//! the archive's declared content type is `application/zip`.

use std::path::Path;
use std::process::Command;

use crate::error::{LedgerError, LedgerResult};

/// MIME type declared for export archives
pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip";

/// Hand the archive to the platform share mechanism.
///
/// Failure to dispatch is reported to the caller; it does not invalidate
/// the archive, which remains on disk.
pub fn share_archive(archive: &Path) -> LedgerResult<()> {
    if !archive.exists() {
        return Err(LedgerError::Share(format!(
            "Archive not found: {}",
            archive.display()
        )));
    }

    let status = dispatch_command(archive)
        .status()
        .map_err(|e| LedgerError::Share(format!("Failed to launch share handler: {}", e)))?;

    if !status.success() {
        return Err(LedgerError::Share(format!(
            "Share handler exited with status {}",
            status
        )));
    }

    Ok(())
}

#[cfg(all(unix, not(target_os = "macos")))]
fn dispatch_command(archive: &Path) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(archive);
    cmd
}

#[cfg(target_os = "macos")]
fn dispatch_command(archive: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(archive);
    cmd
}

#[cfg(target_os = "windows")]
fn dispatch_command(archive: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(archive);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_archive_is_reported() {
        let err = share_archive(Path::new("/nonexistent/export.zip")).unwrap_err();
        assert!(matches!(err, LedgerError::Share(_)));
        assert!(err.to_string().contains("/nonexistent/export.zip"));
    }
}
