//! Running a mixer utility and collecting its stdout.

use tokio::process::Command;

use super::VolumeError;

/// Run `program` with `args`, returning stdout on success.
///
/// A non-zero exit is turned into [`VolumeError::CommandFailed`] carrying the
/// trimmed stderr.
pub(crate) async fn run(program: &'static str, args: &[&str]) -> Result<String, VolumeError> {
    log::debug!("volume: {program} {}", args.join(" "));

    let output = Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| VolumeError::Spawn { program, source })?;

    if !output.status.success() {
        return Err(VolumeError::CommandFailed {
            program,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
