#[cfg(target_os = "windows")]
pub mod windows;

use std::fs::Metadata;

/// Whether the file still waits for an external archiver to copy it off-host.
#[cfg(target_os = "windows")]
pub fn needs_archiving(metadata: &Metadata) -> bool {
    windows::needs_archiving(metadata)
}

/// No archive marker exists here, so every file counts as already archived.
#[cfg(not(target_os = "windows"))]
pub fn needs_archiving(_metadata: &Metadata) -> bool {
    false
}
