//! Unix platform implementation
//!
//! Uses `statvfs(3)`, available on Linux, macOS and the BSDs.

use crate::{DiskStats, PlatformError, PlatformOps, Result};
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// Unix platform implementation
pub struct UnixPlatform;

impl PlatformOps for UnixPlatform {
    fn disk_stats(path: &Path) -> Result<DiskStats> {
        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| PlatformError::InvalidPath(path.display().to_string()))?;

        // SAFETY: statvfs is plain old data; an all-zero value is valid and
        // is fully overwritten on success.
        #[allow(unsafe_code)]
        let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };

        // SAFETY: c_path is a valid NUL-terminated string that outlives the
        // call, and stat points to a properly sized, writable struct.
        #[allow(unsafe_code)]
        let rc = unsafe { libc::statvfs(c_path.as_ptr(), &mut stat) };
        if rc != 0 {
            return Err(PlatformError::Io(std::io::Error::last_os_error()));
        }

        Ok(stats_from_statvfs(&stat))
    }
}

/// Convert block counts to bytes. Field widths differ between platforms.
#[allow(clippy::unnecessary_cast)]
fn stats_from_statvfs(stat: &libc::statvfs) -> DiskStats {
    let fragment_size = stat.f_frsize as u64;
    DiskStats {
        total_bytes: (stat.f_blocks as u64).saturating_mul(fragment_size),
        available_bytes: (stat.f_bavail as u64).saturating_mul(fragment_size),
    }
}
