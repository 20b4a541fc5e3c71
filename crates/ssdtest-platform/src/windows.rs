//! Windows platform implementation
//!
//! Uses `GetDiskFreeSpaceExW`, which accepts any directory on the volume.

use crate::{DiskStats, PlatformError, PlatformOps, Result};
use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;
use windows_sys::Win32::Storage::FileSystem::GetDiskFreeSpaceExW;

/// Windows platform implementation
pub struct WindowsPlatform;

impl PlatformOps for WindowsPlatform {
    fn disk_stats(path: &Path) -> Result<DiskStats> {
        let wide = to_wide(path.as_os_str())
            .ok_or_else(|| PlatformError::InvalidPath(path.display().to_string()))?;

        let mut available_to_caller: u64 = 0;
        let mut total: u64 = 0;
        let mut total_free: u64 = 0;

        // SAFETY: wide is a NUL-terminated UTF-16 buffer that outlives the
        // call, and the three out-pointers reference live u64 locals.
        #[allow(unsafe_code)]
        let ok = unsafe {
            GetDiskFreeSpaceExW(
                wide.as_ptr(),
                &mut available_to_caller,
                &mut total,
                &mut total_free,
            )
        };

        if ok == 0 {
            return Err(PlatformError::Io(std::io::Error::last_os_error()));
        }

        Ok(DiskStats {
            total_bytes: total,
            available_bytes: available_to_caller,
        })
    }
}

/// Encode as NUL-terminated UTF-16, rejecting interior NULs
fn to_wide(s: &OsStr) -> Option<Vec<u16>> {
    let mut wide: Vec<u16> = s.encode_wide().collect();
    if wide.contains(&0) {
        return None;
    }
    wide.push(0);
    Some(wide)
}
