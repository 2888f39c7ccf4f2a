use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use log::warn;

/// Reports whether another process currently holds `path` open in a way that
/// would make overwriting it unsafe.
///
/// The probe attempts an exclusive read/write open and immediately drops the
/// handle; file contents are never touched. A missing file cannot be in use,
/// so it reports not-locked. Faults unrelated to lock contention also report
/// not-locked, since they must not block an install attempt, but they are
/// logged so callers get diagnostics.
pub fn is_file_locked<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    let mut options = OpenOptions::new();
    options.read(true).write(true);
    #[cfg(windows)]
    {
        use std::os::windows::fs::OpenOptionsExt;
        options.share_mode(0);
    }
    match options.open(path) {
        Ok(_) => false,
        Err(err) if err.kind() == io::ErrorKind::NotFound => false,
        Err(err) if is_lock_contention(&err) => true,
        Err(err) => {
            warn!("Lock probe failed for {}: {}", path.display(), err);
            false
        }
    }
}

/// Returns true as soon as any of the given paths probes as locked.
pub fn is_any_file_locked<I>(paths: I) -> bool
where
    I: IntoIterator,
    I::Item: AsRef<Path>,
{
    paths.into_iter().any(is_file_locked)
}

fn is_lock_contention(err: &io::Error) -> bool {
    if matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::ExecutableFileBusy
    ) {
        return true;
    }
    // ERROR_SHARING_VIOLATION / ERROR_LOCK_VIOLATION
    #[cfg(windows)]
    if matches!(err.raw_os_error(), Some(32) | Some(33)) {
        return true;
    }
    false
}
