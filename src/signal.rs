//! Ctrl-C handling for apply runs
//!
//! The first SIGINT cancels the run so no new resource is dispatched and
//! in-flight ones finish. The handler restores the default disposition, so
//! a second Ctrl-C terminates the process.

use anyhow::Result;
use reconcile::CancelToken;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[cfg(unix)]
extern "C" fn on_sigint(_signum: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
    #[allow(unsafe_code)]
    unsafe {
        libc::signal(libc::SIGINT, libc::SIG_DFL);
    }
}

/// Cancel `token` when the user presses Ctrl-C
#[cfg(unix)]
pub fn cancel_on_interrupt(token: CancelToken) -> Result<()> {
    let handler = on_sigint as extern "C" fn(libc::c_int);

    #[allow(unsafe_code)]
    let previous = unsafe { libc::signal(libc::SIGINT, handler as libc::sighandler_t) };
    if previous == libc::SIG_ERR {
        anyhow::bail!("Failed to install SIGINT handler");
    }

    thread::Builder::new()
        .name("sysman-sigint".into())
        .spawn(move || watch(&token))?;
    Ok(())
}

#[cfg(not(unix))]
pub fn cancel_on_interrupt(_token: CancelToken) -> Result<()> {
    Ok(())
}

fn watch(token: &CancelToken) {
    loop {
        if INTERRUPTED.load(Ordering::SeqCst) {
            log::warn!("interrupted, waiting for in-flight resources (Ctrl-C again to abort)");
            token.cancel();
            return;
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_cancels_token() {
        let token = CancelToken::new();
        INTERRUPTED.store(true, Ordering::SeqCst);
        watch(&token);
        INTERRUPTED.store(false, Ordering::SeqCst);
        assert!(token.is_cancelled());
    }
}
