//! Terminal byte source for unix, on termios via libc.
//!
//! Reads go straight to the file descriptor with no userspace buffer, so
//! `FIONREAD` sees every byte that has not been consumed yet.

use std::io;
use std::os::fd::RawFd;

use log::debug;

use super::ByteSource;

/// Standard input as a [`ByteSource`].
pub struct TtySource {
    fd: RawFd,
}

impl TtySource {
    /// Wrap stdin. Fails if stdin is not a terminal.
    pub fn stdin() -> io::Result<Self> {
        Self::from_fd(libc::STDIN_FILENO)
    }

    /// Wrap a terminal descriptor. The caller keeps ownership of `fd`.
    pub fn from_fd(fd: RawFd) -> io::Result<Self> {
        // SAFETY: isatty only inspects the descriptor.
        if unsafe { libc::isatty(fd) } != 1 {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "not a terminal",
            ));
        }
        Ok(TtySource { fd })
    }
}

/// Holds the saved terminal settings and puts them back on drop.
pub struct RawModeGuard {
    fd: RawFd,
    saved: libc::termios,
}

impl RawModeGuard {
    fn new(fd: RawFd) -> io::Result<Self> {
        let saved = get_attr(fd)?;
        let mut raw = saved;
        // ISIG off: Ctrl-C arrives as a byte instead of killing the
        // process with the terminal still raw.
        raw.c_lflag &= !(libc::ICANON | libc::ECHO | libc::ISIG);
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;
        set_attr(fd, &raw)?;
        Ok(RawModeGuard { fd, saved })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = set_attr(self.fd, &self.saved) {
            debug!("restoring terminal mode failed: {e}");
        }
    }
}

impl ByteSource for TtySource {
    type RawGuard = RawModeGuard;

    fn enter_raw_mode(&mut self) -> io::Result<RawModeGuard> {
        RawModeGuard::new(self.fd)
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        let mut byte = 0u8;
        loop {
            // SAFETY: reading at most one byte into a live stack slot.
            let n = unsafe { libc::read(self.fd, (&mut byte as *mut u8).cast(), 1) };
            match n {
                1 => return Ok(byte),
                0 => return Err(io::ErrorKind::UnexpectedEof.into()),
                _ => {
                    let err = io::Error::last_os_error();
                    match err.raw_os_error() {
                        Some(libc::EINTR) => continue,
                        // A hung-up terminal reads as EIO.
                        Some(libc::EIO) => return Err(io::ErrorKind::UnexpectedEof.into()),
                        _ => return Err(err),
                    }
                }
            }
        }
    }

    fn has_pending(&mut self) -> io::Result<bool> {
        let mut available: libc::c_int = 0;
        // SAFETY: FIONREAD writes one c_int into `available`.
        let rc = unsafe { libc::ioctl(self.fd, libc::FIONREAD, &mut available as *mut libc::c_int) };
        if rc == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(available > 0)
    }
}

fn get_attr(fd: RawFd) -> io::Result<libc::termios> {
    // SAFETY: termios is plain data; tcgetattr fills it completely on success.
    let mut term: libc::termios = unsafe { std::mem::zeroed() };
    if unsafe { libc::tcgetattr(fd, &mut term) } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(term)
}

fn set_attr(fd: RawFd, term: &libc::termios) -> io::Result<()> {
    // SAFETY: `term` points to a fully initialized termios.
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, term) } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
