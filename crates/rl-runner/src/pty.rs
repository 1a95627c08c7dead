//! Pseudo-terminal plumbing: spawning, reading, and signalling.

use std::io::Read;

use portable_pty::{Child, ChildKiller, CommandBuilder, MasterPty, PtySize, native_pty_system};
use rl_core::Command;

use crate::error::RunError;

/// Bytes requested per read from the pty master.
const READ_CHUNK: usize = 1024;

/// Default pty size before the UI reports its body area.
pub const DEFAULT_SIZE: PtySize = PtySize {
    rows: 24,
    cols: 80,
    pixel_width: 0,
    pixel_height: 0,
};

/// Builds a [`PtySize`] from a column/row count, clamped to at least 1x1.
pub fn pty_size(cols: u16, rows: u16) -> PtySize {
    PtySize {
        rows: rows.max(1),
        cols: cols.max(1),
        pixel_width: 0,
        pixel_height: 0,
    }
}

/// A freshly spawned child and the handles the supervisor keeps.
pub struct Spawned {
    /// Master side, kept for resizing.
    pub master: Box<dyn MasterPty + Send>,
    /// The child, handed to the reaper.
    pub child: Box<dyn Child + Send + Sync>,
    /// Output stream of the master.
    pub reader: Box<dyn Read + Send>,
}

/// Opens a pty and starts `command` on its slave side.
///
/// The child runs in the current working directory and gets
/// `TERM=xterm-256color` when `TERM` is unset.
pub fn spawn(command: &Command, size: PtySize) -> Result<Spawned, RunError> {
    let pair = native_pty_system().openpty(size).map_err(RunError::pty)?;

    let mut builder = CommandBuilder::new(command.program());
    builder.args(command.args());
    builder.cwd(std::env::current_dir()?);
    if std::env::var_os("TERM").is_none() {
        builder.env("TERM", "xterm-256color");
    }

    let child = pair
        .slave
        .spawn_command(builder)
        .map_err(|source| RunError::Spawn {
            command: command.to_string(),
            source,
        })?;
    drop(pair.slave);

    let reader = pair.master.try_clone_reader().map_err(RunError::pty)?;

    Ok(Spawned {
        master: pair.master,
        child,
        reader,
    })
}

/// Decodes `bytes` appended to `carry`, leaving an incomplete trailing
/// UTF-8 sequence in `carry` for the next read.
///
/// Invalid sequences become U+FFFD.
pub fn decode_chunk(carry: &mut Vec<u8>, bytes: &[u8]) -> String {
    carry.extend_from_slice(bytes);

    let mut out = String::with_capacity(carry.len());
    let mut rest: &[u8] = &carry[..];
    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                out.push_str(valid);
                rest = &[];
                break;
            }
            Err(err) => {
                let (valid, after) = rest.split_at(err.valid_up_to());
                out.push_str(&String::from_utf8_lossy(valid));
                match err.error_len() {
                    Some(len) => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        rest = after.get(len..).unwrap_or_default();
                    }
                    None => {
                        rest = after;
                        break;
                    }
                }
            }
        }
    }

    let pending = rest.to_vec();
    *carry = pending;
    out
}

/// Hands pty output to `forward` until end of stream.
///
/// Runs on a blocking thread. Chunks are passed in read order; a read error
/// counts as end of stream (Linux reports `EIO` once the child exits).
/// Returns early once `forward` declines a chunk.
pub fn read_loop<F>(mut reader: Box<dyn Read + Send>, mut forward: F)
where
    F: FnMut(String) -> bool,
{
    let mut buf = [0u8; READ_CHUNK];
    let mut carry = Vec::new();

    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                let text = decode_chunk(&mut carry, buf.get(..n).unwrap_or_default());
                if !text.is_empty() && !forward(text) {
                    tracing::debug!("pty output no longer wanted");
                    return;
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
            Err(err) => {
                tracing::debug!(error = %err, "pty read ended");
                break;
            }
        }
    }

    if !carry.is_empty() {
        forward(String::from_utf8_lossy(&carry).into_owned());
    }
}

/// Sends SIGTERM to the child's process group.
///
/// The child leads its own session, so its pid is also its group id. A
/// group that already exited is not an error.
#[cfg(unix)]
pub fn terminate(pid: Option<u32>, killer: &mut dyn ChildKiller) -> Result<(), RunError> {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Some(pid) = pid else {
        return killer.kill().map_err(RunError::Io);
    };
    let raw = i32::try_from(pid).map_err(|err| RunError::Signal {
        pid,
        reason: err.to_string(),
    })?;

    match killpg(Pid::from_raw(raw), Signal::SIGTERM) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(errno) => Err(RunError::Signal {
            pid,
            reason: errno.desc().to_owned(),
        }),
    }
}

/// Asks the child to terminate.
#[cfg(not(unix))]
pub fn terminate(_pid: Option<u32>, killer: &mut dyn ChildKiller) -> Result<(), RunError> {
    killer.kill().map_err(RunError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_ascii() {
        let mut carry = Vec::new();
        assert_eq!(decode_chunk(&mut carry, b"hello\n"), "hello\n");
        assert!(carry.is_empty());
    }

    #[test]
    fn test_decode_split_multibyte() {
        let bytes = "héllo".as_bytes();
        // 'é' is two bytes; split between them.
        let (first, second) = bytes.split_at(2);

        let mut carry = Vec::new();
        assert_eq!(decode_chunk(&mut carry, first), "h");
        assert_eq!(carry.len(), 1);
        assert_eq!(decode_chunk(&mut carry, second), "éllo");
        assert!(carry.is_empty());
    }

    #[test]
    fn test_decode_invalid_bytes_are_replaced() {
        let mut carry = Vec::new();
        assert_eq!(decode_chunk(&mut carry, b"a\xffb"), "a\u{FFFD}b");
        assert!(carry.is_empty());
    }

    #[test]
    fn test_pty_size_clamps() {
        let size = pty_size(0, 0);
        assert_eq!((size.cols, size.rows), (1, 1));
    }

    #[test]
    fn test_read_loop_forwards_in_order() {
        let reader: Box<dyn Read + Send> = Box::new(std::io::Cursor::new(b"one\ntwo\n".to_vec()));

        let mut collected = String::new();
        read_loop(reader, |chunk| {
            collected.push_str(&chunk);
            true
        });
        assert_eq!(collected, "one\ntwo\n");
    }

    #[test]
    fn test_read_loop_stops_when_declined() {
        let reader: Box<dyn Read + Send> =
            Box::new(std::io::Cursor::new(vec![b'x'; READ_CHUNK * 3]));

        let mut calls = 0;
        read_loop(reader, |_| {
            calls += 1;
            false
        });
        assert_eq!(calls, 1);
    }
}
