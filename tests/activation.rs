//! Integration tests for daemon startup
//!
//! Runs the real binary under a fake service manager: descriptors are
//! passed with LISTEN_PID/LISTEN_FDS and readiness is read back from a
//! datagram socket bound as NOTIFY_SOCKET.

use std::io;
use std::os::unix::net::UnixDatagram;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use nix::fcntl::OFlag;

const BIN: &str = env!("CARGO_BIN_EXE_sysd-initctl");

/// Notification socket that cleans up after itself
struct NotifySocket {
    socket: UnixDatagram,
    path: PathBuf,
}

impl NotifySocket {
    fn bind(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "sysd-initctl-{}-{}.notify",
            std::process::id(),
            name
        ));
        let _ = std::fs::remove_file(&path);
        let socket = UnixDatagram::bind(&path).unwrap();
        socket.set_nonblocking(true).unwrap();
        Self { socket, path }
    }

    /// Next pending message, once the child has exited
    fn pending(&self) -> io::Result<String> {
        let mut buf = [0u8; 4096];
        let len = self.socket.recv(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf[..len]).to_string())
    }
}

impl Drop for NotifySocket {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Run the daemon through `sh -c script` with a clean activation environment
fn run_daemon(script: &str, notify: &NotifySocket, stdin: Stdio) -> ExitStatus {
    Command::new("sh")
        .arg("-c")
        .arg(script)
        .arg(BIN)
        .env_remove("LISTEN_PID")
        .env_remove("LISTEN_FDS")
        .env_remove("LISTEN_FDNAMES")
        .env("NOTIFY_SOCKET", &notify.path)
        .stdin(stdin)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .unwrap()
}

#[test]
fn test_no_descriptors_exits_without_ready() {
    let notify = NotifySocket::bind("none");
    let status = run_daemon(r#"exec "$0""#, &notify, Stdio::null());

    assert_eq!(status.code(), Some(66));
    let err = notify.pending().unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
}

#[test]
fn test_two_descriptors_exits_without_ready() {
    let notify = NotifySocket::bind("two");
    let status = run_daemon(
        r#"LISTEN_PID=$$ LISTEN_FDS=2 exec "$0" 3</dev/null 4</dev/null"#,
        &notify,
        Stdio::null(),
    );

    assert_eq!(status.code(), Some(66));
    let err = notify.pending().unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
}

#[test]
fn test_one_descriptor_notifies_ready() {
    let notify = NotifySocket::bind("one");
    let (read_end, write_end) = nix::unistd::pipe2(OFlag::O_CLOEXEC).unwrap();
    // Writer closes straight away, so the daemon sees end of file
    drop(write_end);

    let status = run_daemon(
        r#"LISTEN_PID=$$ LISTEN_FDS=1 exec "$0" --idle-timeout 5 3<&0"#,
        &notify,
        Stdio::from(read_end),
    );

    assert_eq!(status.code(), Some(0));
    let message = notify.pending().unwrap();
    assert!(message.lines().any(|l| l == "READY=1"), "{:?}", message);
}
