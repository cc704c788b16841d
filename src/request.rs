//! Legacy init request record
//!
//! Layout of `struct init_request` from sysvinit's `initreq.h`, as written
//! into /dev/initctl by `telinit`, `shutdown` and friends:
//!
//! ```text
//! offset  size  field
//!      0     4  magic      (0x03091969)
//!      4     4  cmd
//!      8     4  runlevel
//!     12     4  sleeptime
//!     16   368  union { bsd fields, data }
//! ```
//!
//! All integers are in host byte order.

use std::fmt;

/// Magic number carried by every valid request
pub const INIT_MAGIC: i32 = 0x0309_1969;

/// Size of the whole record on the wire
pub const REQUEST_SIZE: usize = 384;

const PAYLOAD_OFFSET: usize = 16;

/// Command codes understood by sysvinit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    /// Change runlevel, the only command acted upon
    Runlevel,
    PowerFail,
    PowerFailNow,
    PowerOk,
    Bsd,
    SetEnv,
    UnsetEnv,
    ChangeConsole,
    Unknown(i32),
}

impl Command {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Command::Start,
            1 => Command::Runlevel,
            2 => Command::PowerFail,
            3 => Command::PowerFailNow,
            4 => Command::PowerOk,
            5 => Command::Bsd,
            6 => Command::SetEnv,
            7 => Command::UnsetEnv,
            12345 => Command::ChangeConsole,
            other => Command::Unknown(other),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Command::Start => 0,
            Command::Runlevel => 1,
            Command::PowerFail => 2,
            Command::PowerFailNow => 3,
            Command::PowerOk => 4,
            Command::Bsd => 5,
            Command::SetEnv => 6,
            Command::UnsetEnv => 7,
            Command::ChangeConsole => 12345,
            Command::Unknown(code) => code,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Command::Start => "START",
            Command::Runlevel => "RUNLVL",
            Command::PowerFail => "POWERFAIL",
            Command::PowerFailNow => "POWERFAILNOW",
            Command::PowerOk => "POWEROK",
            Command::Bsd => "BSD",
            Command::SetEnv => "SETENV",
            Command::UnsetEnv => "UNSETENV",
            Command::ChangeConsole => "CHANGECONS",
            Command::Unknown(code) => return write!(f, "command {}", code),
        };
        f.write_str(name)
    }
}

/// Why a chunk read from the pipe was discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BogusRequest {
    /// Fewer (or more) bytes than one record
    Size(usize),
    /// Full record with the wrong magic
    Magic(i32),
}

impl fmt::Display for BogusRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BogusRequest::Size(len) => write!(f, "{} bytes", len),
            BogusRequest::Magic(magic) => write!(f, "bad magic {:#010x}", magic),
        }
    }
}

/// A structurally valid init request
///
/// Only the header fields are decoded. The union payload (BSD
/// originator info, setenv strings) is not interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitRequest {
    pub cmd: Command,
    /// Character code of the requested runlevel, kept as the raw `int`
    pub runlevel: i32,
    pub sleeptime: i32,
}

impl InitRequest {
    /// Build a RUNLVL request for `runlevel`
    pub fn change_runlevel(runlevel: char) -> Self {
        Self {
            cmd: Command::Runlevel,
            runlevel: runlevel as i32,
            sleeptime: 0,
        }
    }

    /// Validate and decode exactly what one read returned
    pub fn parse(buf: &[u8]) -> Result<Self, BogusRequest> {
        if buf.len() != REQUEST_SIZE {
            return Err(BogusRequest::Size(buf.len()));
        }

        let magic = field(buf, 0);
        if magic != INIT_MAGIC {
            return Err(BogusRequest::Magic(magic));
        }

        Ok(Self {
            cmd: Command::from_code(field(buf, 4)),
            runlevel: field(buf, 8),
            sleeptime: field(buf, 12),
        })
    }

    /// Encode as a full wire record with a zeroed payload
    pub fn to_bytes(&self) -> [u8; REQUEST_SIZE] {
        let mut buf = [0u8; REQUEST_SIZE];
        buf[0..4].copy_from_slice(&INIT_MAGIC.to_ne_bytes());
        buf[4..8].copy_from_slice(&self.cmd.code().to_ne_bytes());
        buf[8..12].copy_from_slice(&self.runlevel.to_ne_bytes());
        buf[12..PAYLOAD_OFFSET].copy_from_slice(&self.sleeptime.to_ne_bytes());
        buf
    }
}

fn field(buf: &[u8], offset: usize) -> i32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[offset..offset + 4]);
    i32::from_ne_bytes(bytes)
}
