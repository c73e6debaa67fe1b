use backtrace_error::DynBacktraceError;
use std::borrow::Cow;
use tracing::error;

#[cfg(test)]
use test_log::test;

// Everything that can fail in this workspace is unrecoverable for the value
// being produced: a structure is either fully built and immutable, or it is
// not built at all. One error type therefore covers the workspace, wrapping
// the few failure classes there are. Each failure captures a backtrace and
// is logged the moment it is created, so a rejected build or a short read
// pinpoints its origin without any plumbing at the call sites.
//
// Per-query precondition violations (out-of-range rows, over-wide values,
// unmapped bytes) are debug assertions, not errors, so they never show up
// here.
#[derive(Debug)]
enum Fault {
    // Malformed input rejected while building or loading: mismatched vector
    // lengths, run lengths that do not sum to the domain, images that do not
    // tile it, a byte stream that does not match its header.
    Structure(Cow<'static, str>),
    // Inputs that would need wider columns than a packed cell can hold.
    Capacity(Cow<'static, str>),
    // Failure in the underlying byte stream while persisting or loading.
    Io(std::io::Error),
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fault::Structure(msg) => write!(f, "{}", msg),
            Fault::Capacity(msg) => write!(f, "{}", msg),
            Fault::Io(io) => write!(f, "io: {}", io),
        }
    }
}

impl std::error::Error for Fault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Fault::Io(io) => Some(io),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Error(DynBacktraceError);
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    fn record(fault: Fault) -> Error {
        error!(target: "runmove", "{}", fault);
        Error(DynBacktraceError::from(fault))
    }

    // The recorded failure, backtrace attached.
    pub fn inner(&self) -> &DynBacktraceError {
        &self.0
    }
}

// A structural failure: the input does not describe a runny permutation, or
// a serialized stream does not round-trip.
pub fn err(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::record(Fault::Structure(msg.into()))
}

// A capacity failure: the caller must supply a smaller domain or a wider
// cell type.
pub fn overflow(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::record(Fault::Capacity(msg.into()))
}

impl From<std::io::Error> for Error {
    fn from(io: std::io::Error) -> Error {
        Error::record(Fault::Io(io))
    }
}

#[test]
fn test_error() {
    let _err = err("malformed run partition");
    let _err = overflow("column too wide");
    let _err: Error = std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into();
}
