//! The core crate holds functionality shared between the client and server
//! halves of telemon that is not plain data, notably the secure channel
//! surface that service responses leave through.

#[macro_use]
extern crate log;

pub mod comms;

/// Locks a `Mutex`, tracing the acquisition so a stall is visible in the log.
#[macro_export]
macro_rules! trace_lock_unwrap {
    ( $x:expr ) => {{
        trace!("Locking {}", stringify!($x));
        let v = $x.lock().unwrap();
        trace!("Locked {}", stringify!($x));
        v
    }};
}

/// Takes a read lock on an `RwLock`, tracing the acquisition.
#[macro_export]
macro_rules! trace_read_lock_unwrap {
    ( $x:expr ) => {{
        trace!("Read locking {}", stringify!($x));
        let v = $x.read().unwrap();
        trace!("Read locked {}", stringify!($x));
        v
    }};
}

/// Takes a write lock on an `RwLock`, tracing the acquisition.
#[macro_export]
macro_rules! trace_write_lock_unwrap {
    ( $x:expr ) => {{
        trace!("Write locking {}", stringify!($x));
        let v = $x.write().unwrap();
        trace!("Write locked {}", stringify!($x));
        v
    }};
}
