// request/mod.rs

pub mod executor;
pub mod options;
pub mod result;
pub mod spec;

pub use executor::{execute_one, RequestBatch};
pub use options::{OptionOverrides, TransportOptions};
pub use result::{ResultEntry, TransportError, TransportErrorKind};
pub use spec::{Method, RequestSpec};
