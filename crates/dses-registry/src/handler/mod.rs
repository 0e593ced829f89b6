//! Invocation handler: function-name dispatch and argument validation.

pub mod dispatcher;

pub use dispatcher::{Arity, ChaincodeHandler, Function, Response, INVALID_FUNCTION};
