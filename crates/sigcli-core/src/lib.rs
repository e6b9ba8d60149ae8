// Core layer: pure logic shared by the tree builder and the dispatcher.
// Nothing here touches the command line parser or process state.

pub mod coerce;
pub mod entrypoint;
pub mod introspect;
pub mod literal;

pub use coerce::{coerce, convert_token};
pub use entrypoint::{Arguments, AsyncHandler, Entrypoint, FromValue, Handler, SyncHandler};
pub use introspect::{describe_parameters, describe_signature};
pub use literal::read_literal;
