//! Connection lifecycle (C7): the per-connection context and the
//! reactor pool that drives it.

pub mod context;
pub mod reactor;

pub use self::context::handle_connection;
pub use self::reactor::ReactorPool;
