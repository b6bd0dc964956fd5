pub mod group;
pub mod menu;
pub mod query;
pub mod schedule;

use acal_core::{ExError, ExErrorKind};
use acal_engine::EngineContext;
use acal_store::StoreHandle;

/// Store handle and settings shared by every command of one process
pub struct Session {
    pub handle: StoreHandle,
    pub ctx: EngineContext,
}

impl Session {
    pub fn new(handle: StoreHandle, ctx: EngineContext) -> Self {
        Self { handle, ctx }
    }

    /// Context for one dispatched command
    pub fn request(&self, origin: &str) -> EngineContext {
        self.ctx.for_request(origin)
    }
}

/// Terminal read/write failure
pub(crate) fn io_error(err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op("terminal")
        .with_message(err.to_string())
}
