/// Runtime event stream types.
pub mod events;
/// Handle and spawn API for the single-writer cart loop.
pub mod handle;
