//! Transcoding between the canonical binary configuration encoding and the
//! editable structured form, plus minimal-delta computation.
//!
//! The [`ConfigCodec`] port has two adapters: [`NativeCodec`] does everything
//! in process, [`RemoteCodec`] delegates to an external transcoding service
//! for compatibility with deployments that already run one.

mod diff;
mod errors;
mod native;
mod remote;
mod traits;

pub use diff::compute_update_from_configs;
pub use errors::CodecError;
pub use native::NativeCodec;
pub use remote::RemoteCodec;
pub use traits::ConfigCodec;
