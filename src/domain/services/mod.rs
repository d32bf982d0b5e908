//! Domain Services
//!
//! Pure logic that operates on domain values. No I/O.

mod export_codec;

pub use export_codec::{
    get_internal_bytes, wrap_internal_bytes, DecodeError, ExportDataError, ExportPortletData,
    CURRENT_VERSION, ENVELOPE_MAGIC, MAX_STATE_LEN,
};
