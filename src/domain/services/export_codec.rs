//! Export codec
//!
//! Binary form of one portlet's exported state, as carried between producers
//! during a migration. Layout, all integers big-endian:
//!
//! ```text
//! [version:f64][handle_len:u16][handle:utf8][has_state:u8]([state_len:u32][state])?
//! ```
//!
//! The state bytes are opaque here. Absent state and empty state are distinct
//! and both survive a round-trip.

use std::fmt;

/// Format version written by this codec
pub const CURRENT_VERSION: f64 = 1.0;

/// Versions this codec can read
const SUPPORTED_VERSIONS: &[f64] = &[CURRENT_VERSION];

/// Magic prefix of the transport envelope around an encoded export
pub const ENVELOPE_MAGIC: &[u8; 4] = b"WSXP";

const ENVELOPE_HEADER_LEN: usize = ENVELOPE_MAGIC.len() + 4;

/// Largest state payload the format can frame
pub const MAX_STATE_LEN: usize = i32::MAX as usize;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("truncated export data: {field} needs {needed} bytes, {remaining} left")]
    Truncated {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },

    #[error("unsupported export format version {version}")]
    UnsupportedVersion { version: f64 },

    #[error("portlet handle is not valid UTF-8")]
    InvalidHandle,

    #[error("portlet handle is empty")]
    EmptyHandle,

    #[error("invalid state presence flag {0:#04x}")]
    InvalidPresenceFlag(u8),

    #[error("declared state length {declared} exceeds the format limit")]
    InconsistentLength { declared: u64 },

    #[error("{count} unexpected trailing bytes after export data")]
    TrailingBytes { count: usize },

    #[error("missing export envelope header")]
    BadEnvelope,

    #[error("envelope declares {declared} payload bytes, {available} present")]
    EnvelopeLength { declared: usize, available: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportDataError {
    #[error("portlet handle must not be empty")]
    EmptyHandle,

    #[error("portlet handle is {len} bytes, at most {max} are allowed", max = u16::MAX)]
    HandleTooLong { len: usize },

    #[error("portlet state is {len} bytes, at most {max} are allowed", max = MAX_STATE_LEN)]
    StateTooLarge { len: usize },
}

/// One portlet's exported state
#[derive(Clone, PartialEq)]
pub struct ExportPortletData {
    version: f64,
    portlet_handle: String,
    state: Option<Vec<u8>>,
}

impl ExportPortletData {
    /// Build data at the current format version
    pub fn new(
        portlet_handle: impl Into<String>,
        state: Option<Vec<u8>>,
    ) -> Result<Self, ExportDataError> {
        let portlet_handle = portlet_handle.into();
        if portlet_handle.is_empty() {
            return Err(ExportDataError::EmptyHandle);
        }
        if portlet_handle.len() > u16::MAX as usize {
            return Err(ExportDataError::HandleTooLong {
                len: portlet_handle.len(),
            });
        }
        if let Some(state) = &state {
            if state.len() > MAX_STATE_LEN {
                return Err(ExportDataError::StateTooLarge { len: state.len() });
            }
        }
        Ok(Self {
            version: CURRENT_VERSION,
            portlet_handle,
            state,
        })
    }

    pub fn version(&self) -> f64 {
        self.version
    }

    pub fn portlet_handle(&self) -> &str {
        &self.portlet_handle
    }

    pub fn state(&self) -> Option<&[u8]> {
        self.state.as_deref()
    }

    pub fn into_parts(self) -> (String, Option<Vec<u8>>) {
        (self.portlet_handle, self.state)
    }

    /// Encode to the binary form. Same input, same bytes.
    pub fn encode_as_bytes(&self) -> Vec<u8> {
        let state_len = self.state.as_ref().map_or(0, |s| 4 + s.len());
        let mut buf = Vec::with_capacity(8 + 2 + self.portlet_handle.len() + 1 + state_len);

        buf.extend_from_slice(&self.version.to_be_bytes());
        // lengths were checked in `new`
        buf.extend_from_slice(&(self.portlet_handle.len() as u16).to_be_bytes());
        buf.extend_from_slice(self.portlet_handle.as_bytes());
        match &self.state {
            Some(state) => {
                buf.push(1);
                buf.extend_from_slice(&(state.len() as u32).to_be_bytes());
                buf.extend_from_slice(state);
            }
            None => buf.push(0),
        }
        buf
    }

    /// Decode the binary form produced by [`encode_as_bytes`](Self::encode_as_bytes)
    pub fn create(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = Reader::new(bytes);

        let version = f64::from_be_bytes(reader.array::<8>("version")?);
        if !SUPPORTED_VERSIONS
            .iter()
            .any(|v| v.to_bits() == version.to_bits())
        {
            tracing::warn!(version, "unsupported export format version");
            return Err(DecodeError::UnsupportedVersion { version });
        }

        let handle_len = u16::from_be_bytes(reader.array::<2>("handle length")?) as usize;
        let handle = reader.take(handle_len, "handle")?;
        let portlet_handle = std::str::from_utf8(handle)
            .map_err(|_| DecodeError::InvalidHandle)?
            .to_string();
        if portlet_handle.is_empty() {
            return Err(DecodeError::EmptyHandle);
        }

        let state = match reader.array::<1>("state flag")?[0] {
            0 => None,
            1 => {
                let declared = u32::from_be_bytes(reader.array::<4>("state length")?);
                if declared as usize > MAX_STATE_LEN {
                    return Err(DecodeError::InconsistentLength {
                        declared: u64::from(declared),
                    });
                }
                Some(reader.take(declared as usize, "state")?.to_vec())
            }
            flag => return Err(DecodeError::InvalidPresenceFlag(flag)),
        };

        if reader.remaining() > 0 {
            return Err(DecodeError::TrailingBytes {
                count: reader.remaining(),
            });
        }

        Ok(Self {
            version,
            portlet_handle,
            state,
        })
    }
}

impl fmt::Debug for ExportPortletData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportPortletData")
            .field("version", &self.version)
            .field("portlet_handle", &self.portlet_handle)
            .field("state_len", &self.state.as_ref().map(Vec::len))
            .finish()
    }
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize, field: &'static str) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() {
            return Err(DecodeError::Truncated {
                field,
                needed: len,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, field)?);
        Ok(out)
    }
}

/// Strip the transport envelope, returning the encoded export inside it
pub fn get_internal_bytes(envelope: &[u8]) -> Result<&[u8], DecodeError> {
    if envelope.len() < ENVELOPE_HEADER_LEN || !envelope.starts_with(ENVELOPE_MAGIC) {
        return Err(DecodeError::BadEnvelope);
    }
    let mut len = [0u8; 4];
    len.copy_from_slice(&envelope[ENVELOPE_MAGIC.len()..ENVELOPE_HEADER_LEN]);
    let declared = u32::from_be_bytes(len) as usize;
    let payload = &envelope[ENVELOPE_HEADER_LEN..];
    if declared != payload.len() {
        return Err(DecodeError::EnvelopeLength {
            declared,
            available: payload.len(),
        });
    }
    Ok(payload)
}

/// Wrap an encoded export in the transport envelope
pub fn wrap_internal_bytes(payload: &[u8]) -> Result<Vec<u8>, ExportDataError> {
    if payload.len() > u32::MAX as usize {
        return Err(ExportDataError::StateTooLarge { len: payload.len() });
    }
    let mut buf = Vec::with_capacity(ENVELOPE_HEADER_LEN + payload.len());
    buf.extend_from_slice(ENVELOPE_MAGIC);
    buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    buf.extend_from_slice(payload);
    Ok(buf)
}
