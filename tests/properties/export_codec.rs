//! Property tests for the export codec.

use proptest::prelude::*;

use wsrp::domain::services::{CURRENT_VERSION, ENVELOPE_MAGIC};
use wsrp::{get_internal_bytes, wrap_internal_bytes, DecodeError, ExportPortletData};

fn handle() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_./:\\-\u{e9}\u{4e2d}]{1,64}").unwrap()
}

fn state() -> impl Strategy<Value = Option<Vec<u8>>> {
    proptest::option::of(proptest::collection::vec(any::<u8>(), 0..512))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: decode(encode(x)) == x, absent state stays absent.
    #[test]
    fn property_round_trip(handle in handle(), state in state()) {
        let data = ExportPortletData::new(handle, state).unwrap();
        let decoded = ExportPortletData::create(&data.encode_as_bytes()).unwrap();

        prop_assert_eq!(decoded.portlet_handle(), data.portlet_handle());
        prop_assert_eq!(decoded.state(), data.state());
        prop_assert_eq!(decoded.version(), CURRENT_VERSION);
    }

    /// PROPERTY: Encoding is deterministic.
    #[test]
    fn property_encoding_is_deterministic(handle in handle(), state in state()) {
        let data = ExportPortletData::new(handle, state).unwrap();
        prop_assert_eq!(data.encode_as_bytes(), data.clone().encode_as_bytes());
    }

    /// PROPERTY: The decoder never panics on arbitrary input.
    #[test]
    fn property_decoder_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let _ = ExportPortletData::create(&bytes);
        let _ = get_internal_bytes(&bytes);
    }

    /// PROPERTY: Every strict prefix of a valid encoding is rejected as truncated.
    #[test]
    fn property_truncation_is_detected(handle in handle(), state in state(), cut in any::<prop::sample::Index>()) {
        let bytes = ExportPortletData::new(handle, state).unwrap().encode_as_bytes();
        let len = cut.index(bytes.len());
        let result = ExportPortletData::create(&bytes[..len]);
        prop_assert!(
            matches!(result, Err(DecodeError::Truncated { .. })),
            "prefix of {} bytes gave {:?}", len, result
        );
    }

    /// PROPERTY: Appending bytes to a valid encoding is rejected.
    #[test]
    fn property_trailing_bytes_are_rejected(
        handle in handle(),
        state in state(),
        extra in proptest::collection::vec(any::<u8>(), 1..16),
    ) {
        let mut bytes = ExportPortletData::new(handle, state).unwrap().encode_as_bytes();
        bytes.extend_from_slice(&extra);
        prop_assert_eq!(
            ExportPortletData::create(&bytes).unwrap_err(),
            DecodeError::TrailingBytes { count: extra.len() }
        );
    }

    /// PROPERTY: The transport envelope strips back to the exact payload.
    #[test]
    fn property_envelope_round_trip(payload in proptest::collection::vec(any::<u8>(), 0..256)) {
        let wrapped = wrap_internal_bytes(&payload).unwrap();
        prop_assert!(wrapped.starts_with(ENVELOPE_MAGIC));
        prop_assert_eq!(get_internal_bytes(&wrapped).unwrap(), &payload[..]);
    }
}
