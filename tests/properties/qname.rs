//! Property tests for qualified names.

use proptest::prelude::*;

use wsrp::QName;

proptest! {
    /// PROPERTY: Clark notation parses back to the same name.
    #[test]
    fn property_clark_notation_round_trip(
        namespace in "[a-z:/.]{0,20}",
        local in "[A-Za-z_][A-Za-z0-9_\\-]{0,20}",
    ) {
        let name = QName::new(namespace, local).unwrap();
        let parsed: QName = name.to_string().parse().unwrap();
        prop_assert_eq!(parsed, name);
    }

    /// PROPERTY: Parsing arbitrary text never panics.
    #[test]
    fn property_parse_never_panics(input in ".{0,40}") {
        let _ = input.parse::<QName>();
    }
}
