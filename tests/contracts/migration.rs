//! Contract tests for the migration ledger and export codec.

use chrono::{TimeZone, Utc};
use wsrp::{get_internal_bytes, wrap_internal_bytes, ExportInfo, ExportPortletData, MigrationService};

/// CONTRACT: Bundles come back ordered by export time.
#[test]
fn contract_ledger_is_time_ordered() {
    let service = MigrationService::new();
    let times: Vec<_> = [5, 1, 3]
        .iter()
        .map(|s| Utc.timestamp_opt(1_600_000_000 + s, 0).unwrap())
        .collect();
    for time in &times {
        service.add(ExportInfo::new(*time));
    }

    let listed: Vec<_> = service
        .available_export_infos()
        .iter()
        .map(|i| i.export_time())
        .collect();
    let mut sorted = times.clone();
    sorted.sort();
    assert_eq!(listed, sorted);
    assert!(!service.is_available_export_infos_empty());
}

/// CONTRACT: Absent state round-trips as absent, empty state as empty.
#[test]
fn contract_absent_and_empty_state_are_distinct() {
    let absent = ExportPortletData::new("p1", None).unwrap();
    let empty = ExportPortletData::new("p1", Some(Vec::new())).unwrap();

    assert_ne!(absent.encode_as_bytes(), empty.encode_as_bytes());
    assert_eq!(
        ExportPortletData::create(&absent.encode_as_bytes()).unwrap().state(),
        None
    );
    assert_eq!(
        ExportPortletData::create(&empty.encode_as_bytes()).unwrap().state(),
        Some(&[][..])
    );
}

/// CONTRACT: Exported state stored in a bundle decodes back bit-identical.
#[test]
fn contract_bundle_state_survives_envelope_and_codec() {
    let state = vec![0u8, 1, 2, 254, 255];
    let encoded = ExportPortletData::new("portlet/é", Some(state.clone()))
        .unwrap()
        .encode_as_bytes();
    let wrapped = wrap_internal_bytes(&encoded).unwrap();

    let service = MigrationService::new();
    let time = Utc::now();
    service.add(ExportInfo::new(time).with_portlet("portlet/é", wrapped));

    let info = service.export_info(time).unwrap();
    let payload = get_internal_bytes(info.portlet_state("portlet/é").unwrap()).unwrap();
    let decoded = ExportPortletData::create(payload).unwrap();

    assert_eq!(decoded.portlet_handle(), "portlet/é");
    assert_eq!(decoded.state(), Some(&state[..]));
}
