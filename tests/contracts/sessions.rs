//! Contract tests for session correlation.

use std::sync::Arc;

use chrono::{Duration, Utc};
use wsrp::{ProducerSessionInformation, SessionRegistry};

/// CONTRACT: get_all returns a point-in-time copy, not a live view.
#[test]
fn contract_get_all_is_a_snapshot() {
    let registry = SessionRegistry::new();
    registry.put("s1", ProducerSessionInformation::new());

    let snapshot = registry.get_all();
    registry.remove("s1");

    assert_eq!(snapshot.len(), 1);
    assert!(registry.get_all().is_empty());
}

/// CONTRACT: Bundles are never shared between session keys.
#[test]
fn contract_bundles_are_per_session() {
    let registry = SessionRegistry::new();
    let mut info = ProducerSessionInformation::new();
    info.set_user_cookie("c1");
    registry.put("s1", info.clone());
    registry.put("s2", info);

    registry.update("s2", |bundle| bundle.set_user_cookie("c2"));

    assert_eq!(registry.get("s1").unwrap().user_cookie(), Some("c1"));
    assert_eq!(registry.get("s2").unwrap().user_cookie(), Some("c2"));
}

/// CONTRACT: Concurrent put/get/remove on distinct keys never loses data.
#[test]
fn contract_concurrent_access_is_safe() {
    let registry = Arc::new(SessionRegistry::new());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                for i in 0..250 {
                    registry.put(format!("{t}:{i}"), ProducerSessionInformation::new());
                }
                for i in 0..250 {
                    assert!(registry.remove(&format!("{t}:{i}")).is_some());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(registry.is_empty());
}

/// CONTRACT: Expired portlet sessions are never handed out.
#[test]
fn contract_expired_portlet_sessions_are_pruned() {
    let now = Utc::now();
    let mut info = ProducerSessionInformation::new();
    info.add_session("p1", "sid-1", Some(Duration::seconds(30)), now);
    info.add_session("p2", "sid-2", None, now);

    let later = now + Duration::seconds(60);
    assert_eq!(info.session_id_at("p1", later), None);
    assert_eq!(info.session_id_at("p2", later), Some("sid-2".to_string()));
    assert_eq!(info.session_count(), 1);
}
