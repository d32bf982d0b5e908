//! Contract tests for the registration state machine.

use wsrp::domain::entities::{
    PropertyDescriptionData, RegistrationContext, RegistrationError, ServiceDescription,
};
use wsrp::{QName, RegistrationInfo, RegistrationStatus};

fn name(local: &str) -> QName {
    QName::local(local).unwrap()
}

fn requiring(names: &[&str]) -> ServiceDescription {
    ServiceDescription::requiring(
        names
            .iter()
            .map(|n| PropertyDescriptionData::new(name(n)))
            .collect(),
    )
}

/// CONTRACT: Required/valid queries fail until a refresh happened.
#[test]
fn contract_queries_before_refresh_fail() {
    let info = RegistrationInfo::new();

    assert_eq!(
        info.is_registration_required(),
        Err(RegistrationError::RefreshRequired)
    );
    assert_eq!(
        info.is_registration_valid(),
        Err(RegistrationError::RefreshRequired)
    );
}

/// CONTRACT: Refresh always leaves the undetermined state.
#[test]
fn contract_refresh_determines_status() {
    let mut open = RegistrationInfo::new();
    assert_eq!(
        open.refresh(&ServiceDescription::open()).status,
        RegistrationStatus::NotRequired
    );
    assert_eq!(open.is_registration_required(), Ok(false));
    assert_eq!(open.is_registration_valid(), Ok(true));

    let mut closed = RegistrationInfo::new();
    assert_eq!(
        closed.refresh(&requiring(&["email"])).status,
        RegistrationStatus::RequiredNotRegistered
    );
    assert_eq!(closed.is_registration_required(), Ok(true));
    assert_eq!(closed.is_registration_valid(), Ok(false));
}

/// CONTRACT: Editing a property while registered moves to LocallyModified.
#[test]
fn contract_edit_while_registered_is_local_modification() {
    let mut info = RegistrationInfo::new();
    info.set_property_value(name("email"), "a@b.c").unwrap();
    info.refresh(&requiring(&["email"]));
    info.registration_succeeded(RegistrationContext::new("h1"));
    assert_eq!(info.status(), RegistrationStatus::Registered);

    info.set_property_value(name("email"), "x@y.z").unwrap();

    assert_eq!(info.status(), RegistrationStatus::LocallyModified);
    assert_eq!(info.is_registration_valid(), Ok(false));
}

/// CONTRACT: Repeated refresh without local edits is idempotent.
#[test]
fn contract_refresh_is_idempotent() {
    let description = requiring(&["email", "zip"]);
    let mut info = RegistrationInfo::new();
    info.set_property_value(name("email"), "a@b.c").unwrap();
    info.set_property_value(name("zip"), "12345").unwrap();
    info.refresh(&description);
    info.registration_succeeded(RegistrationContext::new("h1"));

    let first = info.refresh(&description);
    let second = info.refresh(&description);

    assert_eq!(first.status, RegistrationStatus::Registered);
    assert_eq!(second.status, first.status);
    assert_eq!(second.missing, first.missing);
    assert_eq!(second.extra, first.extra);
}

/// CONTRACT: Property equality looks at names and values only.
#[test]
fn contract_equal_properties_ignore_metadata() {
    let mut left = RegistrationInfo::new();
    left.set_property_value(name("email"), "a@b.c").unwrap();
    left.refresh(&requiring(&["email"]));

    let mut right = RegistrationInfo::new();
    right.set_property_value(name("email"), "a@b.c").unwrap();

    assert!(left.has_equal_properties(&right));

    right.set_property_value(name("email"), "other").unwrap();
    assert!(!left.has_equal_properties(&right));
}
