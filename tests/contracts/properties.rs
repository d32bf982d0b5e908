//! Contract tests for registration property descriptions and their owner.

use wsrp::domain::entities::{xsd_string, PropertyError};
use wsrp::{QName, RegistrationPropertyDescription, RegistrationRequirements};

fn name(local: &str) -> QName {
    QName::local(local).unwrap()
}

/// CONTRACT: The owner is addressable by a property's current name only.
#[test]
fn contract_owner_follows_renames() {
    let requirements = RegistrationRequirements::new();
    let property = requirements
        .add_empty_property(name("foo"), xsd_string())
        .unwrap();

    property.set_name(name("bar")).unwrap();
    property.set_name(name("baz")).unwrap();

    assert_eq!(requirements.property_names(), vec![name("baz")]);
    assert!(requirements.property(&name("baz")).unwrap().same_as(&property));
}

/// CONTRACT: A rename that would collide is refused and changes nothing.
#[test]
fn contract_colliding_rename_is_refused() {
    let requirements = RegistrationRequirements::new();
    let foo = requirements
        .add_empty_property(name("foo"), xsd_string())
        .unwrap();
    requirements
        .add_empty_property(name("bar"), xsd_string())
        .unwrap();

    assert_eq!(
        foo.set_name(name("bar")),
        Err(PropertyError::DuplicateName { name: name("bar") })
    );
    assert_eq!(foo.name(), name("foo"));
    assert_eq!(requirements.property_names(), vec![name("bar"), name("foo")]);
}

/// CONTRACT: Descriptive edits reach the owner and are visible in its description.
#[test]
fn contract_hint_and_label_edits_reach_owner() {
    let requirements = RegistrationRequirements::new();
    let email = requirements
        .add_empty_property(name("email"), xsd_string())
        .unwrap();
    let before = requirements.last_modified();

    std::thread::sleep(std::time::Duration::from_millis(2));
    email.set_default_hint("Your email");
    email.set_default_label("Email");

    assert!(requirements.last_modified() > before);
    let description = requirements.service_description();
    let data = description.property(&name("email")).unwrap();
    assert_eq!(data.hint.as_ref().map(|h| h.value.as_str()), Some("Your email"));
    assert_eq!(data.label.as_ref().map(|l| l.value.as_str()), Some("Email"));
}

/// CONTRACT: A property belongs to one owner at a time.
#[test]
fn contract_property_has_single_owner() {
    let first = RegistrationRequirements::new();
    let second = RegistrationRequirements::new();
    let property = RegistrationPropertyDescription::new(name("foo"));

    first.add_property(property.clone()).unwrap();
    first.remove_property(&name("foo"));
    second.add_property(property.clone()).unwrap();
    property.set_name(name("bar")).unwrap();

    assert!(first.is_empty());
    assert_eq!(second.property_names(), vec![name("bar")]);
}

/// CONTRACT: A property held by a live owner cannot be taken by another.
#[test]
fn contract_held_property_cannot_be_taken() {
    let first = RegistrationRequirements::new();
    let second = RegistrationRequirements::new();
    let property = first.add_empty_property(name("foo"), xsd_string()).unwrap();

    assert_eq!(
        second.add_property(property.clone()).unwrap_err(),
        PropertyError::AlreadyOwned { name: name("foo") }
    );
    property.set_name(name("bar")).unwrap();

    assert!(second.is_empty());
    assert_eq!(first.property_names(), vec![name("bar")]);
    assert!(first.property(&name("foo")).is_none());
}
