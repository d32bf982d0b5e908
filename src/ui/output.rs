use wsrp::domain::entities::ProducerInfo;
use wsrp::ConfigWarning;

pub fn print_config_warnings(warnings: &[ConfigWarning], json: bool) {
    for warning in warnings {
        if json {
            tracing::warn!(key = %warning.key, file = %warning.file.display(), "unknown config key");
        } else {
            eprintln!("warning: {warning}");
        }
    }
}

/// Machine-readable view of a producer connection
pub fn producer_json(info: &ProducerInfo) -> serde_json::Value {
    let registration = info.registration();
    serde_json::json!({
        "id": info.id(),
        "key": info.persistent_key(),
        "active": info.is_active(),
        "wsdl_url": info.endpoint().wsdl_url,
        "cache_expiration": info.endpoint().cache_expiration,
        "registration": {
            "status": registration.status(),
            "handle": registration.registration_handle(),
            "modified": registration.is_modified(),
            "properties": registration
                .property_values()
                .into_iter()
                .map(|(name, value)| (name.to_string(), serde_json::Value::String(value)))
                .collect::<serde_json::Map<_, _>>(),
        },
    })
}

/// One line per producer for `consumers list`
pub fn producer_line(info: &ProducerInfo) -> String {
    format!(
        "{:<20} {:<8} {:<26} {}",
        info.id(),
        if info.is_active() { "active" } else { "inactive" },
        info.registration().status().to_string(),
        info.endpoint().wsdl_url.as_deref().unwrap_or("-"),
    )
}

pub fn print_producer(info: &ProducerInfo) {
    let registration = info.registration();
    println!("Producer: {}", info.id());
    println!("  Key:              {}", info.persistent_key().unwrap_or("-"));
    println!("  Active:           {}", info.is_active());
    println!(
        "  WSDL:             {}",
        info.endpoint().wsdl_url.as_deref().unwrap_or("-")
    );
    match info.endpoint().cache_expiration {
        Some(secs) => println!("  Cache expiration: {secs}s"),
        None => println!("  Cache expiration: -"),
    }
    println!("  Registration:     {}", registration.status());
    if let Some(handle) = registration.registration_handle() {
        println!("  Handle:           {handle}");
    }
    for (name, value) in registration.property_values() {
        println!("    {name} = {value}");
    }
}
