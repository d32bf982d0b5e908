use wsrp::{DecodeError, RegistrationFlowError, RegistryError, WsrpError};

/// Suggested next step for errors the user can act on
fn fix_for(err: &WsrpError) -> Option<&'static str> {
    if err.needs_refresh() {
        return Some("refresh the producer's service description before registering");
    }

    let registry = match err {
        WsrpError::Registry(e) | WsrpError::RegistrationFlow(RegistrationFlowError::Registry(e)) => e,
        WsrpError::Decode(DecodeError::BadEnvelope | DecodeError::EnvelopeLength { .. }) => {
            return Some("drop --envelope if the input is a bare export payload")
        }
        WsrpError::Decode(_) => {
            return Some("pass --envelope if the input still carries its transport envelope")
        }
        _ => return None,
    };

    match registry {
        RegistryError::DuplicateIdentity { .. } => {
            Some("pick another id, or rename the existing producer first")
        }
        RegistryError::UnknownConsumer { .. } => {
            Some("run `wsrp consumers list` to see the configured ids")
        }
        RegistryError::Conflict { .. } => {
            Some("another process changed this producer, run the command again")
        }
        RegistryError::InvalidId { .. } => Some("ids must be non-empty without surrounding spaces"),
        _ => None,
    }
}

pub fn format_error(err: &anyhow::Error) -> String {
    let mut out = format!("[ERROR] {err:#}\n");
    if let Some(fix) = err.downcast_ref::<WsrpError>().and_then(fix_for) {
        out.push_str(&format!("  → Fix: {fix}\n"));
    }
    out
}

pub fn print_error(err: &anyhow::Error, json: bool) {
    if json {
        let fix = err.downcast_ref::<WsrpError>().and_then(fix_for);
        let _ = crate::ui::json::emit(serde_json::json!({
            "event": "error",
            "message": format!("{err:#}"),
            "fix": fix,
        }));
        return;
    }

    eprint!("{}", format_error(err));
}
