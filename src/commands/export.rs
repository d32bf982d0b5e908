use anyhow::{Context, Result};
use wsrp::{get_internal_bytes, wrap_internal_bytes, ExportPortletData, WsrpResult};

use crate::cli::ExportCommands;
use crate::ui::json;

pub fn run(command: ExportCommands, json: bool) -> Result<()> {
    match command {
        ExportCommands::Encode {
            handle,
            state,
            envelope,
        } => cmd_encode(handle, state.as_deref(), envelope, json),
        ExportCommands::Decode { hex, envelope } => cmd_decode(&hex, envelope, json),
    }
}

fn cmd_encode(handle: String, state: Option<&str>, envelope: bool, json: bool) -> Result<()> {
    let state = state
        .map(|s| hex::decode(s.trim()).context("--state is not valid hex"))
        .transpose()?;
    let bytes = encode(handle, state, envelope)?;
    let encoded = hex::encode(&bytes);

    if json {
        json::complete(
            "export encode",
            serde_json::json!({ "hex": encoded, "length": bytes.len() }),
        )?;
    } else {
        println!("{encoded}");
    }
    Ok(())
}

fn cmd_decode(input: &str, envelope: bool, json: bool) -> Result<()> {
    let bytes = hex::decode(input.trim()).context("input is not valid hex")?;
    let data = decode(&bytes, envelope)?;

    if json {
        json::complete(
            "export decode",
            serde_json::json!({
                "version": data.version(),
                "handle": data.portlet_handle(),
                "state": data.state().map(hex::encode),
            }),
        )?;
    } else {
        println!("Version: {:.1}", data.version());
        println!("Handle:  {}", data.portlet_handle());
        match data.state() {
            Some(state) => println!("State:   {} ({} bytes)", hex::encode(state), state.len()),
            None => println!("State:   (none)"),
        }
    }
    Ok(())
}

fn encode(handle: String, state: Option<Vec<u8>>, envelope: bool) -> WsrpResult<Vec<u8>> {
    let bytes = ExportPortletData::new(handle, state)?.encode_as_bytes();
    if envelope {
        return Ok(wrap_internal_bytes(&bytes)?);
    }
    Ok(bytes)
}

fn decode(bytes: &[u8], envelope: bool) -> WsrpResult<ExportPortletData> {
    let payload = if envelope {
        get_internal_bytes(bytes)?
    } else {
        bytes
    };
    Ok(ExportPortletData::create(payload)?)
}
