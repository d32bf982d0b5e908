use std::sync::Arc;

use anyhow::{Context, Result};
use wsrp::{Config, ConsumerRegistry, RegistryError, TomlConsumerStore, WsrpError, WsrpResult};

use crate::cli::ConsumerCommands;
use crate::ui::json;
use crate::ui::output::{print_producer, producer_json, producer_line};

pub fn run(command: ConsumerCommands, config: &Config, json: bool) -> Result<()> {
    let path = config.store.resolved_path();
    let registry = ConsumerRegistry::new(Arc::new(TomlConsumerStore::with_path(path.clone())));
    registry
        .start()
        .map_err(WsrpError::from)
        .with_context(|| format!("failed to open consumer store {}", path.display()))?;

    let result = dispatch(&registry, command, config, json);
    registry.stop().map_err(WsrpError::from)?;
    Ok(result?)
}

fn dispatch(
    registry: &ConsumerRegistry,
    command: ConsumerCommands,
    config: &Config,
    json: bool,
) -> WsrpResult<()> {
    match command {
        ConsumerCommands::List => cmd_list(registry, json),
        ConsumerCommands::Show { id } => cmd_show(registry, &id, json),
        ConsumerCommands::Create {
            id,
            wsdl,
            cache_expiration,
        } => {
            let cache_expiration = cache_expiration.or(config.consumers.default_cache_expiration);
            let info = registry.create_consumer(&id, cache_expiration, wsdl)?;
            report(json, "consumers create", producer_json(&info), || {
                println!("Created producer '{}'", info.id())
            })
        }
        ConsumerCommands::Rename { id, new_id } => {
            let mut info = require(registry, &id)?;
            info.set_id(new_id.as_str());
            let previous = registry.update_producer_info(&mut info)?;
            report(
                json,
                "consumers rename",
                serde_json::json!({ "id": info.id(), "previous_id": previous }),
                || match &previous {
                    Some(old) => println!("Renamed producer '{old}' to '{new_id}'"),
                    None => println!("Producer '{new_id}' unchanged"),
                },
            )
        }
        ConsumerCommands::Remove { id } => {
            let removed = registry.remove_consumer(&id)?;
            report(json, "consumers remove", producer_json(&removed), || {
                println!("Removed producer '{id}'")
            })
        }
        ConsumerCommands::Activate { id } => set_active(registry, &id, true, json),
        ConsumerCommands::Deactivate { id } => set_active(registry, &id, false, json),
    }
}

fn require(registry: &ConsumerRegistry, id: &str) -> WsrpResult<wsrp::ProducerInfo> {
    registry
        .get_consumer(id)?
        .ok_or_else(|| RegistryError::UnknownConsumer { id: id.to_string() }.into())
}

fn report(
    json: bool,
    command: &str,
    data: serde_json::Value,
    text: impl FnOnce(),
) -> WsrpResult<()> {
    if json {
        json::complete(command, data)?;
    } else {
        text();
    }
    Ok(())
}

fn cmd_list(registry: &ConsumerRegistry, json: bool) -> WsrpResult<()> {
    let mut producers = registry.configured_consumers()?;
    producers.sort_by(|a, b| a.id().cmp(b.id()));

    if json {
        let data: Vec<_> = producers.iter().map(producer_json).collect();
        json::complete("consumers list", serde_json::Value::Array(data))?;
        return Ok(());
    }

    if producers.is_empty() {
        println!("No producers configured.");
        return Ok(());
    }
    for info in &producers {
        println!("{}", producer_line(info));
    }
    Ok(())
}

fn cmd_show(registry: &ConsumerRegistry, id: &str, json: bool) -> WsrpResult<()> {
    let info = require(registry, id)?;
    report(json, "consumers show", producer_json(&info), || {
        print_producer(&info)
    })
}

fn set_active(registry: &ConsumerRegistry, id: &str, active: bool, json: bool) -> WsrpResult<()> {
    let info = registry.set_active(id, active)?;
    let command = if active {
        "consumers activate"
    } else {
        "consumers deactivate"
    };
    report(json, command, producer_json(&info), || {
        println!(
            "Producer '{}' {}",
            info.id(),
            if active { "activated" } else { "deactivated" }
        )
    })
}
