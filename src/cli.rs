use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// wsrp - manage WSRP producer connections and portlet exports
#[derive(Parser, Debug)]
#[command(name = "wsrp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit NDJSON events instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ~/.config/wsrp/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Consumer store file, overrides config and WSRP_STORE_PATH
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configured producer connections
    #[command(subcommand)]
    Consumers(ConsumerCommands),

    /// Encode or decode portlet export data
    #[command(subcommand)]
    Export(ExportCommands),
}

#[derive(Subcommand, Debug)]
pub enum ConsumerCommands {
    /// List configured producers
    List,

    /// Show one producer with its registration state
    Show { id: String },

    /// Add a producer
    Create {
        id: String,

        /// WSDL location of the producer
        #[arg(long)]
        wsdl: Option<String>,

        /// Seconds a cached service description stays fresh
        #[arg(long)]
        cache_expiration: Option<u32>,
    },

    /// Change the id of a producer
    Rename { id: String, new_id: String },

    /// Delete a producer
    Remove { id: String },

    /// Allow portlet invocations through a producer
    Activate { id: String },

    /// Stop portlet invocations through a producer
    Deactivate { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Encode a portlet handle and optional state, print hex
    Encode {
        handle: String,

        /// Portlet state as hex; omit for no state
        #[arg(long)]
        state: Option<String>,

        /// Wrap the result in the transport envelope
        #[arg(long)]
        envelope: bool,
    },

    /// Decode hex export data
    Decode {
        hex: String,

        /// Input is wrapped in the transport envelope
        #[arg(long)]
        envelope: bool,
    },
}
