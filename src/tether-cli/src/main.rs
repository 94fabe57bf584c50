use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tether_contacts::{ContactsHandler, PACKET_TYPE_REQUEST_ALL_UIDS};
use tether_core::{
    init_logging, AppDirs, Config, ContactsConfig, DeviceChannel, Packet, PacketRouter,
};
use tether_media::{select, DeviceId, DeviceRegistry, PlayerSnapshot, Selection, SnapshotTable};
use toml_directory::TomlDirectory;

#[derive(Debug, Parser)]
#[command(name = "tether", version, about = "Device-pairing companion core tools")]
struct Cli {
    /// Contact directory file (defaults to contacts.toml in the config dir)
    #[arg(long, global = true)]
    contacts: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Dispatch one request packet (JSON) and print the response packet
    Respond(RespondCommand),
    /// Print every contact uid known to the directory
    Uids,
    /// Evaluate the media player selection policy against a world file
    Select(SelectCommand),
}

#[derive(Debug, Parser)]
struct RespondCommand {
    /// Read the request packet from a file instead of stdin
    #[arg(long)]
    packet: Option<PathBuf>,
}

#[derive(Debug, Parser)]
struct SelectCommand {
    /// World description (JSON): reachable devices, their snapshots, and
    /// the optional previous selection
    #[arg(long)]
    world: Option<PathBuf>,
}

/// Collects whatever the handler emits so it can be printed afterwards.
#[derive(Default)]
struct CollectingChannel {
    sent: Mutex<Vec<Packet>>,
}

impl CollectingChannel {
    fn into_packets(self) -> Vec<Packet> {
        self.sent.into_inner().unwrap_or_default()
    }
}

impl DeviceChannel for CollectingChannel {
    fn send(&self, packet: Packet) {
        self.sent.lock().unwrap().push(packet);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let dirs = AppDirs::discover()?;
    let config = Config::load_or_default(&dirs)?;
    let _logging = init_logging(&config.logging, &dirs)?;

    let contacts_path = cli
        .contacts
        .unwrap_or_else(|| dirs.config_dir().join("contacts.toml"));

    match cli.command {
        Command::Respond(cmd) => {
            let router = contacts_router(&contacts_path, config.contacts)?;
            let request = read_request(&cmd)?;
            dispatch_and_print(&router, &request)
        }
        Command::Uids => {
            let router = contacts_router(&contacts_path, config.contacts)?;
            let request = Packet::new(PACKET_TYPE_REQUEST_ALL_UIDS);
            let channel = CollectingChannel::default();
            router
                .dispatch(&request, &channel)
                .context("uid request failed")?;
            for packet in channel.into_packets() {
                for uid in packet.string_list("uids").unwrap_or_default() {
                    println!("{uid}");
                }
            }
            Ok(())
        }
        Command::Select(cmd) => run_selection(&cmd),
    }
}

fn contacts_router(path: &Path, custom_types: ContactsConfig) -> Result<PacketRouter> {
    let directory = TomlDirectory::load(path)
        .with_context(|| format!("loading contact directory from {}", path.display()))?;
    tracing::debug!(path = %path.display(), "contact directory ready");

    let mut router = PacketRouter::new();
    router.register(Arc::new(ContactsHandler::new(
        Arc::new(directory),
        custom_types,
    )));
    Ok(router)
}

fn read_request(cmd: &RespondCommand) -> Result<Packet> {
    let raw = match &cmd.packet {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading request packet from {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading request packet from stdin")?;
            buffer
        }
    };
    serde_json::from_str(&raw).context("request packet is not valid JSON")
}

fn dispatch_and_print(router: &PacketRouter, request: &Packet) -> Result<()> {
    let channel = CollectingChannel::default();
    router
        .dispatch(request, &channel)
        .with_context(|| format!("dispatching '{}' failed", request.packet_type()))?;

    let packets = channel.into_packets();
    if packets.is_empty() {
        bail!("handler produced no response packet");
    }
    for packet in packets {
        println!("{}", serde_json::to_string(&packet)?);
    }
    Ok(())
}

/// World file for `tether select`: every reachable device with its advertised
/// snapshots, plus the previously surfaced (device, player) pair if any.
#[derive(Debug, Deserialize)]
struct World {
    #[serde(default)]
    devices: Vec<WorldDevice>,
    #[serde(default)]
    previous: Option<PreviousSelection>,
}

#[derive(Debug, Deserialize)]
struct WorldDevice {
    id: String,
    #[serde(default)]
    players: Vec<PlayerSnapshot>,
}

#[derive(Debug, Deserialize)]
struct PreviousSelection {
    device: String,
    player: String,
}

fn run_selection(cmd: &SelectCommand) -> Result<()> {
    let raw = match &cmd.world {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading world file from {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading world description from stdin")?;
            buffer
        }
    };
    let world: World = serde_json::from_str(&raw).context("world description is not valid JSON")?;
    let selection = evaluate_world(&world);
    println!("{}", serde_json::to_string_pretty(&selection)?);
    Ok(())
}

fn evaluate_world(world: &World) -> Selection {
    let table = SnapshotTable::new();
    for device in &world.devices {
        table.update_device(DeviceId::new(&device.id), device.players.clone());
    }

    let previous = match &world.previous {
        Some(previous) => {
            let device = DeviceId::new(&previous.device);
            // The remembered snapshot only matters for its identity; if it
            // is no longer advertised, a placeholder carries the name.
            let snapshot = table
                .player_snapshots(&device)
                .into_iter()
                .find(|snapshot| snapshot.player == previous.player)
                .unwrap_or_else(|| PlayerSnapshot::new(previous.device.clone(), previous.player.clone()));
            Selection {
                device: Some(device),
                snapshot: Some(snapshot),
            }
        }
        None => Selection::none(),
    };

    select(&table, &previous)
}
