use anyhow::Context;
use clap::{Parser, Subcommand};
use planetctl::client::Client;
use planetctl::geometry::Wheel;
use planetctl::protocol::{HostRequest, InboundMessage, MenuItem, MenuPayload, SOCKET_PATH};
use planetctl::svg::{self, SvgStyle};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "planetctl", version, about = "Drive the planet radial menu", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Control socket of the running overlay
    #[arg(short = 's', long, global = true, default_value = SOCKET_PATH)]
    socket: PathBuf,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Open the menu with the given items
    Open {
        /// A menu entry, e.g. `palette:Paint`. Repeat for more entries.
        #[arg(short = 'i', long = "item", value_name = "ICON:LABEL", value_parser = parse_item)]
        items: Vec<MenuItem>,

        /// Read the whole payload (`{"items": [...], "sub": false}`) from a file
        #[arg(short = 'j', long, conflicts_with = "items")]
        json: Option<PathBuf>,

        /// Mark the menu as a sub-menu
        #[arg(long)]
        sub: bool,

        /// Block until an item is picked and print its index
        #[arg(short = 'w', long)]
        wait: bool,
    },
    /// Open the built-in sample menu, or render it to an SVG file
    Preview {
        /// Write the sample menu to this file instead of opening it
        #[arg(long, value_name = "FILE")]
        svg: Option<PathBuf>,

        /// Block until an item is picked and print its index
        #[arg(short = 'w', long, conflicts_with = "svg")]
        wait: bool,
    },
    /// Hide the menu
    Hide,
    /// Print the index of every item picked from now on
    Listen,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Open {
            items,
            json,
            sub,
            wait,
        } => {
            let mut payload = match json {
                Some(path) => read_payload(&path)?,
                None => MenuPayload::new(items),
            };
            if sub {
                payload.sub = Some(true);
            }
            open(&cli.socket, payload, wait)
        }
        Commands::Preview { svg: Some(path), .. } => write_preview(&path),
        Commands::Preview { svg: None, wait } => {
            open(&cli.socket, MenuPayload::debug_sample(), wait)
        }
        Commands::Hide => {
            Client::connect(&cli.socket)?.send(&InboundMessage::ClosePlanetMenu)?;
            Ok(())
        }
        Commands::Listen => {
            for request in Client::connect(&cli.socket)?.selections() {
                print_selection(request?);
            }
            Ok(())
        }
    }
}

fn parse_item(arg: &str) -> Result<MenuItem, String> {
    match arg.split_once(':') {
        Some((icon, label)) if !icon.is_empty() => Ok(MenuItem::new(icon, label)),
        _ => Err(format!("expected ICON:LABEL, got '{}'", arg)),
    }
}

fn read_payload(path: &Path) -> anyhow::Result<MenuPayload> {
    let data = fs_err::read_to_string(path)?;
    serde_json::from_str(&data)
        .with_context(|| format!("{} is not a valid menu payload", path.display()))
}

fn open(socket: &Path, payload: MenuPayload, wait: bool) -> anyhow::Result<()> {
    let mut client = Client::connect(socket)?;
    client.send(&InboundMessage::OpenPlanetMenu(payload))?;

    if wait {
        print_selection(client.wait_for_selection()?);
    }
    Ok(())
}

fn print_selection(request: HostRequest) {
    match request {
        HostRequest::PlanetClick(index) => println!("{}", index),
    }
}

fn write_preview(path: &Path) -> anyhow::Result<()> {
    let sample = MenuPayload::debug_sample();
    let document = svg::render(&sample.items, Wheel::default(), &SvgStyle::default());
    fs_err::write(path, document)?;
    log::info!("Wrote preview to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn item_arguments_split_on_the_first_colon() {
        let item = parse_item("clock:Time: now").unwrap();
        assert_eq!(item.icon.name().as_str(), "clock");
        assert_eq!(item.label.as_str(), "Time: now");
        assert!(parse_item("Paint").is_err());
        assert!(parse_item(":Paint").is_err());
    }

    #[test]
    fn open_collects_repeated_items() {
        let cli = Cli::try_parse_from([
            "planetctl", "open", "-i", "palette:Paint", "-i", "warehouse:Garage", "--wait",
        ])
        .unwrap();

        let Commands::Open { items, wait, .. } = cli.command else {
            panic!("expected open");
        };
        assert_eq!(items.len(), 2);
        assert!(wait);
        assert_eq!(cli.socket, PathBuf::from(SOCKET_PATH));
    }
}
