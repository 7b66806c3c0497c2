#![deny(missing_docs)]
//! Cosmoport command-line interface.
//!
//! Lists, counts, creates, edits, and removes ships through the Cosmoport REST API.

mod client;

use chrono::{DateTime, Duration, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use client::{DEFAULT_SERVER_URL, ShipClient};
use cosmoport_core::{
    DEFAULT_PAGE_SIZE, PageRequest, Ship, ShipDraft, ShipFilter, ShipOrder, ShipType, parse_id,
    require_complete, start_of_year,
};
use serde::Serialize;
use std::fmt::Write;
use std::str::FromStr;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "cosmoport", version, about = "Cosmoport ship registry CLI")]
struct Cli {
    /// Base URL of the Cosmoport server.
    #[arg(long, global = true, env = "COSMOPORT_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Copy, Clone, Debug, Default, Eq, PartialEq)]
enum SortField {
    #[default]
    Id,
    Speed,
    Date,
    Rating,
}

impl From<SortField> for ShipOrder {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Id => ShipOrder::Id,
            SortField::Speed => ShipOrder::Speed,
            SortField::Date => ShipOrder::Date,
            SortField::Rating => ShipOrder::Rating,
        }
    }
}

fn parse_ship_type(raw: &str) -> Result<ShipType, String> {
    ShipType::from_str(raw).map_err(|err| err.to_string())
}

#[derive(Args, Clone, Debug, Default)]
struct FilterArgs {
    /// Substring of the ship name.
    #[arg(long)]
    name: Option<String>,
    /// Substring of the home planet.
    #[arg(long)]
    planet: Option<String>,
    /// Ship type (transport, military, merchant).
    #[arg(long = "type", value_parser = parse_ship_type)]
    ship_type: Option<ShipType>,
    /// Earliest production year, inclusive.
    #[arg(long)]
    after: Option<i32>,
    /// Latest production year, inclusive.
    #[arg(long)]
    before: Option<i32>,
    /// Match only used (true) or only new (false) ships.
    #[arg(long)]
    used: Option<bool>,
    /// Minimum speed.
    #[arg(long)]
    min_speed: Option<f64>,
    /// Maximum speed.
    #[arg(long)]
    max_speed: Option<f64>,
    /// Minimum crew size.
    #[arg(long)]
    min_crew: Option<i32>,
    /// Maximum crew size.
    #[arg(long)]
    max_crew: Option<i32>,
    /// Minimum rating.
    #[arg(long)]
    min_rating: Option<f64>,
    /// Maximum rating.
    #[arg(long)]
    max_rating: Option<f64>,
}

#[derive(Args, Clone, Debug)]
struct PageArgs {
    /// Zero-based page index.
    #[arg(long, default_value_t = 0)]
    page: u32,
    /// Ships per page.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,
    /// Sort field.
    #[arg(long, value_enum, default_value_t = SortField::Id)]
    order: SortField,
}

#[derive(Args, Clone, Debug, Default)]
struct ShipArgs {
    /// Ship name.
    #[arg(long)]
    name: Option<String>,
    /// Home planet.
    #[arg(long)]
    planet: Option<String>,
    /// Ship type (transport, military, merchant).
    #[arg(long = "type", value_parser = parse_ship_type)]
    ship_type: Option<ShipType>,
    /// Production year.
    #[arg(long)]
    prod_year: Option<i32>,
    /// Whether the ship is used.
    #[arg(long)]
    used: Option<bool>,
    /// Speed in the 0.01..=0.99 range.
    #[arg(long)]
    speed: Option<f64>,
    /// Crew size.
    #[arg(long)]
    crew_size: Option<i32>,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of ships matching the filters.
    List {
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Count ships matching the filters.
    Count {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show a single ship.
    Get {
        /// Ship identifier.
        id: String,
    },
    /// Register a new ship; every field except `--used` is required.
    Create {
        #[command(flatten)]
        ship: ShipArgs,
    },
    /// Change selected fields of an existing ship.
    Update {
        /// Ship identifier.
        id: String,
        #[command(flatten)]
        ship: ShipArgs,
    },
    /// Remove a ship.
    Delete {
        /// Ship identifier.
        id: String,
    },
}

#[derive(Serialize)]
struct DeletedShip {
    deleted: i64,
}

fn year_start(year: i32) -> CliResult<DateTime<Utc>> {
    start_of_year(year).ok_or_else(|| format!("year {year} is out of range").into())
}

/// Last millisecond of `year`, so `--before` covers the whole year.
fn year_end(year: i32) -> CliResult<DateTime<Utc>> {
    let next = year
        .checked_add(1)
        .ok_or_else(|| format!("year {year} is out of range"))?;
    Ok(year_start(next)? - Duration::milliseconds(1))
}

impl FilterArgs {
    fn into_filter(self) -> CliResult<ShipFilter> {
        Ok(ShipFilter {
            name: self.name,
            planet: self.planet,
            ship_type: self.ship_type,
            after: self
                .after
                .map(|year| year_start(year).map(|at| at.timestamp_millis()))
                .transpose()?,
            before: self
                .before
                .map(|year| year_end(year).map(|at| at.timestamp_millis()))
                .transpose()?,
            is_used: self.used,
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            min_crew_size: self.min_crew,
            max_crew_size: self.max_crew,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
        })
    }
}

impl From<PageArgs> for PageRequest {
    fn from(args: PageArgs) -> Self {
        PageRequest {
            page_number: args.page,
            page_size: args.page_size,
            order: args.order.into(),
        }
    }
}

impl ShipArgs {
    fn into_draft(self) -> CliResult<ShipDraft> {
        Ok(ShipDraft {
            name: self.name,
            planet: self.planet,
            ship_type: self.ship_type,
            prod_date: self.prod_year.map(year_start).transpose()?,
            is_used: self.used,
            speed: self.speed,
            crew_size: self.crew_size,
        })
    }
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let client = ShipClient::new(&cli.server)?;
    let output = run(cli.command, &client, cli.format).await?;
    print!("{output}");
    Ok(())
}

#[cfg(test)]
fn main() {}

async fn run(command: Commands, client: &ShipClient, format: OutputFormat) -> CliResult<String> {
    match command {
        Commands::List { filter, page } => {
            let ships = client.list(&filter.into_filter()?, &page.into()).await?;
            render_ships(&ships, format)
        }
        Commands::Count { filter } => {
            let total = client.count(&filter.into_filter()?).await?;
            Ok(match format {
                OutputFormat::Text => format!("{total}\n"),
                OutputFormat::Json => format!("{}\n", serde_json::to_string(&total)?),
            })
        }
        Commands::Get { id } => {
            let ship = client.get(parse_id(Some(id.as_str()))?).await?;
            render_ships(std::slice::from_ref(&ship), format)
        }
        Commands::Create { ship } => {
            let draft = ship.into_draft()?;
            require_complete(&draft)?;
            let created = client.create(&draft).await?;
            render_ships(std::slice::from_ref(&created), format)
        }
        Commands::Update { id, ship } => {
            let updated = client
                .update(parse_id(Some(id.as_str()))?, &ship.into_draft()?)
                .await?;
            render_ships(std::slice::from_ref(&updated), format)
        }
        Commands::Delete { id } => {
            let id = parse_id(Some(id.as_str()))?;
            client.delete(id).await?;
            Ok(match format {
                OutputFormat::Text => format!("Deleted ship {id}\n"),
                OutputFormat::Json => {
                    format!("{}\n", serde_json::to_string(&DeletedShip { deleted: id })?)
                }
            })
        }
    }
}

fn render_ships(ships: &[Ship], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Text => Ok(render_ships_text(ships)),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(ships)?)),
    }
}

fn render_ships_text(ships: &[Ship]) -> String {
    let mut output = String::new();
    if ships.is_empty() {
        let _ = writeln!(output, "No ships found");
        return output;
    }
    for ship in ships {
        let _ = writeln!(output, "#{} {}", ship.id, ship.name);
        let _ = writeln!(output, "  Planet: {}", ship.planet);
        let _ = writeln!(output, "  Type: {}", ship.ship_type);
        let _ = writeln!(output, "  Year: {}", ship.prod_year());
        let _ = writeln!(output, "  Used: {}", if ship.is_used { "yes" } else { "no" });
        let _ = writeln!(output, "  Speed: {:.2}", ship.speed);
        let _ = writeln!(output, "  Crew: {}", ship.crew_size);
        let _ = writeln!(output, "  Rating: {:.2}", ship.rating);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::{DELETE, GET, POST};
    use httpmock::MockServer;
    use serde_json::json;

    fn sample_ship() -> Ship {
        Ship {
            id: 7,
            name: "Nostromo".to_string(),
            planet: "Thedus".to_string(),
            ship_type: ShipType::Transport,
            prod_date: start_of_year(3019).expect("year"),
            is_used: false,
            speed: 0.5,
            crew_size: 7,
            rating: 40.0,
        }
    }

    #[test]
    fn parses_list_with_filters_and_paging() {
        let cli = Cli::try_parse_from([
            "cosmoport",
            "--server",
            "http://ships.local",
            "list",
            "--type",
            "military",
            "--min-speed",
            "0.3",
            "--used",
            "false",
            "--page",
            "2",
            "--order",
            "rating",
        ])
        .expect("parse");

        assert_eq!(cli.server, "http://ships.local");
        let Commands::List { filter, page } = cli.command else {
            panic!("expected list");
        };
        assert_eq!(filter.ship_type, Some(ShipType::Military));
        assert_eq!(filter.min_speed, Some(0.3));
        assert_eq!(filter.used, Some(false));
        let page = PageRequest::from(page);
        assert_eq!(page.page_number, 2);
        assert_eq!(page.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(page.order, ShipOrder::Rating);
    }

    #[test]
    fn rejects_unknown_ship_type() {
        let result = Cli::try_parse_from(["cosmoport", "count", "--type", "freighter"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_format_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["cosmoport", "get", "3", "--format", "json"])
            .expect("parse");
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn year_bounds_cover_whole_years() {
        let filter = FilterArgs {
            after: Some(2900),
            before: Some(2950),
            ..FilterArgs::default()
        }
        .into_filter()
        .expect("filter");

        let after = start_of_year(2900).expect("year").timestamp_millis();
        let next = start_of_year(2951).expect("year").timestamp_millis();
        assert_eq!(filter.after, Some(after));
        assert_eq!(filter.before, Some(next - 1));
    }

    #[test]
    fn ship_args_become_draft() {
        let draft = ShipArgs {
            name: Some("Sulaco".to_string()),
            prod_year: Some(3001),
            crew_size: Some(12),
            ..ShipArgs::default()
        }
        .into_draft()
        .expect("draft");

        assert_eq!(draft.name.as_deref(), Some("Sulaco"));
        assert_eq!(draft.prod_date, start_of_year(3001));
        assert_eq!(draft.crew_size, Some(12));
        assert!(draft.planet.is_none());
        assert!(draft.speed.is_none());
    }

    #[test]
    fn render_text_lists_every_field() {
        let text = render_ships_text(&[sample_ship()]);
        assert!(text.starts_with("#7 Nostromo\n"));
        assert!(text.contains("Type: TRANSPORT"));
        assert!(text.contains("Year: 3019"));
        assert!(text.contains("Used: no"));
        assert!(text.contains("Speed: 0.50"));
        assert!(text.contains("Rating: 40.00"));
    }

    #[test]
    fn render_text_handles_empty_results() {
        assert_eq!(render_ships_text(&[]), "No ships found\n");
    }

    #[test]
    fn render_json_is_an_array() {
        let output = render_ships(&[sample_ship()], OutputFormat::Json).expect("json");
        let value: serde_json::Value = serde_json::from_str(&output).expect("parse");
        assert_eq!(value[0]["shipType"], "TRANSPORT");
        assert_eq!(value[0]["crewSize"], 7);
    }

    #[tokio::test]
    async fn get_rejects_bad_id_before_calling_server() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200);
            })
            .await;
        let client = ShipClient::new(&server.base_url()).expect("client");

        let result = run(
            Commands::Get { id: "0".to_string() },
            &client,
            OutputFormat::Text,
        )
        .await;

        assert!(result.is_err());
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn create_requires_every_field_locally() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200);
            })
            .await;
        let client = ShipClient::new(&server.base_url()).expect("client");
        let ship = ShipArgs {
            name: Some("Sulaco".to_string()),
            ..ShipArgs::default()
        };

        let err = run(Commands::Create { ship }, &client, OutputFormat::Text)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("One of Ship params is null"));
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn run_count_prints_total() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/ships/count")
                    .query_param("planet", "Earth");
                then.status(200).body("4");
            })
            .await;
        let client = ShipClient::new(&server.base_url()).expect("client");
        let filter = FilterArgs {
            planet: Some("Earth".to_string()),
            ..FilterArgs::default()
        };

        let output = run(Commands::Count { filter }, &client, OutputFormat::Text)
            .await
            .expect("count");
        assert_eq!(output, "4\n");
    }

    #[tokio::test]
    async fn run_delete_reports_id() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/rest/ships/5");
                then.status(200);
            })
            .await;
        let client = ShipClient::new(&server.base_url()).expect("client");

        let output = run(
            Commands::Delete { id: "5".to_string() },
            &client,
            OutputFormat::Json,
        )
        .await
        .expect("delete");
        let value: serde_json::Value = serde_json::from_str(&output).expect("parse");
        assert_eq!(value, json!({ "deleted": 5 }));
    }
}
