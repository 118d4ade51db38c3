mod config;

use anyhow::{bail, Context, Result};
use atlas_core::{
    cluster::ClusterActivation,
    favorites::FAVORITES_KEY,
    load_events_or_empty,
    links::share_url,
    ClusterGroup, EventCatalog, EventSession, HttpEventSource, JsonFileEventSource, SessionConfig,
    ViewportConfig,
};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use config::{load_settings, Settings};
use shared::{
    domain::{Coordinate, Event, EventId, MonthKey},
    filters::FilterChange,
};
use storage::Storage;
use tracing::{error, info, warn};
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "atlas", about = "Browse the event atlas from the terminal")]
struct Cli {
    /// Base URL of the event backend; overrides settings.
    #[arg(long)]
    events_url: Option<String>,
    /// Local JSON export of event rows; takes precedence over the backend.
    #[arg(long)]
    events_file: Option<String>,
    #[arg(long)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Default, Clone)]
struct FilterArgs {
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    year: Option<i32>,
    /// Month as YEAR-MONTH0, e.g. 2024-4 for May 2024. Repeatable.
    #[arg(long = "month", value_name = "YEAR-MONTH0")]
    months: Vec<MonthKey>,
    /// Category group id. Repeatable.
    #[arg(long = "category")]
    categories: Vec<String>,
    #[arg(long = "organizer")]
    organizers: Vec<String>,
    #[arg(long)]
    continent: Option<String>,
    #[arg(long, requires = "continent")]
    country: Option<String>,
    #[arg(long, num_args = 2, value_names = ["LAT", "LNG"], allow_negative_numbers = true)]
    near: Option<Vec<f64>>,
    #[arg(long)]
    radius: Option<f64>,
    #[arg(long)]
    favorites: bool,
}

impl FilterArgs {
    fn changes(&self) -> Result<Vec<FilterChange>> {
        let mut changes = Vec::new();
        if let Some(search) = &self.search {
            changes.push(FilterChange::SetSearchTerm(search.clone()));
        }
        if let Some(year) = self.year {
            changes.push(FilterChange::SetYear(year));
        }
        changes.extend(self.months.iter().copied().map(FilterChange::ToggleMonth));
        if !self.categories.is_empty() {
            changes.push(FilterChange::SelectCategories(self.categories.clone()));
        }
        changes.extend(
            self.organizers
                .iter()
                .cloned()
                .map(FilterChange::ToggleOrganizer),
        );
        if let Some(continent) = &self.continent {
            changes.push(FilterChange::SelectContinent(continent.clone()));
            changes.push(FilterChange::SelectCountry(self.country.clone()));
        }
        if let Some(radius) = self.radius {
            changes.push(FilterChange::SetRadius(radius));
        }
        if let Some(near) = &self.near {
            let [lat, lng] = near.as_slice() else {
                bail!("--near takes exactly two values: LAT LNG");
            };
            changes.push(FilterChange::SetUserLocation(Some(Coordinate::new(*lat, *lng))));
        }
        if self.favorites {
            changes.push(FilterChange::ToggleFavoritesOnly);
        }
        Ok(changes)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Month-paged list, or every match once a filter is active.
    List {
        #[command(flatten)]
        filters: FilterArgs,
        /// Months to page forward (or back) from the current one.
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        month_offset: i32,
    },
    /// Marker clusters for a map view.
    Clusters {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value_t = 2.0)]
        zoom: f64,
        #[arg(long, default_value_t = 20.0, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        lng: f64,
        /// Activate the cluster at this index and print the result.
        #[arg(long)]
        activate: Option<usize>,
    },
    /// Continents and their countries.
    Hierarchy,
    /// Registered facilitators.
    Facilitators,
    Suggest {
        term: String,
    },
    /// Toggle an event in the saved list.
    Favorite {
        id: i64,
    },
    /// Event details; accepts an id or a shared link.
    Show {
        target: String,
        #[arg(long, default_value = "https://atlas.local/")]
        share_base: String,
    },
}

enum ShowTarget {
    Id(EventId),
    Link(Url),
}

fn parse_show_target(raw: &str) -> Result<ShowTarget> {
    if let Ok(id) = raw.trim().parse::<i64>() {
        return Ok(ShowTarget::Id(EventId(id)));
    }
    let url = Url::parse(raw).with_context(|| format!("'{raw}' is neither an event id nor a link"))?;
    Ok(ShowTarget::Link(url))
}

fn apply_cli_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(v) = &cli.events_url {
        settings.events_url = Some(v.clone());
    }
    if let Some(v) = &cli.events_file {
        settings.events_file = Some(v.clone());
    }
    if let Some(v) = &cli.database_url {
        settings.database_url = v.clone();
    }
}

fn open_catalog(settings: &Settings) -> Result<Option<Box<dyn EventCatalog>>> {
    if let Some(path) = &settings.events_file {
        return Ok(Some(Box::new(JsonFileEventSource::new(path))));
    }
    if let Some(url) = &settings.events_url {
        let source = HttpEventSource::new(url)
            .with_context(|| format!("invalid events url '{url}'"))?;
        return Ok(Some(Box::new(source)));
    }
    Ok(None)
}

fn session_config(settings: &Settings) -> SessionConfig {
    SessionConfig {
        viewport: ViewportConfig {
            width_px: settings.viewport_width,
            height_px: settings.viewport_height,
            ..ViewportConfig::default()
        },
        radius_meters: settings.default_radius_meters,
        ..SessionConfig::default()
    }
}

fn event_line(event: &Event, saved: bool) -> String {
    let place = match (event.city.is_empty(), event.country.is_empty()) {
        (false, false) => format!("{}, {}", event.city, event.country),
        (false, true) => event.city.clone(),
        (true, false) => event.country.clone(),
        (true, true) => "online".into(),
    };
    format!(
        "{marker} {id:>6}  {start}  {title}  [{category}]  {place}",
        marker = if saved { "*" } else { " " },
        id = event.id,
        start = event.start.format("%Y-%m-%d %H:%M"),
        title = event.title,
        category = event.category,
    )
}

fn apply_filters(session: &mut EventSession<Storage>, filters: &FilterArgs) -> Result<()> {
    for change in filters.changes()? {
        session.apply(change);
    }
    Ok(())
}

fn group_line(group: &ClusterGroup) -> String {
    let (lat, lng) = (group.representative.lat, group.representative.lng);
    match group.members.first() {
        Some(id) if group.is_single() => format!("event {id} at ({lat:.4}, {lng:.4})"),
        _ => format!("{:>4} event(s) around ({lat:.4}, {lng:.4})", group.len()),
    }
}

fn print_clusters(session: &EventSession<Storage>) {
    let zoom = session.clusters().viewport().zoom();
    println!("zoom {zoom:.2}: {} groups", session.cluster_groups().len());
    for (index, group) in session.cluster_groups().iter().enumerate() {
        println!("#{index:<3} {}", group_line(group));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings();
    apply_cli_overrides(&mut settings, &cli);

    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .init();

    let catalog = open_catalog(&settings)?;
    let events = match &catalog {
        Some(catalog) => load_events_or_empty(catalog.as_ref()).await,
        None => {
            warn!("no events_url or events_file configured; starting with an empty catalogue");
            Vec::new()
        }
    };

    let storage = Storage::new(&settings.database_url)
        .await
        .map_err(|error| {
            error!(
                database_url = %settings.database_url,
                %error,
                "failed to open SQLite database; verify parent directory exists and permissions are correct"
            );
            error
        })?;

    let mut session =
        EventSession::start(events, storage, session_config(&settings), Utc::now()).await;

    match cli.command {
        Command::List {
            filters,
            month_offset,
        } => {
            apply_filters(&mut session, &filters)?;
            for _ in 0..month_offset.unsigned_abs() {
                if month_offset < 0 {
                    session.previous_month();
                } else {
                    session.next_month();
                }
            }
            let view = session.list_view();
            if view.navigation_visible() {
                if let atlas_core::BrowseMode::Month(month) = view.mode {
                    println!("month {month}");
                }
            } else {
                println!("{} matching event(s)", view.events.len());
            }
            for event in &view.events {
                println!("{}", event_line(event, session.is_favorite(event.id)));
            }
        }
        Command::Clusters {
            filters,
            zoom,
            lat,
            lng,
            activate,
        } => {
            apply_filters(&mut session, &filters)?;
            session.set_view(Coordinate::new(lat, lng), zoom);
            print_clusters(&session);

            if let Some(index) = activate {
                match session.activate_cluster(index) {
                    Some(ClusterActivation::Zoom { center, zoom }) => {
                        println!(
                            "flying to ({:.4}, {:.4}) at zoom {zoom}",
                            center.lat, center.lng
                        );
                        let duration = session.clusters().viewport().config().fly_duration;
                        session.advance_animation(duration);
                        print_clusters(&session);
                    }
                    Some(ClusterActivation::Spiderfy { members }) => {
                        let ids: Vec<String> = members.iter().map(ToString::to_string).collect();
                        println!("spiderfy: {}", ids.join(", "));
                    }
                    None => bail!("no cluster at index {index}"),
                }
            }
        }
        Command::Hierarchy => {
            for continent in session.hierarchy().continents() {
                println!("{continent}");
                for country in session.hierarchy().countries(continent) {
                    println!("  {country}");
                }
            }
        }
        Command::Facilitators => {
            for (name, avatar) in session.facilitators() {
                println!("{name}  {avatar}");
            }
        }
        Command::Suggest { term } => {
            for title in session.suggestions(&term) {
                println!("{title}");
            }
        }
        Command::Favorite { id } => {
            let id = EventId(id);
            let saved = session.toggle_favorite(id).await?;
            info!(event_id = %id, saved, "toggled favorite");
            if let Some(entry) = session.favorites_store().get_entry(FAVORITES_KEY).await? {
                info!(updated_at = %entry.updated_at, "favorites persisted");
            }
            println!("{} {id}", if saved { "saved" } else { "removed" });
        }
        Command::Show { target, share_base } => {
            let share_base = Url::parse(&share_base)
                .with_context(|| format!("invalid share base '{share_base}'"))?;
            let selected = match parse_show_target(&target)? {
                ShowTarget::Id(id) => session.select_event(id).then_some(id),
                ShowTarget::Link(url) => session.open_deep_link(&url),
            };
            let Some(id) = selected else {
                bail!("no event matches '{target}'");
            };

            if let Some(event) = session.selected() {
                println!("{}", event_line(event, session.is_favorite(id)));
                println!("  organizer: {}", event.organizer);
                for facilitator in &event.co_facilitators {
                    println!("  with: {}", facilitator.name);
                }
                println!("  color: {}", session.category_color(&event.category));
                if let Some(link) = &event.link {
                    println!("  link: {link}");
                }
            }
            if let Some(catalog) = &catalog {
                let description = session.description(catalog.as_ref(), id).await;
                println!("\n{description}");
            }
            println!("\nshare: {}", share_url(&share_base, id));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
