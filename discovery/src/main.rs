//! `thriftures` command: run store discovery outside the app shell.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use clap::{Parser, Subcommand};
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use thriftures::config::DiscoverySettings;
use thriftures::domain::normalizer::{ThumbnailLinker, classify, convert};
use thriftures::domain::ports::{
    FixturePlacesProvider, FixtureSdkLoader, MountTarget, PlaceDetail, PlacesProvider, RawPlace,
    SdkLoader,
};
use thriftures::domain::{
    CategoryFilter, DiscoveryPorts, DiscoverySession, MapScreen, MapScreenConfig, Sale,
    SaleCategory, ScreenRuntime, SessionSettings, UserSaleDraft,
};
use thriftures::outbound::{GooglePlacesHttpProvider, HttpSdkLoader, InMemorySurfaceFactory};
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

const MAP_TARGET: &str = "map";

/// `thriftures` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "thriftures",
    about = "Discover nearby thrift, consignment and vintage stores",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Run map discovery and print the resulting sales.
    Discover {
        /// Search radius in metres. Falls back to configuration.
        #[arg(long, value_name = "metres")]
        radius: Option<u32>,
        /// Hide a category (repeatable).
        #[arg(long = "exclude", value_name = "category", value_parser = parse_category)]
        exclude: Vec<SaleCategory>,
        /// Print the filtered sales as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the normalised sale for one place.
    Detail {
        /// Provider place id or a `fallback_` catalogue id.
        place_id: String,
    },
    /// Print the category assigned to a listing.
    Classify {
        /// Business name.
        #[arg(long)]
        name: String,
        /// Provider type tag (repeatable).
        #[arg(long = "type", value_name = "tag")]
        types: Vec<String>,
    },
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = DiscoverySettings::load_from_iter([OsString::from("thriftures")])
        .map_err(|error| io::Error::other(format!("load configuration: {error}")))?;

    match args.command {
        Command::Discover {
            radius,
            exclude,
            json,
        } => discover(&settings, radius, exclude, json).await,
        Command::Detail { place_id } => detail(&settings, &place_id).await,
        Command::Classify { name, types } => {
            let category = classify(&name, &types);
            println!("category={}", category.slug());
            println!("label={}", category.display_name());
            println!("color={}", category.color());
            Ok(())
        }
    }
}

async fn discover(
    settings: &DiscoverySettings,
    radius: Option<u32>,
    exclude: Vec<SaleCategory>,
    json: bool,
) -> io::Result<()> {
    let session = build_session(settings)?;
    let user_sales = load_user_sales(&settings.user_sales_path())?;
    let config = MapScreenConfig {
        search_radius_meters: radius.unwrap_or_else(|| settings.search_radius_meters()),
        ..MapScreenConfig::default()
    };
    let mut screen = MapScreen::new(session, config, ScreenRuntime::default(), user_sales);
    screen.set_filter(CategoryFilter::excluding(exclude));
    let center = settings.location_source().position();
    screen.load(MountTarget::new(MAP_TARGET), center).await;

    let sales = screen.filtered_sales();
    if json {
        let rendered = serde_json::to_string_pretty(&sales)
            .map_err(|error| io::Error::other(format!("encode sales: {error}")))?;
        println!("{rendered}");
        return Ok(());
    }

    println!("phase={:?}", screen.phase());
    println!("status={}", screen.status());
    if let Some(notice) = screen.notice() {
        println!("notice={notice}");
    }
    println!("sales={}", sales.len());
    for sale in &sales {
        println!(
            "{id}\t{category}\t{title}\t{address}",
            id = sale.id,
            category = sale.category.slug(),
            title = sale.title,
            address = sale.address
        );
    }
    Ok(())
}

async fn detail(settings: &DiscoverySettings, place_id: &str) -> io::Result<()> {
    let session = build_session(settings)?;
    let detail = session
        .fetch_place_detail(place_id)
        .await
        .map_err(|error| io::Error::other(format!("place detail lookup failed: {error}")))?;
    let sale = convert(
        &place_from_detail(&detail),
        Some(&detail),
        session.thumbnails(),
        DefaultClock.utc(),
    );
    let rendered = serde_json::to_string_pretty(&sale)
        .map_err(|error| io::Error::other(format!("encode sale: {error}")))?;
    println!("{rendered}");
    Ok(())
}

fn build_session(settings: &DiscoverySettings) -> io::Result<DiscoverySession> {
    let api_key = settings.api_key();
    let base_url = settings
        .places_base_url()
        .map_err(|error| io::Error::other(format!("invalid places base URL: {error}")))?;
    let thumbnails = ThumbnailLinker::new(&base_url, api_key.clone()).ok_or_else(|| {
        io::Error::other(format!("places base URL '{base_url}' cannot hold a photo path"))
    })?;
    let timeout = settings.request_timeout();

    let (sdk_loader, places): (Arc<dyn SdkLoader>, Arc<dyn PlacesProvider>) = match &api_key {
        Some(key) => {
            let sdk_url = settings
                .sdk_url()
                .map_err(|error| io::Error::other(format!("invalid SDK URL: {error}")))?;
            let loader = HttpSdkLoader::new(sdk_url, timeout)
                .map_err(|error| io::Error::other(format!("create HTTP client: {error}")))?;
            let provider = GooglePlacesHttpProvider::new(base_url, key.clone(), timeout)
                .map_err(|error| io::Error::other(format!("create HTTP client: {error}")))?;
            (Arc::new(loader), Arc::new(provider))
        }
        None => (Arc::new(FixtureSdkLoader), Arc::new(FixturePlacesProvider)),
    };

    Ok(DiscoverySession::new(
        DiscoveryPorts::new(
            sdk_loader,
            places,
            Arc::new(settings.location_source()),
            Arc::new(InMemorySurfaceFactory::with_targets([MAP_TARGET])),
        ),
        SessionSettings::new(api_key, thumbnails),
    ))
}

fn place_from_detail(detail: &PlaceDetail) -> RawPlace {
    RawPlace {
        place_id: detail.place_id.clone(),
        name: detail.name.clone(),
        vicinity: detail.formatted_address.clone(),
        location: detail.location,
        rating: detail.rating,
        user_ratings_total: detail.user_ratings_total,
        opening_hours: detail.opening_hours.clone(),
        photos: detail.photos.clone(),
        types: detail.types.clone(),
    }
}

fn load_user_sales(path: &Path) -> io::Result<Vec<Sale>> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "sales path must be a file"))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        io::Error::other(format!(
            "open sales directory '{}': {error}",
            parent.display()
        ))
    })?;
    let raw = directory.read_to_string(Path::new(file_name)).map_err(|error| {
        io::Error::other(format!("read sales file '{}': {error}", path.display()))
    })?;
    let drafts: Vec<UserSaleDraft> = serde_json::from_str(&raw).map_err(|error| {
        io::Error::other(format!("decode sales file '{}': {error}", path.display()))
    })?;
    Ok(drafts.into_iter().map(Sale::user_posted).collect())
}

fn parse_category(raw: &str) -> Result<SaleCategory, String> {
    SaleCategory::from_slug(raw).ok_or_else(|| {
        let known: Vec<_> = SaleCategory::ALL.iter().map(|c| c.slug()).collect();
        format!("unknown category '{raw}'; expected one of {}", known.join(", "))
    })
}
