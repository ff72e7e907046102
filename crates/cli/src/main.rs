mod commands;
mod view;

use clap::Parser;
use sales_dashboard_core::errors::DashboardError;
use sales_dashboard_core::models::filter::FilterField;
use sales_dashboard_core::models::settings::Settings;
use sales_dashboard_core::models::sort::SortKey;
use sales_dashboard_core::SalesDashboard;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use commands::Command;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON settings file
    #[arg(short, long)]
    config: Option<String>,

    /// API root, overrides the settings file
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long)]
    start_date: Option<String>,

    #[arg(long)]
    end_date: Option<String>,

    #[arg(long)]
    min_price: Option<String>,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    /// Initial sort column (date or price)
    #[arg(long)]
    sort: Option<String>,

    /// Print the first page and exit instead of opening the prompt
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let settings = load_settings(&args)?;
    info!(base_url = %settings.base_url, "starting sales dashboard");

    let mut dashboard = SalesDashboard::with_http(settings)?;
    for (field, value) in [
        (FilterField::StartDate, &args.start_date),
        (FilterField::EndDate, &args.end_date),
        (FilterField::MinPrice, &args.min_price),
        (FilterField::Email, &args.email),
        (FilterField::Phone, &args.phone),
    ] {
        if let Some(v) = value {
            dashboard.set_input(field, v.clone());
        }
    }
    if let Some(key) = args.sort.as_deref() {
        dashboard.toggle_sort(SortKey::parse(key));
    }

    if let Err(e) = load_first_page(&mut dashboard).await {
        warn!(error = %e, "initial load failed");
    }
    println!("{}", view::render(&dashboard));

    if args.once {
        return match dashboard.error_banner() {
            Some(banner) => Err(banner.into()),
            None => Ok(()),
        };
    }

    println!("{}", commands::help());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match commands::parse(&line) {
            Ok(Some(c)) => c,
            Ok(None) => continue,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if let Err(e) = run(&mut dashboard, command).await {
            println!("{e}");
        }
        println!("{}", view::render(&dashboard));
    }

    Ok(())
}

fn load_settings(args: &Args) -> Result<Settings, DashboardError> {
    let mut settings = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|e| {
                DashboardError::InvalidConfig(format!("cannot read {path}: {e}"))
            })?;
            Settings::from_json(&json)?
        }
        None => Settings::default(),
    };
    if let Some(url) = &args.base_url {
        settings.base_url = url.clone();
    }
    settings.validate()?;
    Ok(settings)
}

async fn load_first_page(dashboard: &mut SalesDashboard) -> Result<(), DashboardError> {
    dashboard.authenticate().await?;
    dashboard.apply_filters().await
}

async fn run(dashboard: &mut SalesDashboard, command: Command) -> Result<(), DashboardError> {
    match command {
        Command::Set { field, value } => dashboard.set_input(field, value.join(" ")),
        Command::Clear { field } => dashboard.set_input(field, ""),
        Command::Apply => dashboard.apply_filters().await?,
        Command::Next => dashboard.go_next().await?,
        Command::Prev => dashboard.go_prev().await?,
        Command::Sort { column } => dashboard.toggle_sort(column.key()),
        Command::Dismiss => dashboard.dismiss_error(),
        Command::Show => {}
        Command::Help => println!("{}", commands::help()),
        Command::Quit => {}
    }
    Ok(())
}
