use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::task::JoinHandle;

use movielens_dashboard::{
    models::{SortKey, UserId},
    services::HttpDashboardApi,
    state::{FetchOutcome, Tab},
    view::{CLUSTERS_LOADING, NO_GENRE_DATA, NO_POPULAR_MOVIES},
    Config, Dashboard,
};

/// MovieLens dashboard - renders the dashboard's panels as text
#[derive(Parser)]
#[command(name = "movielens-dashboard")]
#[command(about = "Headless view of the MovieLens recommendation dashboard", long_about = None)]
struct Cli {
    /// Select this user and show their recommendations
    #[arg(long)]
    user: Option<UserId>,

    /// Popular movies ordering: rating_count, avg_rating or weighted_score
    #[arg(long, default_value_t = SortKey::RatingCount)]
    sort: SortKey,

    /// Panel to render
    #[arg(long, value_enum, default_value = "all")]
    panel: Panel,

    /// Reveal this many extra pages of users
    #[arg(long, default_value = "0")]
    more_users: usize,
}

#[derive(Clone, Copy, PartialEq, clap::ValueEnum)]
enum Panel {
    All,
    Users,
    Recommendations,
    Clusters,
    Popular,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    tracing::info!(api_url = %config.api_base_url, "Loaded configuration");

    let api = HttpDashboardApi::from_config(&config).context("Failed to build HTTP client")?;
    let mut dashboard = Dashboard::new(Arc::new(api), &config);

    settle(dashboard.start()).await?;
    settle(dashboard.set_sort_key(cli.sort)).await?;
    if let Some(user_id) = cli.user {
        settle(dashboard.select_user(Some(user_id))?).await?;
    }
    for _ in 0..cli.more_users {
        dashboard.load_more_users();
    }

    if matches!(cli.panel, Panel::All | Panel::Users) {
        print_users(&dashboard);
    }
    if matches!(cli.panel, Panel::All | Panel::Recommendations) {
        dashboard.select_tab(Tab::Recommendations);
        print_recommendations(&dashboard);
    }
    if matches!(cli.panel, Panel::All | Panel::Clusters) {
        dashboard.select_tab(Tab::Clusters);
        print_clusters(&dashboard);
    }
    if matches!(cli.panel, Panel::All | Panel::Popular) {
        dashboard.select_tab(Tab::PopularMovies);
        print_popular(&dashboard);
    }

    if let Some(message) = dashboard.error_message() {
        eprintln!("Error: {}", message);
    }

    Ok(())
}

/// Waits for every started request to finish
async fn settle(handles: Vec<JoinHandle<FetchOutcome>>) -> Result<()> {
    for handle in handles {
        let outcome = handle.await.context("Request task failed")?;
        tracing::debug!(outcome = ?outcome, "Request settled");
    }
    Ok(())
}

fn print_users(dashboard: &Dashboard) {
    println!("== Users ==");
    for option in dashboard.visible_users() {
        let marker = if dashboard.selected_user_id() == Some(option.user_id) {
            "*"
        } else {
            " "
        };
        println!("{} {}", marker, option.label);
    }
    if dashboard.has_more_users() {
        println!("  ... more users available (--more-users)");
    }
    println!();
}

fn print_recommendations(dashboard: &Dashboard) {
    let list = dashboard.recommendation_list();
    println!("== {} ==", list.heading);
    if dashboard.recommendations_state().is_loading() {
        println!("Loading recommendations...");
    } else if let Some(message) = list.empty_message {
        println!("{}", message);
    }
    for card in &list.cards {
        println!("- {} [{}]", card.title, card.genres.join(", "));
    }
    println!();
}

fn print_clusters(dashboard: &Dashboard) {
    println!("== User Clusters ==");
    let cards = dashboard.cluster_cards();
    if cards.is_empty() {
        println!("{}", CLUSTERS_LOADING);
    }
    for card in cards {
        println!("{} ({} users)", card.title, card.users);
        println!("  {}", card.age_line());
        println!("  {}", card.gender_line());
        println!("  {}", card.occupations_line());
        match &card.genre_chart {
            Some(points) => {
                for point in points {
                    println!("    {:<12} {:.2}", point.name, point.value);
                }
            }
            None => println!("  {}", NO_GENRE_DATA),
        }
    }
    println!();
}

fn print_popular(dashboard: &Dashboard) {
    println!("== Popular Movies: {} ==", dashboard.sort_key().label());
    if let Some(stats) = dashboard.popular_stats() {
        println!(
            "{} qualified movies, average rating {}",
            stats.qualified_movies, stats.average_rating
        );
    }
    let cards = dashboard.popular_cards();
    if cards.is_empty() && !dashboard.popular_state().is_loading() {
        println!("{}", NO_POPULAR_MOVIES);
    }
    for card in cards {
        let mut chips = card.genre_chips.join(", ");
        if let Some(overflow) = &card.overflow_chip {
            chips.push_str(&format!(", {}", overflow));
        }
        println!(
            "{}{} {} [{}] ratings: {} avg: {} weighted: {}",
            if card.highlighted { "*" } else { " " },
            card.rank,
            card.title,
            chips,
            card.rating_count,
            card.avg_rating,
            card.weighted_score
        );
    }
}
