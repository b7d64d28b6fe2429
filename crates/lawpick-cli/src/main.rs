mod display;

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use lawpick_api::{ApiClient, ApiConfig, DEFAULT_BASE_URL};
use lawpick_browse::{BillBrowser, LawBrowser, ListController, LoadOutcome, ViewError};
use lawpick_core::glossary::ScrollTarget;
use lawpick_core::kinds::{Bills, Laws};
use lawpick_core::listing::ListKind;
use lawpick_core::model::Category;
use lawpick_core::query::{DateRange, FilterState, QueryToken, parse_date};
use lawpick_store::FileStorage;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lawpick", version, about = "Browse law summaries and youth-proposal bills")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "LAWPICK_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    api_url: String,

    /// Directory for the offline bill list
    #[arg(long, env = "LAWPICK_CACHE_DIR", default_value = ".lawpick", global = true)]
    cache_dir: PathBuf,

    /// HTTP request timeout in seconds
    #[arg(long, env = "LAWPICK_TIMEOUT_SECS", default_value_t = 15, global = true)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List law summaries
    Laws(ListArgs),
    /// Show one law summary
    Law {
        law_id: String,
        /// Also print the reflowed statute text
        #[arg(long)]
        original: bool,
        /// Also list the card-news slides
        #[arg(long)]
        cards: bool,
        /// Highlight this glossary term
        #[arg(long)]
        term: Option<String>,
    },
    /// List youth-proposal bills
    Bills(ListArgs),
    /// Show one youth-proposal bill
    Bill { bill_no: String },
    /// Split a local summary markdown file into its sections
    Parse { file: PathBuf },
    /// Encode or decode list query strings
    #[command(subcommand)]
    Url(UrlCommand),
}

#[derive(Subcommand)]
enum UrlCommand {
    /// Show the filter state a query string decodes to
    Decode {
        query: String,
        #[arg(long, value_enum, default_value_t = ListName::Laws)]
        list: ListName,
    },
    /// Build the canonical query string for a filter
    Encode {
        #[command(flatten)]
        filters: ListArgs,
        #[arg(long, value_enum, default_value_t = ListName::Laws)]
        list: ListName,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ListName {
    Laws,
    Bills,
}

#[derive(Args, Debug, Clone)]
struct ListArgs {
    /// Category tokens or codes, comma-separated
    #[arg(long, value_delimiter = ',')]
    category: Vec<String>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    search_type: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    date_start: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    date_end: Option<String>,
    #[arg(long)]
    order_by: Option<String>,
    #[arg(long, default_value_t = 1)]
    page: u32,
}

impl ListArgs {
    fn to_state<K: ListKind>(&self) -> anyhow::Result<FilterState<K>> {
        let categories = self
            .category
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| Category::from_token(s).with_context(|| format!("unknown category {s:?}")))
            .collect::<anyhow::Result<BTreeSet<_>>>()?;
        let search_type = match &self.search_type {
            Some(s) => token(s, "search type")?,
            None => K::SearchType::default(),
        };
        let order_by = match &self.order_by {
            Some(s) => token(s, "sort key")?,
            None => K::OrderBy::default(),
        };
        let dates = DateRange::new(
            date_arg(self.date_start.as_deref(), "--date-start")?,
            date_arg(self.date_end.as_deref(), "--date-end")?,
        );
        Ok(FilterState {
            categories,
            search: self.search.clone().unwrap_or_default(),
            search_type,
            dates,
            order_by,
            page: self.page,
            selected: None,
        }
        .normalized())
    }
}

fn token<T: QueryToken>(s: &str, what: &str) -> anyhow::Result<T> {
    T::from_token(s).with_context(|| {
        let valid: Vec<_> = T::ALL.iter().map(|t| t.token()).collect();
        format!("unknown {what} {s:?} (expected one of: {})", valid.join(", "))
    })
}

fn date_arg(value: Option<&str>, flag: &str) -> anyhow::Result<Option<chrono::NaiveDate>> {
    value
        .map(|s| parse_date(s).with_context(|| format!("{flag}: invalid date {s:?}")))
        .transpose()
}

/// Records which glossary entry the hovered term resolves to.
#[derive(Default)]
struct GlossaryPanel {
    highlighted: Option<usize>,
}

impl ScrollTarget for GlossaryPanel {
    fn scroll_into_center(&mut self, _index: usize) {}

    fn set_highlight(&mut self, index: Option<usize>) {
        self.highlighted = index;
    }
}

/// Turn a list error into either a notice (cached fallback) or a failure.
fn check_list<K: ListKind>(list: &ListController<K>, what: &str) -> anyhow::Result<()> {
    match list.error() {
        Some(e) if e.is_stale_notice() => {
            display::print_notice(e);
            Ok(())
        }
        Some(e) => Err(view_error(e)).with_context(|| format!("loading {what}")),
        None => Ok(()),
    }
}

fn view_error(e: &ViewError) -> anyhow::Error {
    match &e.detail {
        Some(detail) => anyhow::Error::new(e.clone()).context(detail.clone()),
        None => anyhow::Error::new(e.clone()),
    }
}

fn log_clamp(outcome: LoadOutcome) {
    if let LoadOutcome::Applied(Some(update)) = outcome {
        info!(query = %update.query, "requested page does not exist");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("lawpick v{}", env!("CARGO_PKG_VERSION"));

    let config = ApiConfig {
        base_url: cli.api_url.clone(),
        timeout: Duration::from_secs(cli.timeout_secs),
    };

    match cli.command {
        Command::Laws(args) => {
            let client = ApiClient::new(config).context("building HTTP client")?;
            let state = args.to_state::<Laws>()?;
            let mut browser = LawBrowser::new();
            browser.navigate(&state.encode());
            log_clamp(browser.load_list(&client, Utc::now()).await);
            check_list(browser.list(), "law list")?;
            display::print_law_list(browser.list().view(), browser.list().state());
        }
        Command::Law {
            law_id,
            original,
            cards,
            term,
        } => {
            let client = ApiClient::new(config).context("building HTTP client")?;
            let mut browser = LawBrowser::new();
            browser.open_law(&law_id);
            browser.load_detail(&client).await;
            if let Some(e) = browser.detail().error() {
                return Err(view_error(e)).with_context(|| format!("loading law {law_id}"));
            }
            if cards {
                browser.load_cards(&client).await;
            }

            let mut panel = GlossaryPanel::default();
            if let Some(term) = &term
                && !browser.hover_term(term, &mut panel)
            {
                eprintln!("  (\"{term}\" is not in the glossary)");
            }

            let Some(view) = browser.detail().record() else {
                anyhow::bail!("law {law_id} returned no record");
            };
            display::print_law(view, panel.highlighted, original);
            if cards {
                display::print_cards(browser.cards(), client.base_url());
            }
        }
        Command::Bills(args) => {
            let client = ApiClient::new(config).context("building HTTP client")?;
            let state = args.to_state::<Bills>()?;
            let storage = Arc::new(FileStorage::new(&cli.cache_dir));
            let mut browser = BillBrowser::new(storage);
            browser.navigate(&state.encode());
            log_clamp(browser.load_list(&client, Utc::now()).await);
            check_list(browser.list(), "bill list")?;
            display::print_bill_list(browser.list().view(), browser.list().state());
        }
        Command::Bill { bill_no } => {
            let client = ApiClient::new(config).context("building HTTP client")?;
            let storage = Arc::new(FileStorage::new(&cli.cache_dir));
            let mut browser = BillBrowser::new(storage);
            browser.open_bill(&bill_no);
            browser.load_detail(&client).await;
            if let Some(e) = browser.detail().error() {
                return Err(view_error(e)).with_context(|| format!("loading bill {bill_no}"));
            }
            let Some(bill) = browser.detail().record() else {
                anyhow::bail!("bill {bill_no} returned no record");
            };
            display::print_bill(bill);
        }
        Command::Parse { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let parsed = lawpick_core::markdown::parse(&text);
            if parsed.is_empty() {
                eprintln!("  (no recognised sections in {})", file.display());
            }
            display::print_parsed(&parsed, None);
        }
        Command::Url(UrlCommand::Decode { query, list }) => match list {
            ListName::Laws => display::print_state(&FilterState::<Laws>::decode(&query)),
            ListName::Bills => display::print_state(&FilterState::<Bills>::decode(&query)),
        },
        Command::Url(UrlCommand::Encode { filters, list }) => {
            let query = match list {
                ListName::Laws => filters.to_state::<Laws>()?.encode(),
                ListName::Bills => filters.to_state::<Bills>()?.encode(),
            };
            println!("{query}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lawpick_core::kinds::{LawOrder, LawSearchType};
    use pretty_assertions::assert_eq;

    fn args() -> ListArgs {
        ListArgs {
            category: Vec::new(),
            search: None,
            search_type: None,
            date_start: None,
            date_end: None,
            order_by: None,
            page: 1,
        }
    }

    #[test]
    fn flags_become_a_normalized_state() {
        let state = ListArgs {
            category: vec!["finance".into(), "4".into(), " ".into()],
            search: Some(" 전세 ".into()),
            search_type: Some("title".into()),
            order_by: Some("start_date".into()),
            page: 0,
            ..args()
        }
        .to_state::<Laws>()
        .unwrap();
        assert_eq!(
            state.categories,
            BTreeSet::from([Category::Finance, Category::Education])
        );
        assert_eq!(state.search, "전세");
        assert_eq!(state.search_type, LawSearchType::Title);
        assert_eq!(state.order_by, LawOrder::StartDate);
        assert_eq!(state.page, 1);
    }

    #[test]
    fn date_flags_apply_only_to_date_search() {
        let state = ListArgs {
            search_type: Some("date".into()),
            search: Some("무시".into()),
            date_start: Some("2024-01-01".into()),
            ..args()
        }
        .to_state::<Laws>()
        .unwrap();
        assert_eq!(state.search, "");
        assert_eq!(state.dates.start, parse_date("2024-01-01"));
        assert_eq!(state.dates.end, None);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = ListArgs {
            category: vec!["sports".into()],
            ..args()
        }
        .to_state::<Bills>()
        .unwrap_err();
        assert!(err.to_string().contains("unknown category \"sports\""));
    }

    #[test]
    fn unknown_sort_key_lists_the_valid_ones() {
        let err = ListArgs {
            order_by: Some("popularity".into()),
            ..args()
        }
        .to_state::<Laws>()
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("unknown sort key \"popularity\""));
        assert!(message.contains("start_date"));
    }

    #[test]
    fn malformed_date_names_the_flag() {
        let err = ListArgs {
            search_type: Some("date".into()),
            date_start: Some("2024-13-45".into()),
            ..args()
        }
        .to_state::<Laws>()
        .unwrap_err();
        assert!(err.to_string().starts_with("--date-start"));
    }
}
