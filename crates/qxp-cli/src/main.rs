//! `qxp` — command line for the QXP site.
//!
//! Quotes prices with the same discount tiers as the pricing page, replays
//! URL fragments through the hash router, and manages form drafts in a
//! local redb file.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use qxp_core::draft::{DEFAULT_NAMESPACE, DraftStore, FormDraft};
use qxp_core::error::DraftError;
use qxp_core::form::{FormKind, FormSession};
use qxp_core::pricing::{
    self, DEFAULT_CURRENCY, DEFAULT_PRICE_PER_USER_PER_TERM, DISCOUNT_TIERS, PricingConfig,
    PricingInputs, format_money,
};
use qxp_core::route::Route;
use qxp_core::router::{ENTRY_FRAGMENT, HashRouter, ScrollBehavior, ViewHost, needs_entry_redirect};
use qxp_core::view::View;
use qxp_storage::RedbBackend;

// ── ANSI color helpers ───────────────────────────────────────────────

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";

// ── CLI structure ────────────────────────────────────────────────────

/// QXP — school management, simplified.
#[derive(Parser)]
#[command(
    name = "qxp",
    version,
    about = "QXP CLI — price quotes, discount tiers, fragment routing and form drafts",
    long_about = None,
    after_help = format!(
        "{DIM}Environment variables:{RESET}\n  \
         QXP_PRICE_PER_TERM   Price per user per term (default: 999)\n  \
         QXP_CURRENCY         Currency code (default: KES)\n  \
         QXP_STORE            Draft file (default: ./qxp-drafts.redb)\n\n\
         {DIM}Examples:{RESET}\n  \
         qxp quote --students 500 --staff 40 --terms 3\n  \
         qxp route '#/marketing/solutions/bursar'\n  \
         qxp draft save contact name=Wanjiku email=w@school.ac.ke"
    ),
)]
struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote the yearly price for a school.
    Quote {
        /// Number of students. Anything non-numeric counts as 0.
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        students: String,
        /// Number of teachers and staff.
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        staff: String,
        /// Billed terms per year. 0 counts as 1.
        #[arg(long, default_value = "3", allow_hyphen_values = true)]
        terms: String,
        #[command(flatten)]
        pricing: PricingArgs,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// List the volume discount tiers.
    Tiers {
        #[command(flatten)]
        pricing: PricingArgs,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Replay URL fragments through the hash router.
    Route {
        /// Fragments in navigation order, e.g. `#/pricing`.
        #[arg(required = true)]
        fragments: Vec<String>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Form draft operations.
    Draft {
        /// Draft file.
        #[arg(long, env = "QXP_STORE", default_value = "./qxp-drafts.redb")]
        store: PathBuf,
        #[command(subcommand)]
        action: DraftCommands,
    },
}

#[derive(clap::Args)]
struct PricingArgs {
    /// Price per user per term.
    #[arg(
        long,
        env = "QXP_PRICE_PER_TERM",
        default_value_t = DEFAULT_PRICE_PER_USER_PER_TERM,
        allow_negative_numbers = true
    )]
    price: f64,
    /// Currency code shown with amounts.
    #[arg(long, env = "QXP_CURRENCY", default_value = DEFAULT_CURRENCY)]
    currency: String,
}

impl PricingArgs {
    fn config(&self) -> Result<PricingConfig> {
        if !self.price.is_finite() || self.price < 0.0 {
            bail!("price must be a non-negative number, got {}", self.price);
        }
        Ok(PricingConfig {
            price_per_user_per_term: self.price,
            currency: self.currency.clone(),
        })
    }
}

#[derive(Subcommand)]
enum DraftCommands {
    /// Set fields on a form draft (`name=value` pairs).
    Save {
        /// Form identifier: `contact` or `demo`.
        form: String,
        /// Fields to set.
        #[arg(required = true)]
        fields: Vec<String>,
    },
    /// Print a form draft as JSON.
    Load {
        /// Form identifier.
        form: String,
    },
    /// Delete a form draft.
    Clear {
        /// Form identifier.
        form: String,
    },
    /// List forms that have a draft.
    List,
    /// Validate a draft and, if it passes, submit it and clear the draft.
    Submit {
        /// Form identifier.
        form: String,
    },
}

// ── Entry point ──────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{RED}{BOLD}error:{RESET} {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

async fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Quote {
            students,
            staff,
            terms,
            pricing,
            json,
        } => cmd_quote(&students, &staff, &terms, &pricing.config()?, json),
        Commands::Tiers { pricing, json } => cmd_tiers(&pricing.config()?, json),
        Commands::Route { fragments, json } => cmd_route(&fragments, json),
        Commands::Draft { store, action } => cmd_draft(&store, action).await,
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ── Pricing ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct QuoteOutput<'a> {
    inputs: PricingInputs,
    currency: &'a str,
    #[serde(flatten)]
    result: &'a pricing::PricingResult,
}

fn cmd_quote(
    students: &str,
    staff: &str,
    terms: &str,
    config: &PricingConfig,
    json: bool,
) -> Result<()> {
    let inputs = PricingInputs::from_raw(students, staff, terms);
    let result = pricing::calculate(&inputs, config);

    if json {
        return print_json(&QuoteOutput {
            inputs,
            currency: &config.currency,
            result: &result,
        });
    }

    let money = |amount: f64| format_money(amount, &config.currency);
    println!(
        "{BOLD}Pricing tier{RESET}     {} ({}% off)",
        result.tier.label, result.tier.discount_percent
    );
    println!("{BOLD}Total users{RESET}      {}", result.total_users);
    println!("{BOLD}Terms per year{RESET}   {}", result.terms_per_year);
    println!("{BOLD}Subtotal{RESET}         {}", money(result.subtotal));
    println!("{BOLD}Discount{RESET}         {}", money(result.discount_amount));
    println!("{BOLD}Total per year{RESET}   {GREEN}{}{RESET}", money(result.total));
    Ok(())
}

fn cmd_tiers(config: &PricingConfig, json: bool) -> Result<()> {
    if json {
        return print_json(&DISCOUNT_TIERS);
    }

    println!(
        "{DIM}{} per user per term{RESET}",
        format_money(config.price_per_user_per_term, &config.currency)
    );
    for tier in &DISCOUNT_TIERS {
        let range = match tier.max_users {
            Some(max) => format!("{}-{max}", tier.min_users),
            None => format!("{}+", tier.min_users),
        };
        println!("  {range:<10} {:>3}%  {}", tier.discount_percent, tier.label);
    }
    Ok(())
}

// ── Routing ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct RouteStep {
    fragment: String,
    redirected_from: Option<String>,
    view: View,
    title: &'static str,
    route: Route,
    scroll: Option<ScrollBehavior>,
}

/// Host that records every render instead of drawing it. Terminals have no
/// smooth scrolling.
#[derive(Debug, Default)]
struct RecordingHost {
    pending: String,
    redirected_from: Option<String>,
    steps: Vec<RouteStep>,
}

impl ViewHost for RecordingHost {
    fn render(&mut self, route: &Route, view: &View) {
        self.steps.push(RouteStep {
            fragment: self.pending.clone(),
            redirected_from: self.redirected_from.take(),
            view: view.clone(),
            title: view.title(),
            route: route.clone(),
            scroll: None,
        });
    }

    fn scroll_to_top(&mut self, behavior: ScrollBehavior) {
        if let Some(step) = self.steps.last_mut() {
            step.scroll = Some(behavior);
        }
    }

    fn scroll_behavior(&self) -> ScrollBehavior {
        ScrollBehavior::Instant
    }
}

impl RecordingHost {
    /// Queue `fragment` as the next one rendered, applying the entry
    /// redirect. Returns the fragment to hand the router.
    fn queue(&mut self, fragment: &str) -> String {
        let target = if needs_entry_redirect(fragment) {
            self.redirected_from = Some(fragment.to_owned());
            ENTRY_FRAGMENT.to_owned()
        } else {
            self.redirected_from = None;
            fragment.to_owned()
        };
        target.clone_into(&mut self.pending);
        target
    }
}

fn cmd_route(fragments: &[String], json: bool) -> Result<()> {
    let Some((first, rest)) = fragments.split_first() else {
        bail!("at least one fragment is required");
    };

    let mut host = RecordingHost::default();
    let start = host.queue(first);
    let mut router = HashRouter::new(&start, host);
    for fragment in rest {
        let target = router.host_mut().queue(fragment);
        if !router.navigate(&target) {
            debug!(fragment = %target, "fragment unchanged, no navigation");
        }
    }
    let steps = router.into_host().steps;

    if json {
        return print_json(&steps);
    }

    for step in &steps {
        let detail = match &step.view {
            View::Solution { slug } => format!(" [{slug}]"),
            _ => String::new(),
        };
        let note = step
            .redirected_from
            .as_ref()
            .map(|from| format!(" {DIM}(redirected from {from:?}){RESET}"))
            .unwrap_or_default();
        println!(
            "{:<32} {BOLD}{}{RESET}{detail}  {DIM}{}{RESET}{note}",
            step.fragment,
            step.view.id(),
            step.title
        );
    }
    Ok(())
}

// ── Drafts ───────────────────────────────────────────────────────────

async fn cmd_draft(store: &Path, action: DraftCommands) -> Result<()> {
    let backend = RedbBackend::open(store)
        .with_context(|| format!("failed to open draft store {}", store.display()))?;
    let drafts = DraftStore::with_namespace(Arc::new(backend), DEFAULT_NAMESPACE);

    match action {
        DraftCommands::Save { form, fields } => draft_save(&drafts, &form, &fields).await,
        DraftCommands::Load { form } => {
            let kind = FormKind::from_id(&form)?;
            let draft = match drafts.try_load(kind.id()).await {
                Ok(draft) => draft.unwrap_or_default(),
                Err(DraftError::Corrupt { reason, .. }) => {
                    tracing::warn!(form_id = kind.id(), %reason, "ignoring corrupt form draft");
                    FormDraft::new()
                }
                Err(e) => return Err(e.into()),
            };
            print_json(&draft)
        }
        DraftCommands::Clear { form } => {
            let kind = FormKind::from_id(&form)?;
            drafts.try_clear(kind.id()).await?;
            println!("{GREEN}✓{RESET} cleared {} draft", kind.id());
            Ok(())
        }
        DraftCommands::List => {
            for form in drafts.list_forms().await? {
                println!("{form}");
            }
            Ok(())
        }
        DraftCommands::Submit { form } => {
            let kind = FormKind::from_id(&form)?;
            let mut session = FormSession::open(drafts, kind).await;
            session.submit().await?;
            println!("{GREEN}✓{RESET} {} form submitted, draft cleared", kind.id());
            Ok(())
        }
    }
}

async fn draft_save(drafts: &DraftStore, form: &str, fields: &[String]) -> Result<()> {
    let kind = FormKind::from_id(form)?;
    let mut draft = drafts.load(kind.id()).await.unwrap_or_default();

    for pair in fields {
        let Some((name, value)) = pair.split_once('=') else {
            bail!("expected name=value, got {pair:?}");
        };
        if !kind.fields().iter().any(|f| f.name == name) {
            bail!("form {} has no field {name:?}", kind.id());
        }
        draft.insert(name.to_owned(), value.to_owned());
    }

    drafts.try_save(kind.id(), &draft).await?;
    println!("{GREEN}✓{RESET} saved {} draft ({} fields)", kind.id(), draft.len());
    Ok(())
}
