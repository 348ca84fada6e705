mod commands;

use std::{io::Write, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use chrono::{TimeDelta, Utc};
use clap::Parser;
use commands::{ReplCli, ReplCommand};
use gw2tp_config::AppConfig;
use gw2tp_connectivity::{AnySource, CommerceClient, FixedPrices};
use gw2tp_core::{
    ItemPrice, Label, LastUpdated, ManualTrade, Notifier, Popup, PriceEntry, PriceFetcher,
    RECIPES, RefreshCycle, SchedulerCommand, TradingPostFee, calculate_manual_profit,
    quote_recipe, scheduler::SCHEDULER_CHANNEL_CAPACITY, run_scheduler,
};
use gw2tp_primitives::{ItemId, TRACKED_ITEMS, TrackedItem};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::{
    runtime::Runtime,
    sync::{Mutex, mpsc},
    task::JoinHandle,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

struct Scheduler {
    commands: mpsc::Sender<SchedulerCommand>,
    task: JoinHandle<()>,
}

/// Everything the REPL commands operate on.
struct App {
    rt: Runtime,
    cycle: Arc<Mutex<RefreshCycle<AnySource>>>,
    last_updated: Label,
    popup: Popup,
    result: Label,
    fee: TradingPostFee,
    retention: TimeDelta,
    scheduler: Option<Scheduler>,
}

fn main() -> Result<()> {
    let config = AppConfig::load();

    let file_appender = tracing_appender::rolling::daily("logs", "gw2tp-cli.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let level = if config.verbose { "debug" } else { "info" };
    let (filter, env_err) = match EnvFilter::try_from_default_env() {
        Ok(f) => (f, None),
        Err(e) => (
            EnvFilter::new(format!(
                "gw2tp_cli={level},gw2tp_core={level},gw2tp_connectivity={level}"
            )),
            Some(e),
        ),
    };
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(filter)
        .init();
    if let Some(e) = env_err {
        warn!(error = %e, "invalid RUST_LOG filter, using default");
    }

    let mut stdout = std::io::stdout();
    writeln!(stdout, "--------------------------------------------------")?;
    writeln!(stdout, " gw2tp v{}", env!("CARGO_PKG_VERSION"))?;
    writeln!(stdout, " Logs redirected to: logs/gw2tp-cli.log")?;
    writeln!(stdout, "--------------------------------------------------")?;

    let app = App::new(&config)?;
    info!(source = app.source_id(), auto_refresh = config.auto_refresh, "started");
    writeln!(stdout, "[*] Price source: {}", app.source_id())?;
    if app.scheduler.is_some() {
        let schedule = config.schedule();
        writeln!(
            stdout,
            "[*] Auto-refresh every {}s",
            schedule.refresh_every.as_secs()
        )?;
    }
    writeln!(stdout, "[*] Type 'help' for commands.")?;

    let mut rl = DefaultEditor::new()?;
    let history_path = PathBuf::from(".gw2tp_history");
    if rl.load_history(&history_path).is_err() {
        // No history exists yet; not an error.
    }

    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                let split_args = match shell_words::split(line) {
                    Ok(args) => args,
                    Err(e) => {
                        writeln!(stdout, "Error parsing command: {e}")?;
                        continue;
                    }
                };

                match ReplCli::try_parse_from(std::iter::once(String::new()).chain(split_args)) {
                    Ok(cli) => {
                        if handle_command(cli.command, &app, &mut stdout)? {
                            break;
                        }
                    }
                    Err(e) => {
                        writeln!(stdout, "{e}")?;
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                writeln!(stdout, "(Ctrl-C) Exiting.")?;
                break;
            }
            Err(ReadlineError::Eof) => {
                writeln!(stdout, "(Ctrl-D) Exiting.")?;
                break;
            }
            Err(err) => {
                writeln!(stdout, "Error: {err:?}")?;
                break;
            }
        }
    }

    let _ = rl.save_history(&history_path);
    app.shutdown();

    Ok(())
}

impl App {
    fn new(config: &AppConfig) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to build tokio runtime")?;
        let fee = config.fee()?;

        let source = if config.offline {
            AnySource::from(FixedPrices::sample_board())
        } else {
            let mut client = CommerceClient::new()?;
            client.set_base_url(&config.api_url);
            AnySource::from(client)
        };

        let last_updated = Label::new();
        let popup = Popup::new();
        let watch = TRACKED_ITEMS.iter().map(|item| item.id).collect();
        let cycle = Arc::new(Mutex::new(RefreshCycle::new(
            source,
            watch,
            LastUpdated::new(last_updated.clone()),
            Notifier::new(popup.clone()),
        )));

        let scheduler = config.auto_refresh.then(|| {
            let (tx, rx) = mpsc::channel(SCHEDULER_CHANNEL_CAPACITY);
            let task = rt.spawn(run_scheduler(Arc::clone(&cycle), config.schedule(), rx));
            Scheduler { commands: tx, task }
        });

        Ok(Self {
            rt,
            cycle,
            last_updated,
            popup,
            result: Label::new(),
            fee,
            retention: config.retention(),
            scheduler,
        })
    }

    fn source_id(&self) -> &'static str {
        self.rt.block_on(async { self.cycle.lock().await.fetcher().id() })
    }

    fn shutdown(self) {
        if let Some(scheduler) = self.scheduler {
            self.rt.block_on(async {
                if scheduler.commands.send(SchedulerCommand::Stop).await.is_err() {
                    warn!("scheduler already stopped");
                }
                if let Err(e) = scheduler.task.await {
                    warn!(error = %e, "scheduler task failed");
                }
            });
        }
        info!("shutdown complete");
    }
}

fn item_name(id: ItemId) -> String {
    TrackedItem::by_id(id).map_or_else(|| format!("Item {id}"), |item| item.name.to_string())
}

fn write_quote(stdout: &mut std::io::Stdout, price: &ItemPrice, fee: TradingPostFee) -> Result<()> {
    writeln!(
        stdout,
        "  {:<34} buy {:>14}  sell {:>14}  flip {:>14}",
        item_name(price.id),
        price.buy.to_string(),
        price.sell.to_string(),
        price.flip_profit(fee).to_string(),
    )?;
    Ok(())
}

/// Handle a parsed REPL command. Returns `true` if the REPL should exit.
#[allow(clippy::too_many_lines)]
fn handle_command(
    command: ReplCommand,
    app: &App,
    stdout: &mut std::io::Stdout,
) -> Result<bool> {
    match command {
        ReplCommand::Profit {
            buy_gold,
            buy_silver,
            buy_copper,
            sell_gold,
            sell_silver,
            sell_copper,
        } => {
            let trade = ManualTrade::new(
                PriceEntry::parse(
                    buy_gold.as_deref(),
                    buy_silver.as_deref(),
                    buy_copper.as_deref(),
                ),
                PriceEntry::parse(
                    sell_gold.as_deref(),
                    sell_silver.as_deref(),
                    sell_copper.as_deref(),
                ),
            );
            let report = calculate_manual_profit(&trade, app.fee, &app.result);
            writeln!(
                stdout,
                "  buy {}  sell {}  after fee {}",
                report.buy_total, report.sell_total, report.sell_after_fee
            )?;
            let color = app.result.color().map(|c| c.to_string()).unwrap_or_default();
            writeln!(stdout, "{} [{color}]", app.result.text())?;
        }
        ReplCommand::Refresh => {
            writeln!(stdout, "[*] Fetching prices...")?;
            let outcome = app.rt.block_on(async {
                app.cycle
                    .lock()
                    .await
                    .refresh_and_cleanup(Utc::now(), app.retention)
                    .await
            });
            match outcome {
                Ok(prices) => {
                    if app.popup.is_visible() {
                        writeln!(stdout, "[+] Prices updated!")?;
                    }
                    for price in &prices {
                        write_quote(stdout, price, app.fee)?;
                    }
                }
                Err(e) => writeln!(stdout, "[!] Refresh failed: {e:#}")?,
            }
        }
        ReplCommand::Price { item } => {
            let cycle = app.rt.block_on(app.cycle.lock());
            let ids = item.map_or_else(|| cycle.watch_list().to_vec(), |id| vec![id]);
            let mut shown = 0usize;
            for id in ids {
                if let Some(snapshot) = cycle.history().latest(id) {
                    write_quote(stdout, &snapshot.price, app.fee)?;
                    shown += 1;
                } else if item.is_some() {
                    writeln!(stdout, "No price for {} yet", item_name(id))?;
                }
            }
            if item.is_none() && shown == 0 {
                writeln!(stdout, "No prices yet. Run 'refresh' first.")?;
            }
        }
        ReplCommand::Status => {
            let cycle = app.rt.block_on(app.cycle.lock());
            let updated = app.last_updated.text();
            writeln!(stdout, "Source:        {}", cycle.fetcher().id())?;
            writeln!(
                stdout,
                "Last updated:  {}",
                if updated.is_empty() { "never" } else { updated.as_str() }
            )?;
            if let Some(at) = app.last_updated.timestamp() {
                writeln!(stdout, "Fetched at:    {}", at.format("%Y-%m-%d %H:%M:%S UTC"))?;
            }
            writeln!(
                stdout,
                "Auto-refresh:  {}",
                if app.scheduler.is_some() { "on" } else { "off" }
            )?;
            writeln!(stdout, "Fee:           {}%", app.fee.percent())?;
            writeln!(stdout, "Watching:      {} items", cycle.watch_list().len())?;
            writeln!(stdout, "History:       {} snapshots", cycle.history().len())?;
        }
        ReplCommand::History { item } => {
            let cycle = app.rt.block_on(app.cycle.lock());
            let day = cycle.history().last_day(item, Utc::now());
            if day.is_empty() {
                writeln!(stdout, "No history for {} in the last 24h", item_name(item))?;
            }
            for snapshot in day {
                writeln!(
                    stdout,
                    "  {}  buy {:>14}  sell {:>14}",
                    snapshot.recorded_at.format("%Y-%m-%d %H:%M:%S"),
                    snapshot.price.buy.to_string(),
                    snapshot.price.sell.to_string(),
                )?;
            }
        }
        ReplCommand::Watch { item } => {
            if app.rt.block_on(app.cycle.lock()).watch(item) {
                writeln!(stdout, "[+] Watching {}", item_name(item))?;
            } else {
                writeln!(stdout, "Already watching {}", item_name(item))?;
            }
        }
        ReplCommand::Unwatch { item } => {
            if app.rt.block_on(app.cycle.lock()).unwatch(item) {
                writeln!(stdout, "[-] Stopped watching {}", item_name(item))?;
            } else {
                writeln!(stdout, "Not watching {}", item_name(item))?;
            }
        }
        ReplCommand::Craft { recipe } => {
            let outcome = app.rt.block_on(async {
                let cycle = app.cycle.lock().await;
                quote_recipe(cycle.fetcher(), recipe, app.fee).await
            });
            match outcome {
                Ok(report) => {
                    writeln!(stdout, "  {recipe}")?;
                    writeln!(
                        stdout,
                        "  cost {}  sell {}  after fee {}",
                        report.cost, report.revenue, report.sell_after_fee
                    )?;
                    if recipe.variants.len() > 1 {
                        writeln!(stdout, "  cheapest ingredient set: #{}", report.variant + 1)?;
                    }
                    writeln!(stdout, "{report}")?;
                    if let Some(flip) = report.flip {
                        writeln!(stdout, "  flip instead: {flip}")?;
                    }
                }
                Err(e) => writeln!(stdout, "[!] Craft failed: {e:#}")?,
            }
        }
        ReplCommand::Quit => {
            writeln!(stdout, "[*] Exiting.")?;
            return Ok(true);
        }
        ReplCommand::Help => {
            print_help(stdout)?;
        }
    }
    Ok(false)
}

fn print_help(stdout: &mut std::io::Stdout) -> Result<()> {
    writeln!(stdout, "Available commands:")?;
    writeln!(
        stdout,
        "  profit [--buy-g N] [--buy-s N] [--buy-c N] [--sell-g N] [--sell-s N] [--sell-c N]"
    )?;
    writeln!(
        stdout,
        "                         Net profit after the Trading Post fee"
    )?;
    writeln!(stdout, "  refresh                Fetch prices for watched items")?;
    writeln!(
        stdout,
        "  price [ITEM]           Latest quote (default: all watched)"
    )?;
    writeln!(stdout, "  history <ITEM>         Quotes from the last 24 hours")?;
    writeln!(stdout, "  watch <ITEM>           Add an item to the watch list")?;
    writeln!(
        stdout,
        "  unwatch <ITEM>         Remove an item from the watch list"
    )?;
    writeln!(stdout, "  craft <RECIPE>         Crafting or forge margin at current prices")?;
    writeln!(stdout, "  status                 Last update, source and history size")?;
    writeln!(stdout, "  quit | exit            Exit")?;
    writeln!(stdout, "  help                   Show this help message")?;
    writeln!(stdout)?;
    writeln!(stdout, "Items are tracked names or numeric ids:")?;
    for item in TRACKED_ITEMS {
        writeln!(stdout, "  {:<22} {}", item.slug, item)?;
    }
    writeln!(stdout)?;
    writeln!(stdout, "Recipes:")?;
    for recipe in RECIPES {
        writeln!(stdout, "  {:<28} {}", recipe.slug, recipe)?;
    }
    Ok(())
}
