//! Host shell orchestration.
//!
//! Wires the pieces a portal session needs:
//! - Reference data (file or built-in demo)
//! - Notification bus with the host listener and host inbox
//! - Order desk backed by the simulated submitter
//! - Module registry probing

use std::io::Write;
use std::sync::Arc;

use portal_core::{format_grouped, format_percent, CustomerPortfolio, ReferenceData};
use portal_notify::{
    run_host_listener, NotificationBus, NotificationDispatcher, NotificationInbox,
};
use portal_oms::{DynOrderSubmitter, OmsError, OrderDesk, SimulatedSubmitter};
use portal_registry::{ModuleProbe, ModuleRegistry};
use portal_telemetry::Metrics;
use tracing::{info, warn};

use crate::cli::{Command, OrderArgs};
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

/// Main application.
pub struct Application {
    config: AppConfig,
    bus: NotificationBus,
    host_inbox: NotificationInbox,
    desk: OrderDesk,
}

impl Application {
    /// Create an application backed by the simulated submitter.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let submitter: DynOrderSubmitter =
            Arc::new(SimulatedSubmitter::from_config(&config.submission));
        Self::with_submitter(config, submitter)
    }

    /// Create an application with an explicit order backend.
    pub fn with_submitter(config: AppConfig, submitter: DynOrderSubmitter) -> AppResult<Self> {
        config.validate()?;

        let reference = match &config.reference_data {
            Some(path) => {
                info!(path = %path.display(), "Loading reference data");
                ReferenceData::from_file(path)?
            }
            None => ReferenceData::demo(),
        };
        info!(
            instruments = reference.instruments.len(),
            bank_accounts = reference.bank_accounts.len(),
            currencies = reference.fx_rates.len(),
            "Reference data ready"
        );

        let bus = NotificationBus::new(config.notifications.bus_capacity);
        let host_inbox = NotificationInbox::new(config.notifications.inbox_capacity);
        let oms_inbox = NotificationInbox::new(config.notifications.inbox_capacity);
        let notifier = NotificationDispatcher::new(config.source.clone(), bus.clone(), oms_inbox);
        let desk = OrderDesk::new(Arc::new(reference), submitter, notifier);

        Ok(Self {
            config,
            bus,
            host_inbox,
            desk,
        })
    }

    pub fn desk(&self) -> &OrderDesk {
        &self.desk
    }

    /// Run one command, writing its report to stdout.
    ///
    /// The report is buffered and written once the command has finished.
    /// JSON logs share stdout, so the stdout lock must not be held while
    /// the host listener is still logging.
    pub async fn run(self, command: Command) -> AppResult<()> {
        let mut report = Vec::new();
        let result = self.run_with_output(command, &mut report).await;
        std::io::stdout().lock().write_all(&report)?;
        result
    }

    /// Run one command, writing its report to `out`.
    ///
    /// The host listener runs for the whole command and is drained before
    /// the host inbox is reported, so every notification the command emitted
    /// is shown.
    pub async fn run_with_output(self, command: Command, out: &mut impl Write) -> AppResult<()> {
        let Self {
            config,
            bus,
            host_inbox,
            desk,
        } = self;

        let listener = tokio::spawn(run_host_listener(bus.subscribe(), host_inbox.clone()));

        let result = match &command {
            Command::Instruments { query } => list_instruments(&desk, query.as_deref(), out),
            Command::Quote(args) => quote(&desk, args, out),
            Command::Submit(args) => submit(&desk, args, out).await,
            Command::Modules => list_modules(&config, out).await,
            Command::Portfolio => show_portfolio(out),
            Command::Metrics => Ok(()),
        };

        // Dropping every sender closes the bus and ends the listener.
        drop(desk);
        drop(bus);
        listener
            .await
            .map_err(|e| AppError::Task(format!("host listener: {e}")))?;

        if !host_inbox.is_empty() {
            writeln!(out, "\nNotifications ({} unread):", host_inbox.unread_count())?;
            for item in host_inbox.items() {
                writeln!(out, "  {}", item.detail)?;
            }
        }
        if matches!(command, Command::Metrics) {
            Metrics::inbox_unread(host_inbox.unread_count());
            write!(out, "{}", Metrics::gather_text()?)?;
        }
        result
    }
}

fn list_instruments(desk: &OrderDesk, query: Option<&str>, out: &mut impl Write) -> AppResult<()> {
    if let Some(query) = query {
        desk.set_search_query(query);
    }
    let instruments = desk.filtered_instruments();
    for ins in &instruments {
        writeln!(
            out,
            "{:<7} {:<9} {:<40} {:<13} {:<17} {} {:>10} {}",
            ins.id,
            ins.ticker,
            ins.name,
            ins.asset_type,
            ins.sub_asset_type,
            ins.currency,
            format_grouped(ins.price.inner(), 2),
            ins.exchange
        )?;
    }
    writeln!(out, "{} instrument(s)", instruments.len())?;
    Ok(())
}

fn prepare(desk: &OrderDesk, args: &OrderArgs) -> AppResult<()> {
    desk.select_instrument(&args.instrument)?;
    if let Some(account) = &args.account {
        if desk.reference().bank_accounts.find(account).is_none() {
            return Err(OmsError::UnknownBankAccount(account.clone()).into());
        }
    }
    desk.edit_form(|form| args.apply(form));
    Ok(())
}

fn quote(desk: &OrderDesk, args: &OrderArgs, out: &mut impl Write) -> AppResult<()> {
    prepare(desk, args)?;
    let quote = desk.quote();
    writeln!(out, "{}", serde_json::to_string_pretty(&quote)?)?;
    if quote.needs_fx() {
        if let (Some(rate), Some(account_ccy), Some(instrument_ccy)) = (
            quote.fx_rate,
            quote.account_currency,
            quote.instrument_currency,
        ) {
            write!(out, "FX 1 {account_ccy} = {rate} {instrument_ccy}")?;
            match quote.total_in_account_currency {
                Some(total) => writeln!(out, ", debit {account_ccy} {}", total.grouped(2))?,
                None => writeln!(out)?,
            }
        }
    }
    Ok(())
}

async fn submit(desk: &OrderDesk, args: &OrderArgs, out: &mut impl Write) -> AppResult<()> {
    prepare(desk, args)?;
    match desk.submit_order().await {
        Ok(ticket) => {
            writeln!(
                out,
                "Order placed: {} {} {} {}",
                ticket.form.transaction_type.as_str().to_uppercase(),
                ticket.ticker,
                ticket.currency,
                ticket.total.grouped(2)
            )?;
            Ok(())
        }
        Err(e) => {
            writeln!(out, "Order not placed: {e}")?;
            Err(e.into())
        }
    }
}

async fn list_modules(config: &AppConfig, out: &mut impl Write) -> AppResult<()> {
    let probe = ModuleProbe::new(config.host_origin.clone())?;
    let registry = match ModuleRegistry::from_file(&config.modules_manifest, &probe).await {
        Ok(registry) => registry,
        Err(e) => {
            warn!(error = %e, "Module manifest unavailable, continuing with no modules");
            ModuleRegistry::default()
        }
    };

    for entry in registry.modules() {
        writeln!(
            out,
            "{:<12} {:<14} {:<24} {}",
            entry.module.id,
            entry.module.path,
            entry.module.label,
            if entry.available { "available" } else { "unavailable" }
        )?;
    }
    writeln!(
        out,
        "{} of {} module(s) available",
        registry.available().len(),
        registry.modules().len()
    )?;
    Ok(())
}

fn show_portfolio(out: &mut impl Write) -> AppResult<()> {
    let portfolio = CustomerPortfolio::demo();
    writeln!(
        out,
        "{} ({})  total {}  cash {}  invested {}  day {}",
        portfolio.customer_name,
        portfolio.customer_id,
        format_grouped(portfolio.total_value, 2),
        format_grouped(portfolio.cash_balance, 2),
        format_grouped(portfolio.invested_value, 2),
        format_percent(portfolio.day_change_percent)
    )?;
    for h in &portfolio.holdings {
        writeln!(
            out,
            "  {:<6} {:<24} {:>6} @ {:>9}  {:>12}  {}",
            h.symbol,
            h.name,
            h.quantity,
            format_grouped(h.price, 2),
            h.market_value().grouped(2),
            format_percent(h.change_percent)
        )?;
    }
    Ok(())
}
