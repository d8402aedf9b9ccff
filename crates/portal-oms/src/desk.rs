//! The order desk: instrument search, the order draft and its submission.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use portal_core::{BankAccount, Instrument, OrderForm, ReferenceData, TransactionType};
use portal_notify::NotificationDispatcher;
use portal_telemetry::Metrics;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::error::{OmsError, OmsResult, ValidationFailure};
use crate::pricing::{OrderPricing, OrderQuote};
use crate::submitter::{DynOrderSubmitter, OrderTicket, SubmitOutcome};

#[derive(Debug, Default)]
struct DeskState {
    search_query: String,
    selected_instrument: Option<String>,
    form: OrderForm,
}

/// Clears the busy flag however submission ends.
struct SubmittingGuard<'a>(&'a AtomicBool);

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Order-entry store for one user session.
///
/// Accepts at most one submission at a time. State locks are released
/// before the submitter is awaited, so the draft stays readable while an
/// order is in flight.
pub struct OrderDesk {
    reference: Arc<ReferenceData>,
    submitter: DynOrderSubmitter,
    notifier: NotificationDispatcher,
    state: RwLock<DeskState>,
    submitting: AtomicBool,
}

impl OrderDesk {
    pub fn new(
        reference: Arc<ReferenceData>,
        submitter: DynOrderSubmitter,
        notifier: NotificationDispatcher,
    ) -> Self {
        Self {
            reference,
            submitter,
            notifier,
            state: RwLock::new(DeskState::default()),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn notifier(&self) -> &NotificationDispatcher {
        &self.notifier
    }

    // ---- Search and selection ----

    pub fn set_search_query(&self, query: impl Into<String>) {
        self.state.write().search_query = query.into();
    }

    pub fn search_query(&self) -> String {
        self.state.read().search_query.clone()
    }

    /// Instruments matching the current query; all of them for a blank query.
    pub fn filtered_instruments(&self) -> Vec<Instrument> {
        let query = self.state.read().search_query.clone();
        self.reference
            .instruments
            .search(&query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Select an instrument by id. The draft is left as is.
    pub fn select_instrument(&self, id: &str) -> OmsResult<Instrument> {
        let instrument = self
            .reference
            .instruments
            .find(id)
            .cloned()
            .ok_or_else(|| OmsError::UnknownInstrument(id.to_string()))?;
        self.state.write().selected_instrument = Some(instrument.id.clone());
        debug!(instrument = %instrument.id, ticker = %instrument.ticker, "Instrument selected");
        Ok(instrument)
    }

    pub fn clear_selected_instrument(&self) {
        self.state.write().selected_instrument = None;
    }

    pub fn selected_instrument(&self) -> Option<Instrument> {
        let state = self.state.read();
        self.instrument_for(&state).cloned()
    }

    // ---- Draft ----

    /// Snapshot of the current draft.
    pub fn form(&self) -> OrderForm {
        self.state.read().form.clone()
    }

    /// Replace the draft with `f(draft)`.
    pub fn edit_form(&self, f: impl FnOnce(OrderForm) -> OrderForm) {
        let mut state = self.state.write();
        let current = std::mem::take(&mut state.form);
        state.form = f(current);
    }

    pub fn set_transaction_type(&self, transaction_type: TransactionType) {
        self.edit_form(|form| form.with_transaction_type(transaction_type));
    }

    pub fn reset_order_form(&self) {
        self.state.write().form = OrderForm::new();
    }

    /// Funding account named by the draft, if it exists.
    pub fn selected_bank_account(&self) -> Option<BankAccount> {
        let state = self.state.read();
        self.account_for(&state).cloned()
    }

    /// Run `f` against a pricing view of the current draft.
    pub fn pricing<R>(&self, f: impl FnOnce(&OrderPricing<'_>) -> R) -> R {
        let state = self.state.read();
        let pricing = OrderPricing::new(
            &state.form,
            self.instrument_for(&state),
            self.account_for(&state),
            &self.reference.fx_rates,
        );
        f(&pricing)
    }

    pub fn quote(&self) -> OrderQuote {
        self.pricing(|p| p.quote())
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    // ---- Submission ----

    /// Validate, submit and report the current draft.
    ///
    /// Every path except [`OmsError::SubmissionInFlight`] emits exactly one
    /// notification. The draft is reset only when the order is accepted.
    pub async fn submit_order(&self) -> OmsResult<OrderTicket> {
        if self.is_submitting() {
            Metrics::order_submission("busy");
            return Err(OmsError::SubmissionInFlight);
        }

        let ticket = match self.prepare_ticket() {
            Ok(ticket) => ticket,
            Err(failure) => {
                warn!(reason = %failure, "Order validation failed");
                Metrics::order_submission("invalid");
                self.notifier
                    .error("Order Validation Failed", "Please fill in all required fields.");
                return Err(failure.into());
            }
        };

        if self
            .submitting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            Metrics::order_submission("busy");
            return Err(OmsError::SubmissionInFlight);
        }
        let _busy = SubmittingGuard(&self.submitting);

        let tx_label = ticket.form.transaction_type.as_str().to_uppercase();
        info!(
            ticker = %ticket.ticker,
            transaction_type = %ticket.form.transaction_type,
            order_type = %ticket.form.order_type,
            total = %ticket.total,
            currency = %ticket.currency,
            "Submitting order"
        );

        let started = Instant::now();
        let result = self.submitter.submit(ticket.clone()).await;
        Metrics::order_submit_latency(
            ticket.form.transaction_type.as_str(),
            started.elapsed().as_secs_f64() * 1000.0,
        );

        match result {
            Ok(SubmitOutcome::Accepted) => {
                self.notifier.success(
                    "Order Placed Successfully",
                    format!(
                        "{} {} order for {} placed at {} {}.",
                        tx_label,
                        ticket.form.order_type,
                        ticket.ticker,
                        ticket.currency,
                        ticket.total.grouped(0)
                    ),
                );
                self.reset_order_form();
                Metrics::order_submission("placed");
                info!(ticker = %ticket.ticker, "Order placed");
                Ok(ticket)
            }
            Ok(SubmitOutcome::Rejected) => {
                self.notifier.error(
                    "Order Failed",
                    format!(
                        "Failed to place {} order for {}. Please try again.",
                        tx_label, ticket.ticker
                    ),
                );
                Metrics::order_submission("rejected");
                warn!(ticker = %ticket.ticker, "Order rejected");
                Err(OmsError::Rejected {
                    ticker: ticket.ticker,
                })
            }
            Err(e) => {
                self.notifier.error(
                    "Order Error",
                    "An unexpected error occurred while placing the order.",
                );
                Metrics::order_submission("error");
                warn!(ticker = %ticket.ticker, error = %e, "Order submission errored");
                Err(e.into())
            }
        }
    }

    /// Check the entry guard and freeze the draft into a ticket.
    fn prepare_ticket(&self) -> Result<OrderTicket, ValidationFailure> {
        let state = self.state.read();
        let instrument = self
            .instrument_for(&state)
            .ok_or(ValidationFailure::NoInstrument)?;
        let account = self
            .account_for(&state)
            .ok_or(ValidationFailure::NoBankAccount)?;
        if !state
            .form
            .driving_input()
            .is_some_and(|v| v > Decimal::ZERO)
        {
            return Err(ValidationFailure::NoOrderSize);
        }

        let pricing = OrderPricing::new(
            &state.form,
            Some(instrument),
            Some(account),
            &self.reference.fx_rates,
        );
        let total = pricing.total_amount();
        if !total.is_positive() {
            return Err(ValidationFailure::ZeroTotal);
        }

        Ok(OrderTicket {
            instrument_id: instrument.id.clone(),
            ticker: instrument.ticker.clone(),
            currency: instrument.currency,
            bank_account_id: account.id.clone(),
            effective_price: pricing.effective_price(),
            quantity: pricing.order_quantity(),
            total,
            form: state.form.clone(),
        })
    }

    fn instrument_for<'s>(&'s self, state: &DeskState) -> Option<&'s Instrument> {
        state
            .selected_instrument
            .as_deref()
            .and_then(|id| self.reference.instruments.find(id))
    }

    fn account_for<'s>(&'s self, state: &DeskState) -> Option<&'s BankAccount> {
        state
            .form
            .bank_account_id
            .as_deref()
            .and_then(|id| self.reference.bank_accounts.find(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submitter::{MockSubmitter, SubmitError};
    use portal_core::{OrderBy, OrderType};
    use portal_notify::{NotificationBus, NotificationInbox, NotificationKind};
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn desk_with(mock: Arc<MockSubmitter>) -> OrderDesk {
        let notifier = NotificationDispatcher::new(
            "oms",
            NotificationBus::default(),
            NotificationInbox::default(),
        );
        OrderDesk::new(Arc::new(ReferenceData::demo()), mock, notifier)
    }

    fn filled_desk(mock: Arc<MockSubmitter>) -> OrderDesk {
        let desk = desk_with(mock);
        desk.select_instrument("INS001").unwrap();
        desk.edit_form(|f| f.with_bank_account("BA001").with_quantity(dec!(45)));
        desk
    }

    fn latest(desk: &OrderDesk) -> portal_notify::MfeNotification {
        desk.notifier().inbox().latest().unwrap().detail
    }

    #[test]
    fn test_search_filters_case_insensitively() {
        let desk = desk_with(Arc::new(MockSubmitter::new()));
        assert_eq!(desk.filtered_instruments().len(), 14);

        desk.set_search_query("aApL");
        let hits = desk.filtered_instruments();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].ticker, "AAPL");

        desk.set_search_query("government bond");
        assert_eq!(desk.filtered_instruments().len(), 2);

        desk.set_search_query("   ");
        assert_eq!(desk.filtered_instruments().len(), 14);
    }

    #[test]
    fn test_select_unknown_instrument() {
        let desk = desk_with(Arc::new(MockSubmitter::new()));
        assert!(matches!(
            desk.select_instrument("NOPE"),
            Err(OmsError::UnknownInstrument(_))
        ));
        assert!(desk.selected_instrument().is_none());

        desk.select_instrument("INS007").unwrap();
        assert_eq!(desk.selected_instrument().unwrap().ticker, "SAP");
        desk.clear_selected_instrument();
        assert!(desk.selected_instrument().is_none());
    }

    #[test]
    fn test_transaction_type_switch_resets_schedule() {
        let desk = desk_with(Arc::new(MockSubmitter::new()));
        desk.edit_form(|f| f.with_order_type(OrderType::Limit));
        desk.set_transaction_type(TransactionType::Sip);
        desk.edit_form(|mut f| {
            f.tenure = "12".to_string();
            f.place_first_order_today = true;
            f
        });
        assert_eq!(desk.form().order_type, OrderType::Market);

        desk.set_transaction_type(TransactionType::Sell);
        let form = desk.form();
        assert!(form.tenure.is_empty());
        assert!(!form.place_first_order_today);
    }

    #[test]
    fn test_quote_uses_selected_account() {
        let desk = filled_desk(Arc::new(MockSubmitter::new()));
        desk.edit_form(|f| f.with_bank_account("BA002"));
        assert_eq!(desk.selected_bank_account().unwrap().id, "BA002");

        let quote = desk.quote();
        assert_eq!(quote.total_amount.inner(), dec!(8542.80));
        assert_eq!(quote.total_in_account_currency.unwrap().inner(), dec!(7859.06));
    }

    #[tokio::test]
    async fn test_validation_failure_notifies_without_submitting() {
        let mock = Arc::new(MockSubmitter::new());
        let desk = desk_with(mock.clone());
        desk.select_instrument("INS001").unwrap();
        desk.edit_form(|f| f.with_quantity(dec!(10)));

        let err = desk.submit_order().await.unwrap_err();
        assert!(matches!(
            err,
            OmsError::Validation(ValidationFailure::NoBankAccount)
        ));
        assert!(!desk.is_submitting());
        assert!(mock.tickets().is_empty());

        let n = latest(&desk);
        assert_eq!(n.kind, NotificationKind::Error);
        assert_eq!(n.title, "Order Validation Failed");
        assert_eq!(n.message, "Please fill in all required fields.");
    }

    #[tokio::test]
    async fn test_validation_order_of_checks() {
        let desk = desk_with(Arc::new(MockSubmitter::new()));
        assert!(matches!(
            desk.submit_order().await,
            Err(OmsError::Validation(ValidationFailure::NoInstrument))
        ));

        desk.select_instrument("INS001").unwrap();
        desk.edit_form(|f| f.with_bank_account("BA001").with_order_by(OrderBy::Amount).with_quantity(dec!(5)));
        assert!(matches!(
            desk.submit_order().await,
            Err(OmsError::Validation(ValidationFailure::NoOrderSize))
        ));
        assert_eq!(desk.notifier().inbox().len(), 2);
    }

    #[tokio::test]
    async fn test_overflowing_quantity_is_rejected_as_zero_total() {
        let mock = Arc::new(MockSubmitter::new());
        let desk = filled_desk(mock.clone());
        desk.edit_form(|f| f.with_quantity(rust_decimal::Decimal::MAX));

        assert!(desk.quote().total_amount.is_zero());
        assert!(matches!(
            desk.submit_order().await,
            Err(OmsError::Validation(ValidationFailure::ZeroTotal))
        ));
        assert!(mock.tickets().is_empty());
        assert!(!desk.is_submitting());
    }

    #[tokio::test]
    async fn test_accepted_order_resets_form() {
        let mock = Arc::new(MockSubmitter::new());
        let desk = filled_desk(mock.clone());

        let ticket = desk.submit_order().await.unwrap();
        assert_eq!(ticket.total.inner(), dec!(8542.80));
        assert_eq!(ticket.bank_account_id, "BA001");
        assert_eq!(mock.tickets().len(), 1);

        assert_eq!(desk.form(), OrderForm::new());
        assert!(!desk.is_submitting());

        let n = latest(&desk);
        assert_eq!(n.kind, NotificationKind::Success);
        assert_eq!(n.title, "Order Placed Successfully");
        assert_eq!(n.message, "BUY MKT order for AAPL placed at USD 8,542.8.");
    }

    #[tokio::test]
    async fn test_rejected_order_keeps_form() {
        let mock = Arc::new(MockSubmitter::new());
        mock.set_next_result(Ok(SubmitOutcome::Rejected));
        let desk = filled_desk(mock);
        let before = desk.form();

        let err = desk.submit_order().await.unwrap_err();
        assert!(matches!(err, OmsError::Rejected { ref ticker } if ticker == "AAPL"));
        assert_eq!(desk.form(), before);
        assert!(!desk.is_submitting());

        let n = latest(&desk);
        assert_eq!(n.title, "Order Failed");
        assert_eq!(n.message, "Failed to place BUY order for AAPL. Please try again.");
    }

    #[tokio::test]
    async fn test_transport_error_keeps_form() {
        let mock = Arc::new(MockSubmitter::new());
        mock.set_next_result(Err(SubmitError::Transport("reset".to_string())));
        let desk = filled_desk(mock);
        let before = desk.form();

        assert!(matches!(
            desk.submit_order().await,
            Err(OmsError::Submit(_))
        ));
        assert_eq!(desk.form(), before);
        assert!(!desk.is_submitting());
        assert_eq!(latest(&desk).title, "Order Error");
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_submit_is_refused() {
        let mock = Arc::new(MockSubmitter::new());
        mock.set_delay(Duration::from_millis(1200));
        let desk = Arc::new(filled_desk(mock.clone()));

        let first = tokio::spawn({
            let desk = desk.clone();
            async move { desk.submit_order().await }
        });
        while mock.in_flight() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(desk.is_submitting());

        let inbox_before = desk.notifier().inbox().len();
        assert!(matches!(
            desk.submit_order().await,
            Err(OmsError::SubmissionInFlight)
        ));
        assert_eq!(desk.notifier().inbox().len(), inbox_before);

        first.await.unwrap().unwrap();
        assert!(!desk.is_submitting());
        assert_eq!(mock.tickets().len(), 1);
    }

    #[tokio::test]
    async fn test_limit_order_message_uses_limit_total() {
        let desk = desk_with(Arc::new(MockSubmitter::new()));
        desk.select_instrument("INS007").unwrap();
        desk.edit_form(|f| {
            f.with_bank_account("BA002")
                .with_order_type(OrderType::Limit)
                .with_limit_price(dec!(180))
                .with_quantity(dec!(100))
        });

        let ticket = desk.submit_order().await.unwrap();
        assert_eq!(ticket.effective_price.inner(), dec!(180));
        assert_eq!(
            latest(&desk).message,
            "BUY LMT order for SAP placed at EUR 18,000."
        );
    }
}
