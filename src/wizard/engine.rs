use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, instrument, warn, Instrument};

use super::error::WizardError;
use super::session::{Prompt, Session};
use super::state::{Decision, Step, WizardKind};
use super::validate::Input;
use crate::clients::{CatalogClient, OrderClient, PlacedOrder};
use crate::domain::{Product, ProductId, UserId};

/// Per-user session slot. Holding the inner lock is what serializes one
/// user's operations; different users never contend on it.
type Slot = Arc<tokio::sync::Mutex<Option<Session>>>;

/// How a confirmation step ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Published(Product),
    Submitted(PlacedOrder),
    Cancelled,
}

/// Drives the product and order wizards for every user.
#[derive(Clone)]
pub struct ConversationEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    slots: Mutex<HashMap<UserId, Slot>>,
    catalog: CatalogClient,
    orders: OrderClient,
    idle_timeout: Duration,
}

impl ConversationEngine {
    pub fn new(catalog: CatalogClient, orders: OrderClient, idle_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                slots: Mutex::new(HashMap::new()),
                catalog,
                orders,
                idle_timeout,
            }),
        }
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<UserId, Slot>> {
        self.inner.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot_or_insert(&self, user_id: UserId) -> Slot {
        self.slots().entry(user_id).or_default().clone()
    }

    fn existing_slot(&self, user_id: UserId) -> Option<Slot> {
        self.slots().get(&user_id).cloned()
    }

    /// Opens a wizard for `user_id` and returns its first prompt.
    ///
    /// # Errors
    /// `SessionConflict` if the user already has a wizard open. For order
    /// wizards, `ProductNotFound` / `InsufficientStock` when the product
    /// cannot be ordered.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn start(&self, user_id: UserId, kind: WizardKind) -> Result<Prompt, WizardError> {
        let slot = self.slot_or_insert(user_id);
        let mut guard = slot.lock().await;
        if guard.is_some() {
            warn!("Wizard already running");
            return Err(WizardError::SessionConflict);
        }
        if let WizardKind::Order { product_id } = &kind {
            self.ensure_orderable(product_id).await?;
        }

        let session = Session::new(user_id, kind, Instant::now());
        let prompt = session.prompt();
        *guard = Some(session);
        info!("Wizard started");
        Ok(prompt)
    }

    /// An unknown product surfaces as `ProductNotFound` through the catalog error.
    async fn ensure_orderable(&self, product_id: &ProductId) -> Result<(), WizardError> {
        match self.inner.catalog.check_stock(product_id.clone()).await? {
            0 => Err(WizardError::InsufficientStock),
            _ => Ok(()),
        }
    }

    /// Feeds one answer into the user's wizard.
    ///
    /// # Errors
    /// `NoActiveSession` without a wizard; `InvalidInput` when the validator
    /// rejects the answer, in which case the session is left as it was.
    #[instrument(skip(self, input), fields(user_id = %user_id))]
    pub async fn advance(&self, user_id: UserId, input: Input) -> Result<Prompt, WizardError> {
        let slot = self.existing_slot(user_id).ok_or(WizardError::NoActiveSession)?;
        let mut guard = slot.lock().await;
        let session = guard.as_mut().ok_or(WizardError::NoActiveSession)?;

        session.touch(Instant::now());
        match session.apply(&input) {
            Ok(step) => {
                debug!(?step, "Wizard advanced");
                Ok(session.prompt())
            }
            Err(e) => {
                debug!(error = %e, "Input rejected");
                Err(e)
            }
        }
    }

    /// Resolves the confirmation step. The session is gone afterwards,
    /// whether the store call succeeded or not.
    ///
    /// # Errors
    /// `NoActiveSession` without a wizard, `InvalidInput` before the last
    /// field is answered, `InsufficientStock` when the product sold out in
    /// the meantime.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn confirm(&self, user_id: UserId, decision: Decision) -> Result<Completion, WizardError> {
        let slot = self.existing_slot(user_id).ok_or(WizardError::NoActiveSession)?;
        let mut guard = slot.lock().await;
        match guard.as_ref().map(Session::step) {
            None => return Err(WizardError::NoActiveSession),
            Some(Step::Field(field)) => {
                return Err(WizardError::InvalidInput(format!(
                    "Please answer the {} question first",
                    field.label().to_lowercase()
                )));
            }
            Some(Step::Confirm) => {}
        }
        let Some(session) = guard.take() else {
            return Err(WizardError::NoActiveSession);
        };

        match decision {
            Decision::Reject => {
                info!("Wizard cancelled at confirmation");
                Ok(Completion::Cancelled)
            }
            Decision::Accept => {
                let result = self.commit(session).await;
                if let Err(e) = &result {
                    warn!(error = %e, "Wizard confirmation failed, session discarded");
                }
                result
            }
        }
    }

    async fn commit(&self, session: Session) -> Result<Completion, WizardError> {
        match session.kind() {
            WizardKind::Product => {
                let params = session.collected().to_product_params()?;
                let product = self.inner.catalog.create_product(params).await?;
                info!(product_id = %product.id, "Product wizard completed");
                Ok(Completion::Published(product))
            }
            WizardKind::Order { .. } => {
                let params = session
                    .collected()
                    .to_order_params(session.user_id(), session.kind())?;
                let placed = self.inner.orders.place_order(params).await?;
                info!(order_id = %placed.order.id, "Order wizard completed");
                Ok(Completion::Submitted(placed))
            }
        }
    }

    /// Drops the user's wizard, if any. Returns whether one was running.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn cancel(&self, user_id: UserId) -> bool {
        let Some(slot) = self.existing_slot(user_id) else {
            return false;
        };
        let cancelled = slot.lock().await.take().is_some();
        if cancelled {
            info!("Wizard cancelled");
        }
        cancelled
    }

    #[cfg(test)]
    pub async fn has_session(&self, user_id: UserId) -> bool {
        match self.existing_slot(user_id) {
            Some(slot) => slot.lock().await.is_some(),
            None => false,
        }
    }

    /// Number of slots currently tracked, including empty ones not yet reclaimed.
    #[cfg(test)]
    pub fn tracked_users(&self) -> usize {
        self.slots().len()
    }

    /// Destroys every session idle for at least the configured timeout.
    /// Each slot is locked like any other operation, so an in-flight
    /// `advance` finishes (and refreshes activity) before it is inspected.
    pub async fn sweep_idle(&self, now: Instant) -> usize {
        let snapshot: Vec<(UserId, Slot)> = self
            .slots()
            .iter()
            .map(|(user_id, slot)| (*user_id, Arc::clone(slot)))
            .collect();

        let mut expired = 0;
        for (user_id, slot) in snapshot {
            let mut guard = slot.lock().await;
            if guard
                .as_ref()
                .is_some_and(|session| session.is_idle(now, self.inner.idle_timeout))
            {
                if let Some(session) = guard.take() {
                    info!(
                        %user_id,
                        age_secs = now.saturating_duration_since(session.started_at()).as_secs(),
                        "Idle session expired"
                    );
                }
                expired += 1;
            }
        }

        // An empty slot nobody else holds can go: new holders clone under this lock.
        self.slots().retain(|_, slot| {
            Arc::strong_count(slot) > 1 || slot.try_lock().map_or(true, |session| session.is_some())
        });
        expired
    }
}

/// Runs [`ConversationEngine::sweep_idle`] every `every` until `shutdown` fires.
pub fn spawn_idle_sweeper(
    engine: ConversationEngine,
    every: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(
        async move {
            info!(interval_secs = every.as_secs(), "Session sweeper starting");
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        let expired = engine.sweep_idle(Instant::now()).await;
                        if expired > 0 {
                            info!(expired, "Idle sessions swept");
                        }
                    }
                }
            }
            info!("Session sweeper stopped");
        }
        .instrument(info_span!("session_sweeper")),
    )
}
