//! The per-user conversation state machine.

use std::collections::HashMap;
use std::sync::Arc;

use common::UserId;
use dispatch::{NotificationEvent, Party};
use domain::ServiceCatalog;
use store::Store;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::action::{Action, Command, InboundEvent, Input};
use crate::error::EngineError;
use crate::lexicon;
use crate::referral;
use crate::reply::{Outcome, Reply};
use crate::screens::{self, MenuLinks};
use crate::session::{ConversationSession, DialogueState};

/// Orders per page in the client's own order list.
pub const CLIENT_ORDERS_PAGE_SIZE: usize = 3;

/// Referrals per page on the referral screen.
pub const REFERRALS_PAGE_SIZE: usize = 10;

pub const DEFAULT_ADMIN_PAGE_SIZE: usize = 5;

pub const DEFAULT_BOT_USERNAME: &str = "order_intake_bot";

pub(crate) type Step = Result<(), EngineError>;

/// Presentation settings of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Bot handle used in referral deep links.
    pub bot_username: String,
    pub admin_page_size: usize,
    pub links: MenuLinks,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            bot_username: DEFAULT_BOT_USERNAME.to_string(),
            admin_page_size: DEFAULT_ADMIN_PAGE_SIZE,
            links: MenuLinks::default(),
        }
    }
}

/// One event being handled: the actor, their locked session and what has
/// been produced so far.
pub(crate) struct Turn {
    pub user: UserId,
    pub session: OwnedMutexGuard<ConversationSession>,
    pub out: Outcome,
}

impl Turn {
    pub fn reply(&mut self, reply: Reply) {
        self.out.push(reply);
    }

    /// Acknowledges a button that does not apply to the current state.
    pub fn stale(&mut self) {
        tracing::debug!(state = %self.session.state, "stale button ignored");
        self.out.push(Reply::alert(lexicon::STALE_BUTTON));
    }
}

/// Drives every user's dialogue.
///
/// Events of one user are handled strictly one after another; events of
/// different users run in parallel. The engine performs no I/O besides the
/// store: notifications are returned in the [`Outcome`] for the caller to
/// deliver once the event has been handled.
pub struct ConversationEngine<S: Store> {
    pub(crate) store: S,
    pub(crate) catalog: Arc<ServiceCatalog>,
    pub(crate) settings: EngineSettings,
    sessions: Mutex<HashMap<UserId, Arc<Mutex<ConversationSession>>>>,
}

impl<S: Store> ConversationEngine<S> {
    pub fn new(store: S, catalog: Arc<ServiceCatalog>, settings: EngineSettings) -> Self {
        Self {
            store,
            catalog,
            settings,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Current dialogue state of `user`; `Idle` for users never seen.
    pub async fn state_of(&self, user: UserId) -> DialogueState {
        self.session_of(user).await.state
    }

    /// Snapshot of the session of `user`.
    pub async fn session_of(&self, user: UserId) -> ConversationSession {
        let session = self.sessions.lock().await.get(&user).cloned();
        match session {
            Some(session) => session.lock().await.clone(),
            None => ConversationSession::default(),
        }
    }

    async fn session(&self, user: UserId) -> Arc<Mutex<ConversationSession>> {
        self.sessions
            .lock()
            .await
            .entry(user)
            .or_default()
            .clone()
    }

    /// Handles one inbound event.
    ///
    /// Never fails: malformed input, stale buttons and denied actions all
    /// produce a reply, and a dialogue that cannot continue is aborted with
    /// an apology.
    #[tracing::instrument(
        skip(self, event),
        fields(user_id = %event.source_user_id, kind = ?event.kind)
    )]
    pub async fn handle(&self, event: InboundEvent) -> Outcome {
        let user = event.source_user_id;
        let input = event.input();

        let referrer = match &input {
            Input::Command(Command::Start(Some(token))) => referral::decode_token(token),
            _ => None,
        };
        let mut out = Outcome::default();
        let display_name = event.sender_display_name;
        if let Some(referrer_id) = self
            .store
            .register_user(user, display_name.clone(), referrer)
            .await
        {
            out.notify(NotificationEvent::NewReferral {
                referrer_id,
                referral: Party {
                    id: user,
                    display_name,
                },
            });
        }

        let session = self.session(user).await.lock_owned().await;
        let mut turn = Turn { user, session, out };
        let result = match input {
            Input::Command(command) => self.on_command(&mut turn, command).await,
            Input::Button(action) => self.on_button(&mut turn, action).await,
            Input::Text(text) => self.on_text(&mut turn, text).await,
        };
        if let Err(err) = result {
            Self::abort(&mut turn, err);
        }

        tracing::debug!(
            state = %turn.session.state,
            replies = turn.out.replies.len(),
            notifications = turn.out.notifications.len(),
            "event handled"
        );
        turn.out
    }

    fn abort(turn: &mut Turn, err: EngineError) {
        tracing::error!(state = %turn.session.state, error = %err, "dialogue aborted");
        let text = match err {
            EngineError::Configuration(_) => lexicon::CONFIGURATION_APOLOGY,
            EngineError::Store(_) => lexicon::STORE_APOLOGY,
        };
        turn.session.reset();
        turn.reply(Reply::text(text));
    }

    async fn on_command(&self, turn: &mut Turn, command: Command) -> Step {
        match command {
            Command::Start(_) | Command::Menu => self.show_main_menu(turn).await,
            Command::Task => self.start_intake(turn),
            Command::Cases => self.show_my_cases(turn, 1).await,
            Command::Referral => self.show_referrals(turn, 1).await,
            Command::Admin => self.show_admin_menu(turn).await,
            Command::GrantAdmin(target) => self.begin_grant(turn, target).await,
            Command::Cancel => {
                Self::cancel(turn);
                Ok(())
            }
            Command::Unknown(name) => {
                tracing::debug!(command = %name, "unknown command");
                turn.reply(Reply::text(lexicon::IDLE_HINT));
                Ok(())
            }
        }
    }

    async fn on_button(&self, turn: &mut Turn, action: Action) -> Step {
        match action {
            Action::BackToMainMenu => self.show_main_menu(turn).await,
            Action::MenuCreateTask => self.start_intake(turn),
            Action::MenuMyCases => self.show_my_cases(turn, 1).await,
            Action::OrdersPage(page) => self.show_my_cases(turn, page).await,
            Action::MenuReferral => self.show_referrals(turn, 1).await,
            Action::ReferralPage(page) => self.show_referrals(turn, page).await,
            Action::SelectService(key) => self.select_service(turn, &key),
            Action::SelectSubService(key) => self.select_sub_service(turn, &key),
            Action::Back => self.back(turn).await,
            Action::MenuAdmin => self.show_admin_menu(turn).await,
            Action::AdminListUsers => self.show_user_list(turn).await,
            Action::AdminAllOrders => self.show_order_list(turn, None, 1).await,
            Action::AdminFilter(filter) => self.show_order_list(turn, filter, 1).await,
            Action::AdminOrdersPage(page) => {
                let filter = turn.session.listing.filter.clone();
                self.show_order_list(turn, filter, page).await
            }
            Action::ViewOrderAdmin(order_id) => self.view_order(turn, &order_id).await,
            Action::ManageStatus(order_id) => self.manage_status(turn, order_id).await,
            Action::SetStatus(order_id, status) => self.set_status(turn, order_id, status).await,
            Action::ManageName(order_id) => self.manage_name(turn, order_id).await,
            Action::AdminGrant => self.begin_grant(turn, None).await,
            Action::FsmCancel => {
                if turn.session.is_idle() {
                    turn.stale();
                } else {
                    Self::cancel(turn);
                }
                Ok(())
            }
            Action::Unrecognized(payload) => {
                tracing::debug!(%payload, "unrecognized button payload");
                turn.stale();
                Ok(())
            }
        }
    }

    async fn on_text(&self, turn: &mut Turn, text: String) -> Step {
        match turn.session.state.clone() {
            DialogueState::Idle => {
                turn.reply(Reply::text(lexicon::IDLE_HINT));
                Ok(())
            }
            DialogueState::ChoosingService
            | DialogueState::ChoosingSubService { .. }
            | DialogueState::ViewingOrder { .. }
            | DialogueState::ChangingStatus { .. } => {
                turn.reply(Reply::text(lexicon::EXPECTED_BUTTON));
                Ok(())
            }
            DialogueState::AnsweringQuestions { branch, index } => {
                self.answer(turn, branch, index, text).await
            }
            DialogueState::AwaitingGrantTarget => self.grant_target(turn, &text).await,
            DialogueState::SelectingOrder => self.select_order(turn, &text).await,
            DialogueState::SettingName { order_id } => self.set_name(turn, order_id, &text).await,
        }
    }

    /// Leaves any dialogue. Silent when there is nothing to cancel.
    fn cancel(turn: &mut Turn) {
        if turn.session.is_idle() {
            return;
        }
        tracing::info!(from = %turn.session.state, "dialogue cancelled");
        turn.session.reset();
        turn.reply(Reply::text(lexicon::CANCELLED));
    }

    async fn back(&self, turn: &mut Turn) -> Step {
        match turn.session.state.clone() {
            DialogueState::ChoosingSubService { .. } => {
                turn.session.transition(DialogueState::ChoosingService);
                turn.reply(screens::service_menu(&self.catalog));
                Ok(())
            }
            DialogueState::ChangingStatus { order_id }
            | DialogueState::SettingName { order_id } => self.view_order(turn, &order_id).await,
            _ => self.show_main_menu(turn).await,
        }
    }

    async fn show_main_menu(&self, turn: &mut Turn) -> Step {
        turn.session.reset();
        let role = self.store.get_role(turn.user).await;
        let orders = self.store.count_orders(turn.user).await;
        turn.reply(screens::main_menu(turn.user, role, orders, &self.settings.links));
        Ok(())
    }

    async fn show_my_cases(&self, turn: &mut Turn, page: usize) -> Step {
        let page = self
            .store
            .list_user_orders(turn.user, page, CLIENT_ORDERS_PAGE_SIZE)
            .await;
        turn.reply(screens::my_cases(&page, self.store.statuses()));
        Ok(())
    }

    async fn show_referrals(&self, turn: &mut Turn, page: usize) -> Step {
        let link = referral::link(&self.settings.bot_username, turn.user);
        let page = self
            .store
            .list_referrals(turn.user, page, REFERRALS_PAGE_SIZE)
            .await;
        turn.reply(screens::referrals(&link, &page));
        Ok(())
    }
}
