//! Admin flows: order management and granting admin rights.

use common::{OrderId, UserId};
use dispatch::NotificationEvent;
use domain::OrderStatus;
use store::Store;

use crate::engine::{ConversationEngine, Step, Turn};
use crate::error::AccessError;
use crate::gate::RoleGate;
use crate::lexicon;
use crate::reply::Reply;
use crate::screens;
use crate::session::{DialogueState, OrderListing};

fn deny(turn: &mut Turn, denied: AccessError) {
    tracing::warn!(user_id = %turn.user, error = %denied, "access denied");
    let text = match denied {
        AccessError::NotAdmin => lexicon::ADMIN_ONLY,
        AccessError::NotOwner => lexicon::OWNER_ONLY,
    };
    turn.reply(Reply::text(text));
}

impl<S: Store> ConversationEngine<S> {
    /// Checks admin rights, rendering the denial if they are missing.
    async fn admit(&self, turn: &mut Turn) -> bool {
        match RoleGate::require_admin(&self.store, turn.user).await {
            Ok(_) => true,
            Err(denied) => {
                deny(turn, denied);
                false
            }
        }
    }

    async fn admit_owner(&self, turn: &mut Turn) -> bool {
        match RoleGate::require_owner(&self.store, turn.user).await {
            Ok(_) => true,
            Err(denied) => {
                deny(turn, denied);
                false
            }
        }
    }

    pub(crate) async fn show_admin_menu(&self, turn: &mut Turn) -> Step {
        if !self.admit(turn).await {
            return Ok(());
        }
        turn.session.reset();
        turn.reply(screens::admin_menu());
        Ok(())
    }

    pub(crate) async fn show_user_list(&self, turn: &mut Turn) -> Step {
        if !self.admit(turn).await {
            return Ok(());
        }
        let users = self.store.list_all_users().await;
        turn.reply(screens::user_list(&users));
        Ok(())
    }

    /// Shows one page of all orders and starts listening for a selection.
    pub(crate) async fn show_order_list(
        &self,
        turn: &mut Turn,
        filter: Option<OrderStatus>,
        page: usize,
    ) -> Step {
        if !self.admit(turn).await {
            return Ok(());
        }
        if let Some(status) = &filter {
            if !self.store.statuses().contains(status.as_str()) {
                turn.stale();
                return Ok(());
            }
        }

        let page = self
            .store
            .list_orders(filter.as_ref(), page, self.settings.admin_page_size)
            .await;
        turn.reply(screens::order_list(
            &page,
            filter.as_ref(),
            self.store.statuses(),
        ));
        turn.session.reset();
        turn.session.listing = OrderListing {
            filter,
            page: page.page,
        };
        turn.session.transition(DialogueState::SelectingOrder);
        Ok(())
    }

    /// Resolves typed text against the list being shown: an order code, or
    /// a 1-based position on the current page.
    #[tracing::instrument(skip(self, turn), fields(user_id = %turn.user))]
    pub(crate) async fn select_order(&self, turn: &mut Turn, text: &str) -> Step {
        if !self.admit(turn).await {
            return Ok(());
        }

        if let Ok(order_id) = OrderId::parse(text) {
            if self.store.get_order(&order_id).await.is_some() {
                return self.view_order(turn, &order_id).await;
            }
        }

        let Ok(position) = text.parse::<usize>() else {
            turn.reply(Reply::text(lexicon::order_not_found(text)));
            return Ok(());
        };
        let listing = turn.session.listing.clone();
        let page = self
            .store
            .list_orders(
                listing.filter.as_ref(),
                listing.page,
                self.settings.admin_page_size,
            )
            .await;
        let selected = position
            .checked_sub(1)
            .and_then(|index| page.items.get(index));
        match selected {
            Some(order) => {
                let order_id = order.id.clone();
                self.view_order(turn, &order_id).await
            }
            None if page.items.is_empty() => {
                turn.reply(Reply::text(lexicon::NO_ORDERS_FOUND));
                Ok(())
            }
            None => {
                turn.reply(Reply::text(lexicon::index_out_of_range(
                    position,
                    page.items.len(),
                )));
                Ok(())
            }
        }
    }

    /// Shows the order card and focuses the dialogue on the order.
    pub(crate) async fn view_order(&self, turn: &mut Turn, order_id: &OrderId) -> Step {
        if !self.admit(turn).await {
            return Ok(());
        }
        let Some(order) = self.store.get_order(order_id).await else {
            turn.reply(Reply::text(lexicon::order_not_found(order_id.as_str())));
            return Ok(());
        };
        let client = self.store.get_user(order.user_id).await;
        turn.reply(screens::order_card(
            &order,
            client.as_ref(),
            self.store.statuses(),
            turn.session.listing.page,
        ));
        // Reachable from an unfinished intake through an old order button.
        turn.session.answers.clear();
        turn.session.transition(DialogueState::ViewingOrder {
            order_id: order_id.clone(),
        });
        Ok(())
    }

    pub(crate) async fn manage_status(&self, turn: &mut Turn, order_id: OrderId) -> Step {
        if !self.admit(turn).await {
            return Ok(());
        }
        if turn.session.state.focused_order() != Some(&order_id) {
            turn.stale();
            return Ok(());
        }
        turn.reply(screens::status_chooser(&order_id, self.store.statuses()));
        turn.session
            .transition(DialogueState::ChangingStatus { order_id });
        Ok(())
    }

    #[tracing::instrument(skip(self, turn), fields(user_id = %turn.user))]
    pub(crate) async fn set_status(
        &self,
        turn: &mut Turn,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Step {
        if !self.admit(turn).await {
            return Ok(());
        }
        let expected = DialogueState::ChangingStatus {
            order_id: order_id.clone(),
        };
        if turn.session.state != expected || !self.store.statuses().contains(status.as_str()) {
            turn.stale();
            return Ok(());
        }

        if !self.store.update_status(&order_id, &status).await? {
            turn.reply(Reply::text(lexicon::order_not_found(order_id.as_str())));
            return Ok(());
        }
        metrics::counter!("order_status_changes_total", "status" => status.to_string())
            .increment(1);
        tracing::info!(%order_id, %status, "order status changed");

        let label = self.store.statuses().label(&status).to_string();
        if let Some(order) = self.store.get_order(&order_id).await {
            turn.out.notify(NotificationEvent::StatusChanged {
                order_id: order_id.clone(),
                client_id: order.user_id,
                status_label: label.clone(),
            });
        }
        turn.reply(Reply::text(lexicon::status_updated(&order_id, &label)));
        self.view_order(turn, &order_id).await
    }

    pub(crate) async fn manage_name(&self, turn: &mut Turn, order_id: OrderId) -> Step {
        if !self.admit(turn).await {
            return Ok(());
        }
        if turn.session.state.focused_order() != Some(&order_id) {
            turn.stale();
            return Ok(());
        }
        turn.reply(screens::name_prompt(&order_id));
        turn.session.transition(DialogueState::SettingName { order_id });
        Ok(())
    }

    #[tracing::instrument(skip(self, turn, name), fields(user_id = %turn.user))]
    pub(crate) async fn set_name(&self, turn: &mut Turn, order_id: OrderId, name: &str) -> Step {
        if !self.admit(turn).await {
            return Ok(());
        }
        let name = name.trim();
        if name.is_empty() {
            turn.reply(Reply::text(lexicon::NAME_EMPTY));
            return Ok(());
        }

        if !self.store.update_name(&order_id, name).await? {
            turn.reply(Reply::text(lexicon::order_not_found(order_id.as_str())));
            turn.session.reset();
            return Ok(());
        }
        tracing::info!(%order_id, "order renamed");

        if let Some(order) = self.store.get_order(&order_id).await {
            turn.out.notify(NotificationEvent::NameChanged {
                order_id: order_id.clone(),
                client_id: order.user_id,
                name: name.to_string(),
            });
        }
        turn.reply(Reply::text(lexicon::name_updated(&order_id)));
        self.view_order(turn, &order_id).await
    }

    /// Starts granting admin rights. With a target the grant happens at
    /// once; otherwise the owner is asked for an id.
    pub(crate) async fn begin_grant(&self, turn: &mut Turn, target: Option<String>) -> Step {
        if !self.admit_owner(turn).await {
            return Ok(());
        }
        turn.session.reset();
        turn.session.transition(DialogueState::AwaitingGrantTarget);
        match target {
            Some(target) => self.grant(turn, &target).await,
            None => {
                turn.reply(screens::grant_prompt());
                Ok(())
            }
        }
    }

    pub(crate) async fn grant_target(&self, turn: &mut Turn, text: &str) -> Step {
        if !self.admit_owner(turn).await {
            return Ok(());
        }
        self.grant(turn, text).await
    }

    /// Promotes `raw` to admin. Bad input re-prompts and stays in
    /// `AwaitingGrantTarget`.
    #[tracing::instrument(skip(self, turn), fields(user_id = %turn.user))]
    async fn grant(&self, turn: &mut Turn, raw: &str) -> Step {
        let Ok(target) = raw.parse::<UserId>() else {
            turn.reply(Reply::text(lexicon::GRANT_INVALID_ID));
            return Ok(());
        };
        if self.store.get_user(target).await.is_none() {
            turn.reply(Reply::text(lexicon::user_not_found(raw.trim())));
            return Ok(());
        }
        if !self.store.grant_admin(target).await {
            turn.reply(Reply::text(lexicon::grant_refused(target)));
            return Ok(());
        }

        tracing::info!(target_id = %target, "admin rights granted");
        turn.session.reset();
        turn.reply(Reply::text(lexicon::grant_success(target)));
        turn.reply(screens::admin_menu());
        Ok(())
    }
}
