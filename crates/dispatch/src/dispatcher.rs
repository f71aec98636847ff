//! Recipient selection and best-effort delivery.

use common::UserId;
use futures_util::future::join_all;

use crate::notification::{NotificationEvent, Recipient};
use crate::render::render;
use crate::transport::Transport;

/// Outcome of dispatching one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Routes notification events to their recipients.
///
/// - `OrderCreated` goes to the owner and, if configured, the group chat.
/// - `StatusChanged` / `NameChanged` go to the order's client.
/// - `NewReferral` goes to the referrer.
pub struct NotificationDispatcher<T: Transport> {
    transport: T,
    owner_id: UserId,
    group_chat_id: Option<i64>,
}

impl<T: Transport> NotificationDispatcher<T> {
    pub fn new(transport: T, owner_id: UserId, group_chat_id: Option<i64>) -> Self {
        Self {
            transport,
            owner_id,
            group_chat_id,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Recipients of `event`, without duplicates.
    pub fn recipients(&self, event: &NotificationEvent) -> Vec<Recipient> {
        match event {
            NotificationEvent::OrderCreated { .. } => {
                let mut recipients = vec![Recipient::Owner(self.owner_id)];
                if let Some(group) = self.group_chat_id
                    && group != self.owner_id.get()
                {
                    recipients.push(Recipient::Group(group));
                }
                recipients
            }
            NotificationEvent::StatusChanged { client_id, .. }
            | NotificationEvent::NameChanged { client_id, .. } => {
                vec![Recipient::Client(*client_id)]
            }
            NotificationEvent::NewReferral { referrer_id, .. } => {
                vec![Recipient::Referrer(*referrer_id)]
            }
        }
    }

    /// Delivers `event` to every recipient concurrently.
    ///
    /// Never fails: undeliverable messages are logged and counted.
    #[tracing::instrument(skip(self, event), fields(kind = event.kind()))]
    pub async fn dispatch(&self, event: &NotificationEvent) -> DispatchReport {
        let text = render(event);
        let recipients = self.recipients(event);

        let sends = recipients.iter().map(|recipient| {
            let text = text.as_str();
            async move {
                let result = self.transport.send_text(recipient.chat_id(), text).await;
                (recipient, result)
            }
        });

        let mut report = DispatchReport::default();
        for (recipient, result) in join_all(sends).await {
            match result {
                Ok(()) => {
                    metrics::counter!("notifications_sent_total", "kind" => event.kind())
                        .increment(1);
                    report.delivered += 1;
                }
                Err(e) => {
                    metrics::counter!("notifications_failed_total", "kind" => event.kind())
                        .increment(1);
                    tracing::warn!(?recipient, error = %e, "notification delivery failed");
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Dispatches a batch of events in order.
    pub async fn dispatch_all(&self, events: &[NotificationEvent]) -> DispatchReport {
        let mut total = DispatchReport::default();
        for event in events {
            let report = self.dispatch(event).await;
            total.delivered += report.delivered;
            total.failed += report.failed;
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use common::OrderId;

    use super::*;
    use crate::{Party, RecordingTransport};

    const OWNER: UserId = UserId::new(999);

    fn order_created() -> NotificationEvent {
        NotificationEvent::OrderCreated {
            order_id: OrderId::parse("AAAAAA").unwrap(),
            client: Party {
                id: UserId::new(1),
                display_name: Some("client".to_string()),
            },
            service_label: "Other".to_string(),
            sub_service_label: None,
            answers: vec![],
        }
    }

    #[test]
    fn order_created_goes_to_owner_and_group() {
        let dispatcher = NotificationDispatcher::new(RecordingTransport::new(), OWNER, Some(-42));
        assert_eq!(
            dispatcher.recipients(&order_created()),
            vec![Recipient::Owner(OWNER), Recipient::Group(-42)]
        );
    }

    #[test]
    fn order_created_without_group_goes_to_owner_only() {
        let dispatcher = NotificationDispatcher::new(RecordingTransport::new(), OWNER, None);
        assert_eq!(
            dispatcher.recipients(&order_created()),
            vec![Recipient::Owner(OWNER)]
        );
    }

    #[test]
    fn status_change_goes_to_client() {
        let dispatcher = NotificationDispatcher::new(RecordingTransport::new(), OWNER, Some(-42));
        let event = NotificationEvent::StatusChanged {
            order_id: OrderId::parse("AAAAAA").unwrap(),
            client_id: UserId::new(7),
            status_label: "Done".to_string(),
        };
        assert_eq!(
            dispatcher.recipients(&event),
            vec![Recipient::Client(UserId::new(7))]
        );
    }

    #[tokio::test]
    async fn failed_delivery_does_not_stop_others() {
        let transport = RecordingTransport::new();
        transport.set_unreachable(OWNER.get());
        let dispatcher = NotificationDispatcher::new(transport.clone(), OWNER, Some(-42));

        let report = dispatcher.dispatch(&order_created()).await;

        assert_eq!(report, DispatchReport { delivered: 1, failed: 1 });
        assert_eq!(transport.sent_to(-42).len(), 1);
        assert!(transport.sent_to(OWNER.get()).is_empty());
    }

    #[tokio::test]
    async fn referral_notifies_referrer() {
        let transport = RecordingTransport::new();
        let dispatcher = NotificationDispatcher::new(transport.clone(), OWNER, None);
        let event = NotificationEvent::NewReferral {
            referrer_id: UserId::new(1),
            referral: Party {
                id: UserId::new(2),
                display_name: None,
            },
        };
        let report = dispatcher.dispatch_all(&[event]).await;
        assert_eq!(report.delivered, 1);
        assert_eq!(
            transport.sent_to(1),
            vec!["🎉 You have a new referral: ID: 2".to_string()]
        );
    }
}
