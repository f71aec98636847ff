//! Plain-text rendering of notifications.

use std::fmt::Write;

use crate::notification::NotificationEvent;

pub fn render(event: &NotificationEvent) -> String {
    match event {
        NotificationEvent::OrderCreated {
            order_id,
            client,
            service_label,
            sub_service_label,
            answers,
        } => {
            let mut text = format!("✅ New order! ID: {order_id}\n\n");
            let _ = writeln!(text, "👤 Client: {}", client.mention());
            let _ = writeln!(text, "▶️ Service: {service_label}");
            if let Some(sub) = sub_service_label {
                let _ = writeln!(text, "➡️ Sub-service: {sub}");
            }
            text.push_str("--------------------\n");
            for answer in answers {
                let _ = writeln!(text, "{}\n» {}\n", answer.question, answer.text);
            }
            text.trim_end().to_string()
        }
        NotificationEvent::StatusChanged {
            order_id,
            status_label,
            ..
        } => format!("🔔 The status of your order {order_id} changed to: {status_label}."),
        NotificationEvent::NameChanged { order_id, name, .. } => {
            format!("🔔 Your order {order_id} is now called: {name}.")
        }
        NotificationEvent::NewReferral { referral, .. } => {
            format!("🎉 You have a new referral: {}", referral.mention())
        }
    }
}
