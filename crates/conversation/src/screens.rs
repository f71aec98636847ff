//! Screen builders.
//!
//! Pure functions from already-loaded data to [`Reply`] values; all store
//! access happens in the engine.

use std::fmt::Write;

use common::{OrderId, Page, UserId};
use domain::{Order, OrderStatus, Question, Role, ServiceCatalog, ServiceDef, StatusCatalog, User};

use crate::action::Action;
use crate::lexicon::{self, buttons};
use crate::reply::{Button, Reply};

/// Links shown on the main menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuLinks {
    pub faq_url: String,
    pub channel_url: String,
}

impl Default for MenuLinks {
    fn default() -> Self {
        Self {
            faq_url: lexicon::FAQ_URL.to_string(),
            channel_url: lexicon::CHANNEL_URL.to_string(),
        }
    }
}

fn back_to_main_menu() -> Button {
    Button::action(buttons::BACK_TO_MAIN_MENU, &Action::BackToMainMenu)
}

fn cancel() -> Button {
    Button::action(buttons::CANCEL, &Action::FsmCancel)
}

/// Prev/next row; empty when there is a single page.
fn pager<T>(page: &Page<T>, to: impl Fn(usize) -> Action) -> Vec<Button> {
    let mut row = Vec::new();
    if page.has_previous() {
        row.push(Button::action(buttons::PREV_PAGE, &to(page.page - 1)));
    }
    if page.has_next() {
        row.push(Button::action(buttons::NEXT_PAGE, &to(page.page + 1)));
    }
    row
}

pub fn main_menu(user_id: UserId, role: Role, orders: usize, links: &MenuLinks) -> Reply {
    let reply = Reply::text(lexicon::main_menu(user_id, orders, role))
        .with_button(Button::action(buttons::CREATE_TASK, &Action::MenuCreateTask))
        .with_row(vec![
            Button::action(buttons::MY_CASES, &Action::MenuMyCases),
            Button::action(buttons::REFERRAL_PROGRAM, &Action::MenuReferral),
        ])
        .with_row(vec![
            Button::url(buttons::FAQ, &links.faq_url),
            Button::url(buttons::CHANNEL, &links.channel_url),
        ]);
    if role.is_admin() {
        reply.with_button(Button::action(buttons::ADMIN_OPTIONS, &Action::MenuAdmin))
    } else {
        reply
    }
}

pub fn service_menu(catalog: &ServiceCatalog) -> Reply {
    catalog
        .services()
        .iter()
        .fold(Reply::text(lexicon::CHOOSE_SERVICE), |reply, service| {
            reply.with_button(Button::action(
                &service.label,
                &Action::SelectService(service.key.clone()),
            ))
        })
        .with_button(cancel())
}

pub fn sub_service_menu(service: &ServiceDef) -> Reply {
    service
        .sub_services
        .iter()
        .fold(
            Reply::text(format!("{}\n\n{}", service.label, lexicon::CHOOSE_SUB_SERVICE)),
            |reply, sub| {
                reply.with_button(Button::action(
                    &sub.label,
                    &Action::SelectSubService(sub.key.clone()),
                ))
            },
        )
        .with_row(vec![Button::action(buttons::BACK, &Action::Back), cancel()])
}

pub fn question(question: &Question, index: usize, total: usize) -> Reply {
    Reply::text(lexicon::question(index, total, &question.text)).with_button(cancel())
}

pub fn order_accepted(order_id: &OrderId) -> Reply {
    Reply::text(lexicon::order_accepted(order_id)).with_button(back_to_main_menu())
}

pub fn my_cases(page: &Page<Order>, statuses: &StatusCatalog) -> Reply {
    let mut text = lexicon::MY_CASES_TITLE.to_string();
    if page.is_empty() {
        let _ = write!(text, "\n\n{}", lexicon::NO_CASES_YET);
    }
    for order in &page.items {
        let _ = write!(text, "\n\n#{}", order.id);
        if let Some(name) = &order.name {
            let _ = write!(text, " · {name}");
        }
        let _ = write!(
            text,
            "\n{}\n{}",
            statuses.label(&order.status),
            order.details.service_label
        );
    }
    Reply::text(text)
        .with_row(pager(page, Action::OrdersPage))
        .with_button(back_to_main_menu())
}

pub fn referrals(link: &str, page: &Page<User>) -> Reply {
    let mut text = lexicon::referral_link(link);
    let _ = write!(text, "\n\n{}", lexicon::MY_REFERRALS_TITLE);
    if page.is_empty() {
        let _ = write!(text, "\n{}", lexicon::NO_REFERRALS_YET);
    }
    for (offset, user) in page.items.iter().enumerate() {
        let _ = write!(text, "\n{}. {}", page.first_index() + offset, user.mention());
    }
    Reply::text(text)
        .with_row(pager(page, Action::ReferralPage))
        .with_button(back_to_main_menu())
}

pub fn admin_menu() -> Reply {
    Reply::text(lexicon::ADMIN_MENU_TITLE)
        .with_button(Button::action(buttons::LIST_USERS, &Action::AdminListUsers))
        .with_button(Button::action(buttons::ALL_ORDERS, &Action::AdminAllOrders))
        .with_button(Button::action(buttons::GRANT_ADMIN, &Action::AdminGrant))
        .with_button(back_to_main_menu())
}

fn back_to_admin_menu() -> Button {
    Button::action(buttons::BACK_TO_ADMIN_MENU, &Action::MenuAdmin)
}

pub fn user_list(users: &[User]) -> Reply {
    let mut text = lexicon::user_list_title(users.len());
    for user in users {
        let name = user.display_name.as_deref().map_or_else(
            || lexicon::NOT_SET.to_string(),
            |name| format!("@{name}"),
        );
        let _ = write!(
            text,
            "\n• {} | {name} | {}",
            user.id,
            lexicon::role_label(user.role)
        );
    }
    Reply::text(text).with_button(back_to_admin_menu())
}

pub fn grant_prompt() -> Reply {
    Reply::text(lexicon::GRANT_PROMPT).with_button(cancel())
}

pub fn order_list(
    page: &Page<Order>,
    filter: Option<&OrderStatus>,
    statuses: &StatusCatalog,
) -> Reply {
    let filter_label = filter.map_or(buttons::FILTER_ALL, |status| statuses.label(status));
    let mut text = lexicon::order_list_title(filter_label);
    if page.is_empty() {
        let _ = write!(text, "\n\n{}", lexicon::NO_ORDERS_FOUND);
    } else {
        for (offset, order) in page.items.iter().enumerate() {
            let _ = write!(
                text,
                "\n\n{}. #{} · {}\n{}",
                offset + 1,
                order.id,
                statuses.label(&order.status),
                order.details.service_label
            );
            if let Some(name) = &order.name {
                let _ = write!(text, " · {name}");
            }
        }
        let _ = write!(text, "\n\n{}", lexicon::ORDER_LIST_PROMPT);
    }

    let mut filters = vec![Button::action(buttons::FILTER_ALL, &Action::AdminFilter(None))];
    filters.extend(statuses.iter().map(|def| {
        Button::action(
            &def.label,
            &Action::AdminFilter(Some(def.key.clone())),
        )
    }));

    Reply::text(text)
        .with_row(filters)
        .with_row(pager(page, Action::AdminOrdersPage))
        .with_button(back_to_admin_menu())
}

pub fn order_card(
    order: &Order,
    client: Option<&User>,
    statuses: &StatusCatalog,
    list_page: usize,
) -> Reply {
    let details = &order.details;
    let client = match client {
        Some(user) => match &user.display_name {
            Some(name) => format!("@{name} (ID: {})", user.id),
            None => format!("ID: {}", user.id),
        },
        None => format!("ID: {}", order.user_id),
    };
    let mut text = format!("📝 Order {}\n\n", order.id);
    let _ = writeln!(text, "Name: {}", order.name.as_deref().unwrap_or(lexicon::NOT_SET));
    let _ = writeln!(text, "Status: {}", statuses.label(&order.status));
    let _ = writeln!(text, "Client: {client}");
    let _ = writeln!(text, "Service: {}", details.service_label);
    let _ = writeln!(
        text,
        "Sub-service: {}",
        details.sub_service_label.as_deref().unwrap_or(lexicon::NOT_SET)
    );
    text.push_str("--------------------");
    for answer in &details.answers {
        let _ = write!(text, "\n{}\n» {}\n", answer.question, answer.text);
    }

    Reply::text(text.trim_end())
        .with_row(vec![
            Button::action(buttons::CHANGE_STATUS, &Action::ManageStatus(order.id.clone())),
            Button::action(buttons::SET_NAME, &Action::ManageName(order.id.clone())),
        ])
        .with_button(Button::action(
            buttons::BACK_TO_ORDERS,
            &Action::AdminOrdersPage(list_page),
        ))
}

pub fn status_chooser(order_id: &OrderId, statuses: &StatusCatalog) -> Reply {
    statuses
        .iter()
        .fold(
            Reply::text(lexicon::change_status_prompt(order_id)),
            |reply, def| {
                reply.with_button(Button::action(
                    &def.label,
                    &Action::SetStatus(order_id.clone(), def.key.clone()),
                ))
            },
        )
        .with_button(Button::action(buttons::BACK, &Action::Back))
}

pub fn name_prompt(order_id: &OrderId) -> Reply {
    Reply::text(lexicon::set_name_prompt(order_id))
        .with_button(Button::action(buttons::BACK, &Action::Back))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use common::paginate;
    use domain::OrderDetails;

    use super::*;

    fn order(code: &str, n: u64) -> Order {
        Order {
            id: OrderId::parse(code).unwrap(),
            user_id: UserId::new(1),
            status: OrderStatus::new("new"),
            name: None,
            details: OrderDetails {
                service_key: "other".to_string(),
                service_label: "Other".to_string(),
                sub_service_key: None,
                sub_service_label: None,
                answers: Vec::new(),
            },
            created_at: Utc::now(),
            sequence: n,
        }
    }

    #[test]
    fn admin_button_only_for_admins() {
        let links = MenuLinks::default();
        let client = main_menu(UserId::new(1), Role::Client, 0, &links);
        assert!(!client.actions().any(|a| a == Action::MenuAdmin));
        let owner = main_menu(UserId::new(1), Role::Owner, 0, &links);
        assert!(owner.actions().any(|a| a == Action::MenuAdmin));
    }

    #[test]
    fn order_list_numbers_items_per_page() {
        let orders = vec![
            order("AAAAAA", 1),
            order("BBBBBB", 2),
            order("CCCCCC", 3),
        ];
        let page = paginate(orders, 2, 2);
        let reply = order_list(&page, None, &StatusCatalog::default());
        assert!(reply.text.contains("1. #CCCCCC"));
        assert!(reply.actions().any(|a| a == Action::AdminOrdersPage(1)));
        assert!(!reply.actions().any(|a| a == Action::AdminOrdersPage(3)));
    }

    #[test]
    fn status_chooser_offers_every_status() {
        let id = OrderId::parse("AAAAAA").unwrap();
        let statuses = StatusCatalog::default();
        let reply = status_chooser(&id, &statuses);
        let offered = reply
            .actions()
            .filter(|a| matches!(a, Action::SetStatus(..)))
            .count();
        assert_eq!(offered, statuses.iter().count());
    }

    #[test]
    fn status_buttons_carry_catalog_keys() {
        let id = OrderId::parse("AAAAAA").unwrap();
        let statuses = StatusCatalog::default();
        let keys: Vec<OrderStatus> = statuses.iter().map(|def| def.key.clone()).collect();

        let chooser: Vec<OrderStatus> = status_chooser(&id, &statuses)
            .actions()
            .filter_map(|a| match a {
                Action::SetStatus(order_id, status) if order_id == id => Some(status),
                _ => None,
            })
            .collect();
        assert_eq!(chooser, keys);

        let filters: Vec<OrderStatus> = order_list(&Page::empty(), None, &statuses)
            .actions()
            .filter_map(|a| match a {
                Action::AdminFilter(Some(status)) => Some(status),
                _ => None,
            })
            .collect();
        assert_eq!(filters, keys);
    }

    #[test]
    fn referral_list_continues_numbering() {
        let users: Vec<User> = (1..=12)
            .map(|n| User {
                id: UserId::new(n),
                display_name: None,
                role: Role::Client,
                referrer_id: Some(UserId::new(100)),
                registered_at: Utc::now(),
            })
            .collect();
        let page = paginate(users, 2, 10);
        let reply = referrals("https://t.me/bot?start=x", &page);
        assert!(reply.text.contains("11. ID: 11"));
        assert!(reply.actions().any(|a| a == Action::ReferralPage(1)));
    }
}
