//! User-facing texts.

use common::{OrderId, UserId};
use domain::Role;

pub const FAQ_URL: &str = "https://telegra.ph/FAQ-Example-09-16";
pub const CHANNEL_URL: &str = "https://t.me/telegram";

pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::Client => "Client 👤",
        Role::Admin => "Administrator 🛠️",
        Role::Owner => "Owner 👑",
    }
}

pub mod buttons {
    pub const CREATE_TASK: &str = "Create a request 📝";
    pub const MY_CASES: &str = "My orders 📦";
    pub const REFERRAL_PROGRAM: &str = "Referral program 🤝";
    pub const FAQ: &str = "F.A.Q. ❓";
    pub const CHANNEL: &str = "Our channel 📢";
    pub const ADMIN_OPTIONS: &str = "Admin options 🛠️";
    pub const BACK: &str = "⬅️ Back";
    pub const BACK_TO_MAIN_MENU: &str = "⬅️ Main menu";
    pub const BACK_TO_ADMIN_MENU: &str = "⬅️ Admin menu";
    pub const CANCEL: &str = "✖️ Cancel";
    pub const LIST_USERS: &str = "Users 👥";
    pub const ALL_ORDERS: &str = "All orders 📦";
    pub const GRANT_ADMIN: &str = "Grant admin 🛠️";
    pub const NEXT_PAGE: &str = "Next ➡️";
    pub const PREV_PAGE: &str = "⬅️ Previous";
    pub const FILTER_ALL: &str = "All";
    pub const CHANGE_STATUS: &str = "Change status ✏️";
    pub const SET_NAME: &str = "Set name 📝";
    pub const BACK_TO_ORDERS: &str = "⬅️ Order list";
}

pub const CHOOSE_SERVICE: &str = "What can we help you with? Choose a service.";
pub const CHOOSE_SUB_SERVICE: &str = "Choose the option that fits you best.";
pub const CANCELLED: &str = "Action cancelled. Send /menu to return.";
pub const IDLE_HINT: &str = "Send /menu to open the main menu.";
pub const CONFIGURATION_APOLOGY: &str =
    "Sorry, this service is not available right now. Please try again later or choose another one.";
pub const STORE_APOLOGY: &str = "Sorry, something went wrong. Please try again later.";
pub const STALE_BUTTON: &str = "This button is no longer active.";
pub const EXPECTED_TEXT: &str = "Please answer with a text message.";
pub const EXPECTED_BUTTON: &str = "Please use the buttons above.";

pub const MY_CASES_TITLE: &str = "📦 Your orders:";
pub const NO_CASES_YET: &str = "You have not created any orders yet.";
pub const MY_REFERRALS_TITLE: &str = "📊 Your referrals:";
pub const NO_REFERRALS_YET: &str = "You have no referrals yet.";

pub const ADMIN_MENU_TITLE: &str = "🛠️ Admin options";
pub const ADMIN_ONLY: &str = "⛔ This action is available to administrators only.";
pub const OWNER_ONLY: &str = "⛔ Insufficient privilege: only the owner can grant admin rights.";
pub const GRANT_PROMPT: &str = "Send the ID of the user who should become an administrator:";
pub const GRANT_INVALID_ID: &str = "❌ Invalid ID. Please send a number.";
pub const NO_ORDERS_FOUND: &str = "No orders with this status.";
pub const ORDER_LIST_PROMPT: &str =
    "To manage an order, send its ID (e.g. A4T7B1) or its number in the list (e.g. 2).";
pub const NAME_EMPTY: &str = "❌ The name cannot be empty. Send the new name:";
pub const NOT_SET: &str = "not set";

pub fn main_menu(user_id: UserId, orders: usize, role: Role) -> String {
    format!(
        "🏛️ Main menu\n\nWelcome! Here you can review your orders and submit a new request.\n\n\
         🆔 ID: {user_id}\n📦 Orders created: {orders}\n🌟 Status: {}",
        role_label(role)
    )
}

pub fn question(index: usize, total: usize, text: &str) -> String {
    format!("Question {} of {total}: {text}", index + 1)
}

pub fn order_accepted(order_id: &OrderId) -> String {
    format!(
        "✅ Thank you! Your request #{order_id} has been accepted. We will contact you soon. \
         Send /menu to return."
    )
}

pub fn referral_link(link: &str) -> String {
    format!("🤝 Referral program\n\nYour personal link:\n{link}")
}

pub fn user_list_title(count: usize) -> String {
    format!("👥 Users (total: {count}):")
}

pub fn grant_success(user_id: UserId) -> String {
    format!("✅ User {user_id} is now an administrator.")
}

pub fn grant_refused(user_id: UserId) -> String {
    format!("❌ User {user_id} cannot be granted admin rights.")
}

pub fn user_not_found(raw: &str) -> String {
    format!("❌ No user with ID {raw} was found.")
}

pub fn order_list_title(filter_label: &str) -> String {
    format!("📦 All orders (filter: {filter_label})")
}

pub fn order_not_found(raw: &str) -> String {
    format!("❌ Order {raw} was not found.")
}

pub fn index_out_of_range(index: usize, shown: usize) -> String {
    format!("❌ There is no order number {index} on this page (1-{shown}).")
}

pub fn change_status_prompt(order_id: &OrderId) -> String {
    format!("Choose the new status for order {order_id}:")
}

pub fn status_updated(order_id: &OrderId, label: &str) -> String {
    format!("✅ Order {order_id} status changed to '{label}'. The client has been notified.")
}

pub fn set_name_prompt(order_id: &OrderId) -> String {
    format!("Send the new name for order {order_id}:")
}

pub fn name_updated(order_id: &OrderId) -> String {
    format!("✅ Order {order_id} has been renamed. The client has been notified.")
}
