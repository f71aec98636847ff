//! Referral deep links.
//!
//! A link carries `ref_<user id>` encoded as URL-safe base64 without
//! padding, e.g. `https://t.me/<bot>?start=cmVmXzQy`.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use common::UserId;

const PREFIX: &str = "ref_";

/// Encodes the deep-link token for `referrer`.
pub fn encode_token(referrer: UserId) -> String {
    URL_SAFE_NO_PAD.encode(format!("{PREFIX}{referrer}"))
}

/// Decodes a deep-link token.
///
/// Anything that is not a well-formed referral token yields `None`; a bad
/// link is treated as no referral at all.
pub fn decode_token(token: &str) -> Option<UserId> {
    let bytes = URL_SAFE_NO_PAD.decode(token.trim().trim_end_matches('=')).ok()?;
    let payload = String::from_utf8(bytes).ok()?;
    payload.strip_prefix(PREFIX)?.parse().ok()
}

/// Full `t.me` link for `referrer`.
pub fn link(bot_username: &str, referrer: UserId) -> String {
    format!("https://t.me/{bot_username}?start={}", encode_token(referrer))
}
