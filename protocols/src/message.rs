//! Operator-facing notification texts and the Telegram `sendMessage` form.

use subwatch_common::domain::{Domain, SubdomainSet};

pub const NOTHING_NEW: &str = "👎 No subdomains Found from any targets.";

/// Alert listing the new subdomains of one domain, one per line, sorted.
pub fn new_subdomains(domain: &Domain, new: &SubdomainSet) -> String {
    let mut msg = format!("🚨 New Subdomains Found ({domain})\n\n");
    let lines: Vec<&str> = new.iter().map(String::as_str).collect();
    msg.push_str(&lines.join("\n"));
    msg
}

pub fn send_message_path(token: &str) -> String {
    format!("/bot{token}/sendMessage")
}

/// Form fields of a `sendMessage` call.
pub fn telegram_form<'a>(chat_id: &'a str, text: &'a str) -> [(&'static str, &'a str); 2] {
    [("chat_id", chat_id), ("text", text)]
}
