//! Name generation for join-to-create channels.

use std::collections::HashSet;

pub const USERNAME_PLACEHOLDER: &str = "{$username}";
pub const COUNTER_PLACEHOLDER: &str = "{$counter}";

/// Longest channel name Discord accepts.
const MAX_CHANNEL_NAME_CHARS: usize = 100;

/// Substitutes the placeholders of a name template.
///
/// The username is substituted around the counter, so a username containing a placeholder
/// is kept literally. Names over Discord's limit are shortened before the last counter so
/// that the counter and the text after it are kept.
pub fn render_channel_name(template: &str, username: &str, counter: usize) -> String {
    let counter = counter.to_string();
    let parts: Vec<String> = template
        .split(COUNTER_PLACEHOLDER)
        .map(|part| part.replace(USERNAME_PLACEHOLDER, username))
        .collect();

    let name = parts.join(&counter);
    if name.chars().count() <= MAX_CHANNEL_NAME_CHARS {
        return name;
    }

    let Some((last, head)) = parts.split_last() else {
        return name;
    };
    if head.is_empty() {
        return truncate(&name, MAX_CHANNEL_NAME_CHARS);
    }

    let tail = format!("{}{}", counter, last);
    let budget = MAX_CHANNEL_NAME_CHARS.saturating_sub(tail.chars().count());
    let head = truncate(&head.join(&counter), budget);

    truncate(&format!("{}{}", head, tail), MAX_CHANNEL_NAME_CHARS)
}

fn truncate(value: &str, chars: usize) -> String {
    value.chars().take(chars).collect()
}

/// Picks the name of a new channel spawned from a template.
///
/// Counting starts after the channels already spawned from the same template and increases
/// until no existing channel carries the rendered name. Templates without a counter
/// placeholder are rendered once and used as-is, even if the name is taken. At most
/// `existing.len() + 1` counters are tried; if all of them render to taken names the last
/// candidate is used.
///
/// # Arguments
/// - `template` - Output name template
/// - `username` - Value for the `{$username}` placeholder
/// - `similar` - Number of live channels already spawned from this template
/// - `existing` - Names of all channels in the guild
///
/// # Returns
/// - `String` - Rendered channel name
pub fn next_channel_name(
    template: &str,
    username: &str,
    similar: usize,
    existing: &HashSet<String>,
) -> String {
    let first = similar + 1;
    let mut candidate = render_channel_name(template, username, first);
    if !template.contains(COUNTER_PLACEHOLDER) {
        return candidate;
    }

    for counter in first + 1..=first + existing.len() {
        if !existing.contains(&candidate) {
            break;
        }
        candidate = render_channel_name(template, username, counter);
    }

    candidate
}
