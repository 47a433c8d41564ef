use crate::chat_models::ChatTurn;
use crate::models::Institution;
use crate::store::InstitutionStore;
use regex::Regex;

/// Replies are capped so a broad query ("university") does not dump the
/// whole dataset into the chat window.
const MAX_MATCHES: usize = 5;

const GREETING_REPLY: &str = "Hello! I'm running in local mode, so I can only look things up \
     directly in the institutions dataset. Ask me about an institution name, city, or region.";

const NO_MATCH_REPLY: &str = "I'm running in local mode and couldn't find a matching \
     institution. Try asking about a specific institution name, city, or region.";

/// Deterministic offline responder, used when no credential is configured or
/// every remote model attempt has failed.
///
/// Takes the most recent user turn (or the last turn of any role when the
/// history holds no user turn), matches it against the store, and always
/// produces a non-empty reply: matches are listed first, a bare greeting gets
/// a greeting back, and everything else gets the generic local-mode note.
pub fn local_reply(history: &[ChatTurn], store: &InstitutionStore) -> String {
    let message = history
        .iter()
        .rev()
        .find(|turn| turn.role.eq_ignore_ascii_case("user"))
        .or_else(|| history.last())
        .map(|turn| turn.first_text())
        .unwrap_or("");

    let matches = store.search(message);
    if !matches.is_empty() {
        return format_matches(&matches);
    }

    if contains_greeting(message) {
        return GREETING_REPLY.to_string();
    }

    NO_MATCH_REPLY.to_string()
}

fn format_matches(matches: &[&Institution]) -> String {
    let mut reply = String::from("Here's what I found in the institutions dataset:\n");
    for inst in matches.iter().take(MAX_MATCHES) {
        reply.push_str("\n- ");
        reply.push_str(&inst.name);
        if let Some(city) = &inst.city {
            reply.push_str(&format!(" ({})", city));
        }
        if let Some(institution_type) = &inst.institution_type {
            reply.push_str(&format!(" - {}", institution_type));
        }
    }
    reply.push_str("\n\nAsk me about any of these for more details.");
    reply
}

/// Whole-word greeting check; "hi" inside "this" must not trigger it.
fn contains_greeting(message: &str) -> bool {
    let greeting_re = Regex::new(r"\b(hello|hi|hey)\b").unwrap();
    greeting_re.is_match(&message.to_lowercase())
}
