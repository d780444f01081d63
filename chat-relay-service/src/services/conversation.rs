//! Prompt assembly for the chat endpoint.
//!
//! Turn order is fixed: system instruction, uploaded file text, prior
//! history (most recent 12), then the current message.

use crate::dtos::{AttachedFile, ChatRequest};
use crate::services::providers::{ChatTurn, Role};

/// Most recent history turns kept at assembly.
const MAX_HISTORY_TURNS: usize = 12;

/// Cap on the combined attached file text, in characters.
const MAX_FILE_TEXT_CHARS: usize = 120_000;

/// Separator between the texts of individual attached files.
const FILE_SEPARATOR: &str = "\n\n---\n\n";

pub fn assemble_turns(request: &ChatRequest) -> Vec<ChatTurn> {
    let mut turns = Vec::new();

    if let Some(system) = resolve_system(request) {
        turns.push(ChatTurn {
            role: Role::System,
            content: system,
        });
    }

    if let Some(files_text) = collect_file_text(&request.files) {
        turns.push(ChatTurn {
            role: Role::User,
            content: format!("Uploaded file text:\n\n{}", files_text),
        });
    }

    let start = request.conversation.len().saturating_sub(MAX_HISTORY_TURNS);
    for turn in &request.conversation[start..] {
        turns.push(ChatTurn {
            role: Role::normalize(&turn.role),
            content: turn.content.clone(),
        });
    }

    turns.push(ChatTurn {
        role: Role::User,
        content: request.message.clone(),
    });

    turns
}

/// `system` wins over the legacy `personalization` alias.
fn resolve_system(request: &ChatRequest) -> Option<String> {
    request
        .system
        .clone()
        .filter(|s| !s.is_empty())
        .or_else(|| {
            request
                .personalization
                .clone()
                .filter(|s| !s.is_empty())
        })
}

fn collect_file_text(files: &[AttachedFile]) -> Option<String> {
    let mut joined = files
        .iter()
        .map(|f| f.text.as_str())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(FILE_SEPARATOR);

    truncate_chars(&mut joined, MAX_FILE_TEXT_CHARS);

    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Truncates to at most `max` characters, on a char boundary.
fn truncate_chars(text: &mut String, max: usize) {
    if let Some((idx, _)) = text.char_indices().nth(max) {
        text.truncate(idx);
    }
}
