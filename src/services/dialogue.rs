use std::sync::Arc;

use chrono::Utc;

use crate::db::{self, queries};
use crate::drafts::{self, UserSession};
use crate::errors::TurnError;
use crate::models::{ContactFields, ExtractedMessage, MissingField, ScheduleFields};
use crate::services::calendar::reference_offset;
use crate::services::{dispatch, extraction, guests, merge};
use crate::state::AppState;

const REPLY_RETRY: &str =
    "Tive um problema para processar seu pedido. Vamos tentar de novo. O que você gostaria de agendar?";
const REPLY_GREETING: &str = "Olá! Sou o assistente de agendamentos. Me diga o que quer marcar, por exemplo: \"agendar reunião amanhã às 15:00 com a Ana\".";
const REPLY_REDIRECT: &str =
    "Consigo ajudar apenas com agendamentos e contatos. O que você gostaria de agendar?";
const REPLY_UNKNOWN: &str = "Não entendi o que você precisa. Pode reformular?";
const REPLY_DIRECTORY_DOWN: &str =
    "Desculpe, estou com problemas para acessar a agenda de contatos agora. Tente novamente em instantes.";
const REPLY_CONTACT_CLARIFY: &str = "Para salvar um contato preciso do nome e do email. Por exemplo: \"salvar contato Vini, vini@exemplo.com\".";

/// Single entry point for one inbound message. The whole turn runs under the
/// sender's session lock, so overlapping deliveries for the same user are
/// strictly ordered while other users proceed in parallel.
pub async fn handle_turn(state: &Arc<AppState>, user_id: &str, text: &str) -> String {
    let session_lock = state.drafts.session(user_id);
    let mut session = session_lock.lock().await;
    session.expire_stale(drafts::DRAFT_TTL);

    let today = Utc::now().with_timezone(&reference_offset()).date_naive();
    let extracted = match extraction::extract_message(
        state.llm.as_ref(),
        text,
        session.draft(),
        today,
    )
    .await
    {
        Ok(extracted) => extracted,
        Err(e) => {
            // Turn has no side effect on state: the draft stays as it was.
            tracing::warn!(user = user_id, error = %e, "extraction failed");
            return REPLY_RETRY.to_string();
        }
    };

    tracing::info!(
        user = user_id,
        intent = extracted.intent_name(),
        has_draft = session.draft().is_some(),
        "processing turn"
    );

    match extracted {
        ExtractedMessage::Schedule(fields) => schedule_turn(state, &mut session, fields).await,
        ExtractedMessage::SaveContact(fields) => save_contact_turn(state, &mut session, &fields),
        ExtractedMessage::Greeting => {
            session.clear();
            REPLY_GREETING.to_string()
        }
        ExtractedMessage::Unrelated => {
            session.clear();
            REPLY_REDIRECT.to_string()
        }
        ExtractedMessage::Unknown => REPLY_UNKNOWN.to_string(),
    }
}

/// Merge this turn's fields, re-resolve guests, then either prompt for what
/// is still missing or dispatch the completed booking. The draft is cleared
/// only after a successful dispatch; a provider failure keeps it so the user
/// retries without re-entering anything.
async fn schedule_turn(
    state: &Arc<AppState>,
    session: &mut UserSession,
    fields: ScheduleFields,
) -> String {
    let base = session.draft().cloned().unwrap_or_default();
    let mut draft = merge::merge(&base, &fields);

    let resolution = {
        let conn = state.db.lock().unwrap();
        guests::resolve(&conn, &draft.raw_guests)
    };
    let resolution = match resolution {
        Ok(resolution) => resolution,
        Err(e) => {
            tracing::error!(error = %TurnError::Directory(e), "guest resolution failed");
            return REPLY_DIRECTORY_DOWN.to_string();
        }
    };
    draft.resolved_guests = resolution.resolved;

    let missing = draft.missing_fields();
    let guests_blocked = state.config.strict_guests && !resolution.unresolved.is_empty();

    if !missing.is_empty() || guests_blocked {
        let reply = prompt_reply(&missing, &resolution.unresolved, state.config.strict_guests);
        session.set_draft(draft);
        return reply;
    }

    match dispatch::dispatch(state.calendar.as_ref(), &draft).await {
        Ok(confirmation) => {
            session.clear();
            match unresolved_note(&resolution.unresolved) {
                Some(note) => format!("{confirmation} {note}"),
                None => confirmation,
            }
        }
        Err(err) => {
            tracing::error!(error = %err, "event dispatch failed, keeping draft");
            let detail = match err {
                TurnError::Dispatch(detail) => detail,
                other => other.to_string(),
            };
            session.set_draft(draft);
            format!(
                "❌ Ops! Algo deu errado ao criar o evento no Google Calendar. Detalhe: {detail}. \
                 Seus dados foram guardados, é só tentar de novo em instantes."
            )
        }
    }
}

/// Upsert a contact. Requires both name and email; otherwise asks for them
/// without touching any state. A successful save also abandons any open
/// scheduling draft for this user.
fn save_contact_turn(
    state: &Arc<AppState>,
    session: &mut UserSession,
    fields: &ContactFields,
) -> String {
    let name = fields.name.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let email = fields.email.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let (Some(name), Some(email)) = (name, email) else {
        return REPLY_CONTACT_CLARIFY.to_string();
    };

    let result = {
        let conn = state.db.lock().unwrap();
        queries::upsert_contact(&conn, name, email)
    };

    match result {
        Ok(entry) => {
            session.clear();
            format!("Contato salvo: {} ({}).", entry.name, entry.email)
        }
        Err(e) if db::is_unique_violation(&e) => {
            session.clear();
            format!("O contato {name} já existia por aqui, cadastro atualizado.")
        }
        Err(e) => {
            tracing::error!(error = %TurnError::Directory(e), "contact upsert failed");
            REPLY_DIRECTORY_DOWN.to_string()
        }
    }
}

fn prompt_reply(missing: &[MissingField], unresolved: &[String], strict: bool) -> String {
    let mut reply = if missing.is_empty() {
        "Quase lá!".to_string()
    } else {
        let labels: Vec<&str> = missing.iter().map(MissingField::label).collect();
        format!(
            "Entendido! Para continuar, preciso que me informe: {}.",
            labels.join(", ")
        )
    };

    if let Some(note) = unresolved_note(unresolved) {
        reply.push(' ');
        reply.push_str(&note);
        if strict {
            reply.push_str(
                " Cadastre com \"salvar contato Nome, email\" ou me passe o email direto.",
            );
        }
    }

    reply
}

fn unresolved_note(unresolved: &[String]) -> Option<String> {
    if unresolved.is_empty() {
        return None;
    }
    Some(format!(
        "Não encontrei na agenda: {}.",
        unresolved.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_missing_in_fixed_order() {
        let reply = prompt_reply(
            &[MissingField::Date, MissingField::Time, MissingField::Guests],
            &[],
            false,
        );
        assert_eq!(
            reply,
            "Entendido! Para continuar, preciso que me informe: data, hora, convidados."
        );
    }

    #[test]
    fn test_prompt_surfaces_unresolved_guests() {
        let reply = prompt_reply(&[MissingField::Time], &["zeca".to_string()], false);
        assert!(reply.contains("hora"));
        assert!(reply.contains("Não encontrei na agenda: zeca."));
    }

    #[test]
    fn test_strict_prompt_with_nothing_missing_still_asks() {
        let reply = prompt_reply(&[], &["zeca".to_string()], true);
        assert!(reply.starts_with("Quase lá!"));
        assert!(reply.contains("zeca"));
        assert!(reply.contains("salvar contato"));
    }
}
