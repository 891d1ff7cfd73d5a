//! `cursus suggest` command: one-shot debounced completion.

use chrono::Duration;

use crate::context::ServiceContext;
use crate::generate::GenerationError;
use crate::ports::{PartRequest, ProducedPart};
use crate::suggest::{Suggestion, SuggestionDebouncer, SuggestState, DEBOUNCE_MS};

/// Runs the submitted draft through the debouncer and prints the
/// completion.
///
/// A one-shot CLI invocation has no further keystrokes coming, so the
/// draft is settled by construction: polling is done at one window past
/// the input instead of waiting it out.
///
/// # Errors
///
/// Returns an error string if the producer call fails.
pub async fn run(ctx: &ServiceContext, draft: &str) -> Result<(), String> {
    let mut debouncer = SuggestionDebouncer::new();
    let now = ctx.clock.now();
    debouncer.on_input(draft, now);

    if debouncer.state() == &SuggestState::Idle {
        println!("(draft too short for suggestions — keep typing)");
        return Ok(());
    }

    let Some(ticket) = debouncer.poll(now + Duration::milliseconds(DEBOUNCE_MS)) else {
        return Err("suggestion window did not settle".to_string());
    };

    let produced = ctx
        .producer
        .produce(&PartRequest::Suggestion { draft: ticket.text.clone() })
        .await
        .map_err(|e| GenerationError::from_boundary(&*e).to_string())?;
    let completion = match produced {
        ProducedPart::Suggestion(completion) => completion,
        other => {
            return Err(GenerationError::wrong_shape("suggestion", other.variant_name())
                .to_string())
        }
    };

    debouncer.on_result(&ticket, Suggestion { completion });
    let suggestion = debouncer.consume().ok_or("suggestion was invalidated")?;

    println!("{draft}{}", suggestion.completion);
    Ok(())
}
