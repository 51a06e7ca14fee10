use crate::state::form::{FormState, SubmitOutcome};

pub fn form_to_json(form: &FormState) -> serde_json::Value {
    let errors = form.errors();
    let invalid = errors
        .visible_entries()
        .map(|(field, _)| field.as_str())
        .collect::<Vec<_>>();

    serde_json::json!({
        "values": form.values(),
        "errors": errors,
        "invalid": invalid,
        "has_errors": form.has_errors(),
    })
}

pub fn outcome_to_json(outcome: SubmitOutcome) -> serde_json::Value {
    serde_json::json!(match outcome {
        SubmitOutcome::Submitted => "submitted",
        SubmitOutcome::Blocked => "blocked",
    })
}
