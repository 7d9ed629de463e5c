//! Weight Form View

use crate::form::{FormField, FormPhase, WeightForm};

/// Render the draft with inline field errors and the submission status.
///
/// Truck, containers and produce are hidden for direction `none`, as they
/// are neither required nor validated then.
pub fn render_form(form: &WeightForm) -> String {
    let data = form.data();
    let mut out = String::new();

    push_field(&mut out, form, FormField::Direction, "Direction", data.direction.as_str());
    if data.direction.requires_cargo() {
        push_field(&mut out, form, FormField::Truck, "Truck ID", &data.truck);
        push_field(&mut out, form, FormField::Containers, "Containers", &data.containers);
    }
    push_field(&mut out, form, FormField::Weight, "Weight", &data.weight);
    push_field(&mut out, form, FormField::Unit, "Units", data.unit.as_str());
    if data.direction.requires_cargo() {
        push_field(&mut out, form, FormField::Produce, "Produce", &data.produce);
    }
    if data.force {
        push_field(&mut out, form, FormField::Force, "Force", "yes");
    }

    match form.phase() {
        FormPhase::Editing => {}
        FormPhase::Submitting => out.push_str("\nSubmitting...\n"),
        FormPhase::Succeeded { session_id } => {
            out.push_str(&format!("\nRecorded as session {}\n", session_id))
        }
        FormPhase::Failed { message } => out.push_str(&format!("\nError: {}\n", message)),
    }

    out
}

fn push_field(out: &mut String, form: &WeightForm, field: FormField, label: &str, value: &str) {
    let shown = if value.is_empty() { "-" } else { value };
    out.push_str(&format!("{:<11} {}\n", format!("{}:", label), shown));
    if let Some(error) = form.error(field) {
        out.push_str(&format!("{:<11} ! {}\n", "", error));
    }
}
