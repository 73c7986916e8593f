//! Console summary of persona profiles.

use std::fmt::Write;

use personas_core::PersonaProfile;

/// Render the personas as a plain-text report.
pub(crate) fn render_summary<'a>(
    personas: impl IntoIterator<Item = &'a PersonaProfile>,
    total_participants: usize,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== PERSONA ANALYSIS RESULTS ===");
    let _ = writeln!(out, "Participants: {total_participants}");

    let mut any = false;
    for persona in personas {
        any = true;
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} ({} participants, {:.1}%)",
            persona.name, persona.size, persona.percentage
        );
        let _ = writeln!(out, "Description: {}", persona.description);
        let _ = writeln!(out, "Key characteristics:");
        for (name, value) in persona.characteristics.named() {
            let _ = writeln!(out, "  - {name}: {value:.3}");
        }
    }

    if !any {
        let _ = writeln!(out, "No personas: no participants were found.");
    }
    out
}
