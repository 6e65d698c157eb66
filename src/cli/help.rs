use crate::cli::output;
use crate::cli::registry::{CommandRegistry, Lookup};

pub fn print_overview(registry: &CommandRegistry) {
    output::section("Available commands");
    for spec in registry.specs() {
        output::line(format!("  {:<14} {}", spec.name, spec.summary));
    }
    output::hint("Use `help <command>` for details.");
}

/// Usage for one command, or a suggestion when the name is unknown.
pub fn print_command(registry: &CommandRegistry, name: &str) {
    match registry.lookup(name) {
        Lookup::Found(spec) => {
            output::section(format!("Help: {}", spec.name));
            output::line(format!("  Description: {}", spec.summary));
            output::line(format!("  Usage: {}", spec.usage));
        }
        Lookup::Unknown { suggestion } => print_unknown(name, suggestion),
    }
}

pub fn print_unknown(input: &str, suggestion: Option<&str>) {
    output::warning(format!(
        "Unknown command `{input}`. Type `help` to see available commands."
    ));
    if let Some(best) = suggestion {
        output::hint(format!("Did you mean `{best}`?"));
    }
}
