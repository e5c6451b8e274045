//! List rules command implementation.

use archtag::rules::all_validators;
use archtag::ValueShape;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<20} {:<14} Description", "Rule", "Value");
    println!("{}", "-".repeat(80));

    for validator in all_validators() {
        let rule = validator.rule();
        println!(
            "{:<20} {:<14} {}",
            rule.as_str(),
            shape_label(rule.value_shape()),
            validator.description()
        );
    }

    println!("\nConstraints may skip a file with `unless`:");
    println!("  @intent:<name>   file declares the intent");
    println!("  import:<module>  file imports the module");
    println!("  @<Decorator>     a class carries the decorator");
    println!("  path:<glob>      file path matches the glob");
}

fn shape_label(shape: ValueShape) -> &'static str {
    match shape {
        ValueShape::Text => "text",
        ValueShape::TextOrList => "text or list",
        ValueShape::Number => "number",
    }
}
