//! Subcommand implementations.

pub mod check;
pub mod list_rules;
pub mod output;
pub mod resolve;

/// Renders a diagnostic error through miette before handing it to anyhow.
pub fn diagnostic<E>(error: E) -> anyhow::Error
where
    E: miette::Diagnostic + Send + Sync + 'static,
{
    anyhow::anyhow!("{:?}", miette::Report::new(error))
}
