//! Clap adapter.
//!
//! Compiled only when the `clap` Cargo feature is enabled (on by default).
//! [`IniArgs`] and [`IniSubcommand`] can be embedded into an application's
//! `#[derive(Parser)]` struct to get `list|sections|get|set|unset|remove-section`
//! subcommands over its settings file.
//!
//! The only bridge to the core is [`IniArgs::into_action()`], which converts
//! clap-parsed arguments into an [`IniAction`](crate::IniAction). Without
//! clap, construct `IniAction` values directly.

use clap::{Args, Subcommand};

use crate::types::IniAction;

/// Clap-derived args for a settings subcommand group.
///
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     #[command(subcommand)]
///     command: Commands,
/// }
///
/// #[derive(Subcommand)]
/// enum Commands {
///     Settings(IniArgs),
/// }
/// ```
#[derive(Debug, Args)]
pub struct IniArgs {
    /// Section to operate on. Omit for properties above the first header.
    #[arg(long, short, global = true)]
    pub section: Option<String>,

    #[command(subcommand)]
    pub action: Option<IniSubcommand>,
}

/// Available settings subcommands.
#[derive(Debug, Subcommand)]
pub enum IniSubcommand {
    /// Show properties, of one section with `--section`, else of all sections.
    List,
    /// Show section names.
    Sections,
    /// Show the value of a property.
    Get { key: String },
    /// Write a property, keeping the rest of the file as it is.
    Set { key: String, value: String },
    /// Remove a property.
    Unset { key: String },
    /// Remove a section with all its properties. Requires `--section`.
    RemoveSection,
}

impl IniArgs {
    /// Convert clap-parsed args into a framework-agnostic `IniAction`.
    ///
    /// Bare invocation (no subcommand) and explicit `list` both map to
    /// `IniAction::List`.
    pub fn into_action(self) -> IniAction {
        let scoped = self.section.clone();
        let section = self.section.unwrap_or_default();
        match self.action {
            None | Some(IniSubcommand::List) => IniAction::List { section: scoped },
            Some(IniSubcommand::Sections) => IniAction::Sections,
            Some(IniSubcommand::Get { key }) => IniAction::Get { section, key },
            Some(IniSubcommand::Set { key, value }) => IniAction::Set {
                section,
                key,
                value,
            },
            Some(IniSubcommand::Unset { key }) => IniAction::Unset { section, key },
            Some(IniSubcommand::RemoveSection) => IniAction::RemoveSection { section },
        }
    }
}
