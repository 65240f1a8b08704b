//! Formatting-preserving INI documents, and a typed settings store on top of
//! them.
//!
//! Most INI libraries parse a file into a map and write the map back out,
//! losing comments, blank lines, key order and spacing on the way. Inidoc
//! keeps every line of the original file and edits it surgically:
//!
//! ```ignore
//! let mut store = IniSettingsStore::load(b"; tuned by hand\nport = 8080\n")?;
//! store.store("", "port", &9090u32)?;
//! assert_eq!(store.save(), b"; tuned by hand\nport = 9090\n");
//! ```
//!
//! # Layers
//!
//! - **[`IniDocument`]**: the byte-level model. Lines live in an arena and
//!   form a doubly-linked list; a section index maps names to line handles.
//!   Reads and writes deal in raw value bytes.
//! - **[`IniSettingsStore`]**: typed access through [`FromIniValue`] and
//!   [`ToIniValue`], plus loading and saving whole files.
//! - **[`IniSettings`]**: a builder that locates an application's settings
//!   file (platform config directory by default) and runs [`IniAction`]s
//!   against it.
//!
//! # Formatting rules
//!
//! An unmodified document serializes to exactly the bytes it was parsed
//! from, including malformed lines, CR-LF terminators and a missing final
//! newline. Edits follow the file's own conventions:
//!
//! - **Updates** replace only the value token. Names, whitespace around `=`
//!   and trailing comments stay untouched. A quoted value stays quoted.
//! - **Inserts** go right after the last property of the section. The new
//!   line copies the file's newline sequence and its `key = value` versus
//!   `key=value` style. A missing section is appended at the end, preceded
//!   by a blank line if the file separates its sections that way.
//! - **Deletes** remove property lines (or a section's headers and
//!   properties) and nothing else.
//!
//! Values are written in double quotes when they are empty or contain
//! whitespace or one of `; # = " [ ]`. Inside quotes a literal quote is
//! doubled: `say = "he said ""hi"""`.
//!
//! # Dialect
//!
//! - `[name]` starts a section. Repeated headers for the same name merge
//!   into one logical section.
//! - `name = value` declares a property. Properties above the first header
//!   belong to the root section, named `""`.
//! - `;` and `#` start comments, unless quoted.
//! - `[Section] name = value` on a single line is split into a header line
//!   and a property line.
//! - Anything else is kept verbatim and ignored.
//! - When a key appears twice in a section, the last occurrence is read
//!   and updated. Deleting the key removes every occurrence.
//!
//! # Typed values
//!
//! | Type | Accepted | Written as |
//! |------|----------|------------|
//! | `bool` | `1 0 true false yes no on off`, any case | `1` / `0` |
//! | `u32`, `u64` | ASCII digits | shortest decimal |
//! | `i32`, `i64` | optional `+`/`-`, digits | shortest decimal |
//! | `f32`, `f64` | Rust float syntax | shortest round-trip form |
//! | `String` | valid UTF-8 | verbatim |
//! | `Vec<u8>` | anything | verbatim |
//!
//! [`IniSettingsStore::retrieve`] returns `None` for a missing key and for a
//! value that does not decode; [`IniSettingsStore::try_retrieve`] tells the
//! two apart.
//!
//! # Clap adapter
//!
//! The `cli` module (behind the `clap` feature, on by default) provides
//! [`IniArgs`], a derive struct to embed in an application's subcommands.
//! It gives users `list|sections|get|set|unset|remove-section` with a global
//! `--section` flag; [`into_action()`](IniArgs::into_action) bridges to the
//! framework-free core. To use inidoc without clap:
//!
//! ```toml
//! inidoc = { version = "...", default-features = false }
//! ```
//!
//! # Error handling
//!
//! All fallible operations return [`IniError`]. A failed edit leaves the
//! document exactly as it was: new lines are fully built before anything is
//! linked in, and allocation failure is reported as
//! [`IniError::OutOfMemory`] rather than aborting.
//!
//! # Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events: `debug` for
//! loads, saves and new sections, `trace` for individual edits and for
//! malformed lines the parser kept verbatim. No subscriber is installed.

pub mod error;
pub mod types;
pub mod value;

mod builder;
mod chars;
#[cfg(feature = "clap")]
mod cli;
mod document;
mod file;
mod line;
mod ops;
mod parse;
mod persist;
mod store;

#[cfg(test)]
mod fixtures;

pub use builder::{IniSettings, IniSettingsBuilder};
#[cfg(feature = "clap")]
pub use cli::{IniArgs, IniSubcommand};
pub use document::IniDocument;
pub use error::IniError;
pub use ops::{Entry, IniResult, execute};
pub use parse::Newline;
pub use store::IniSettingsStore;
pub use types::{IniAction, SearchPath};
pub use value::{FromIniValue, ToIniValue};
