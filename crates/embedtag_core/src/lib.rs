//! Markup helpers for legacy media embeds and external links.
//!
//! - [`quicktime`] builds an `<object>`/`<embed>` pair from a flat attribute
//!   list, routing `obj#`/`emb#` scoped attributes to one tag.
//! - [`flash`] renders Flash movies and gates them on the installed player.
//! - [`links`] targets `rel="external"` anchors at a new browsing context.

pub mod flash;
pub mod links;
pub mod logging;
pub mod model;
pub mod quicktime;
pub mod router;

pub use flash::{
    legacy_escape, request_parameter, PlayerEnvironment, PluginArchitecture, SwfObject,
    SwfOptions, WriteOutcome,
};
pub use links::{open_external_links, rewrite_external_links, Anchor};
pub use logging::{
    default_log_level, init_logging, init_logging_with, logging_status, LogConfig, LoggingError,
};
pub use model::attrs::{AttrKey, AttributeBag, TagScope};
pub use model::version::{VersionTriple, EXPRESS_INSTALL_MIN_VERSION};
pub use quicktime::{
    generate_object_text, generate_object_text_xhtml, generator_version, write_object,
    write_object_xhtml, GenerateError, MarkupDialect, QuickTimeEmbed, WriteError,
};
pub use router::{resolve, ResolvedAttr};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
