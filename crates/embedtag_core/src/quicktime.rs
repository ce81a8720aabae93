//! QuickTime object/embed markup generation.
//!
//! # Responsibility
//! - Turn a flat argument list into an `<object>` tag with a nested `<embed>`
//!   fallback, routing each attribute to the tag(s) it belongs to.
//! - Reject malformed argument lists with a typed error instead of output.
//!
//! # Invariants
//! - Output is a pure function of the arguments.
//! - Each attribute name appears at most once per generated tag.
//! - `emb#` keys never reach the object tag; `obj#` keys never reach the embed.
//! - Values are emitted verbatim, without escaping.

use crate::model::attrs::{AttrKey, AttributeBag, TagScope};
use crate::router::resolve;
use log::{debug, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};

/// ActiveX class id of the QuickTime control.
pub const QUICKTIME_CLASSID: &str = "clsid:02BF25D5-8C17-4B23-BC80-D3488ABDDC6B";
/// Download page advertised to browsers without the plugin.
pub const QUICKTIME_PLUGINSPAGE: &str = "http://www.apple.com/quicktime/download/";
/// Cab location; the ActiveX version is appended.
pub const QUICKTIME_CODEBASE_PREFIX: &str = "http://www.apple.com/qtactivex/qtplugin.cab#version=";
/// ActiveX version used when the caller passes none.
pub const DEFAULT_ACTIVEX_VERSION: &str = "6,0,2,0";

const GENERATOR_VERSION: &str = "1.0";
const FIXED_ARG_COUNT: usize = 4;

/// Object tag attributes, in output order, with their emitted name override.
const OBJECT_ATTRS: &[(&str, Option<&str>)] = &[
    ("classid", None),
    ("width", None),
    ("height", None),
    ("codebase", None),
    ("name", Some("id")),
    ("tabindex", None),
    ("hspace", None),
    ("vspace", None),
    ("border", None),
    ("align", None),
    ("class", None),
    ("title", None),
    ("accesskey", None),
    ("noexternaldata", None),
];

const EMBED_ATTRS: &[&str] = &[
    "src",
    "width",
    "height",
    "pluginspage",
    "name",
    "align",
    "tabindex",
];

/// Names handled by the fixed passes; never repeated as generic attributes.
const CONSUMED_ATTRS: &[&str] = &[
    "src",
    "width",
    "height",
    "pluginspage",
    "classid",
    "codebase",
    "name",
    "tabindex",
    "hspace",
    "vspace",
    "border",
    "align",
    "noexternaldata",
    "class",
    "title",
    "accesskey",
];

/// Version of the markup generator.
pub fn generator_version() -> &'static str {
    GENERATOR_VERSION
}

/// Closing style of the `<param>` elements nested in the object tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkupDialect {
    #[default]
    Html,
    Xhtml,
}

impl MarkupDialect {
    fn param_close(self) -> &'static str {
        match self {
            Self::Html => ">",
            Self::Xhtml => " />",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Xhtml => "xhtml",
        }
    }
}

/// Markup generation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// Fewer than the four fixed arguments, or an unpaired attribute name.
    ArgumentCount { caller: String, count: usize },
}

impl Display for GenerateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ArgumentCount { caller, .. } => write!(
                f,
                "The \"{caller}\" function requires an even number of arguments.\n\
                 Arguments should be in the form \"atttributeName\", \"attributeValue\", ..."
            ),
        }
    }
}

impl Error for GenerateError {}

/// Errors from the writer entry points.
#[derive(Debug)]
pub enum WriteError {
    Generate(GenerateError),
    Io(io::Error),
}

impl Display for WriteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generate(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "failed to write markup: {err}"),
        }
    }
}

impl Error for WriteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Generate(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<GenerateError> for WriteError {
    fn from(value: GenerateError) -> Self {
        Self::Generate(value)
    }
}

impl From<io::Error> for WriteError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Generates HTML markup from `[src, width, height, version, name, value, ...]`.
pub fn generate_object_text(args: &[Option<&str>]) -> Result<String, GenerateError> {
    generate("generate_object_text", MarkupDialect::Html, args)
}

/// Same as [`generate_object_text`] with self-closing `<param />` elements.
pub fn generate_object_text_xhtml(args: &[Option<&str>]) -> Result<String, GenerateError> {
    generate("generate_object_text_xhtml", MarkupDialect::Xhtml, args)
}

/// Writes HTML markup followed by a newline.
pub fn write_object<W: Write>(writer: &mut W, args: &[Option<&str>]) -> Result<(), WriteError> {
    let markup = generate("write_object", MarkupDialect::Html, args)?;
    writeln!(writer, "{markup}")?;
    Ok(())
}

/// Writes XHTML markup followed by a newline.
pub fn write_object_xhtml<W: Write>(
    writer: &mut W,
    args: &[Option<&str>],
) -> Result<(), WriteError> {
    let markup = generate("write_object_xhtml", MarkupDialect::Xhtml, args)?;
    writeln!(writer, "{markup}")?;
    Ok(())
}

/// Generates markup from a raw argument list.
///
/// `caller` only names the entry point in the error message.
///
/// # Errors
/// - `ArgumentCount` when `args` has fewer than four entries or an odd length.
pub fn generate(
    caller: &str,
    dialect: MarkupDialect,
    args: &[Option<&str>],
) -> Result<String, GenerateError> {
    if args.len() < FIXED_ARG_COUNT || args.len() % 2 != 0 {
        warn!(
            "event=qt_generate module=quicktime status=error error_code=argument_count caller={} arg_count={}",
            caller,
            args.len()
        );
        return Err(GenerateError::ArgumentCount {
            caller: caller.to_string(),
            count: args.len(),
        });
    }

    let pairs = args[FIXED_ARG_COUNT..]
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]));
    let bag = build_bag(args[0], args[1], args[2], args[3], pairs);
    Ok(assemble(&bag, dialect))
}

/// Typed front end for [`generate`]; the argument count is always valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickTimeEmbed {
    src: String,
    width: String,
    height: String,
    activex_version: Option<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl QuickTimeEmbed {
    pub fn new(
        src: impl Into<String>,
        width: impl Into<String>,
        height: impl Into<String>,
    ) -> Self {
        Self {
            src: src.into(),
            width: width.into(),
            height: height.into(),
            activex_version: None,
            attrs: Vec::new(),
        }
    }

    /// Overrides the ActiveX control version in the codebase URL.
    pub fn activex_version(mut self, version: impl Into<String>) -> Self {
        self.activex_version = Some(version.into());
        self
    }

    /// Adds one attribute; `obj#` / `emb#` prefixes restrict it to one tag.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), Some(value.into())));
        self
    }

    /// Renders the markup in `dialect`.
    pub fn render(&self, dialect: MarkupDialect) -> String {
        let pairs = self
            .attrs
            .iter()
            .map(|(name, value)| (Some(name.as_str()), value.as_deref()));
        let bag = build_bag(
            Some(self.src.as_str()),
            Some(self.width.as_str()),
            Some(self.height.as_str()),
            self.activex_version.as_deref(),
            pairs,
        );
        assemble(&bag, dialect)
    }
}

fn build_bag<'a>(
    src: Option<&str>,
    width: Option<&str>,
    height: Option<&str>,
    activex_version: Option<&str>,
    pairs: impl Iterator<Item = (Option<&'a str>, Option<&'a str>)>,
) -> AttributeBag {
    let mut bag = AttributeBag::new();
    let owned = |value: Option<&str>| value.map(str::to_string);

    bag.insert(AttrKey::shared("src"), owned(src));
    bag.insert(AttrKey::shared("width"), owned(width));
    bag.insert(AttrKey::shared("height"), owned(height));
    bag.insert(
        AttrKey::shared("classid"),
        Some(QUICKTIME_CLASSID.to_string()),
    );
    bag.insert(
        AttrKey::shared("pluginspage"),
        Some(QUICKTIME_PLUGINSPAGE.to_string()),
    );

    let version = activex_version
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_ACTIVEX_VERSION);
    bag.insert(
        AttrKey::shared("codebase"),
        Some(format!("{QUICKTIME_CODEBASE_PREFIX}{version}")),
    );

    for (name, value) in pairs {
        let Some(name) = name else {
            warn!("event=qt_generate module=quicktime status=skipped reason=missing_attr_name");
            continue;
        };
        let mut key = AttrKey::parse(&name.to_lowercase());
        // `name` feeds the embed tag and `id` the object tag; one slot holds both.
        // Scoped `obj#id` / `emb#id` stay ordinary attributes.
        if key.scope.is_none() && key.name == "id" {
            key.name = "name".to_string();
        }
        bag.insert(key, owned(value));
    }

    bag
}

fn assemble(bag: &AttributeBag, dialect: MarkupDialect) -> String {
    let mut object_tag = String::from("<object ");
    for (name, tag_name) in OBJECT_ATTRS {
        push_attr(&mut object_tag, bag, TagScope::Object, name, *tag_name);
    }
    object_tag.push_str(">\n");
    push_param(&mut object_tag, bag, &AttrKey::shared("src"), dialect);

    let mut embed_tag = String::from("  <embed ");
    for name in EMBED_ATTRS {
        push_attr(&mut embed_tag, bag, TagScope::Embed, name, None);
    }

    let mut remaining = bag.clone();
    for name in CONSUMED_ATTRS {
        remaining.remove_name(name);
    }

    let mut object_names = HashSet::new();
    let mut embed_names = HashSet::new();
    for (key, value) in remaining.iter() {
        if value.is_none() {
            continue;
        }
        if !embed_names.contains(&key.name) {
            if let Some(attr) = resolve(&remaining, TagScope::Embed, key, None) {
                embed_tag.push_str(&format!("{}=\"{}\" ", attr.tag_name, attr.value));
                embed_names.insert(key.name.clone());
            }
        }
        if !object_names.contains(&key.name)
            && push_param(&mut object_tag, &remaining, key, dialect)
        {
            object_names.insert(key.name.clone());
        }
    }

    debug!(
        "event=qt_generate module=quicktime status=ok dialect={} object_params={} embed_attrs={}",
        dialect.as_str(),
        object_names.len(),
        embed_names.len()
    );

    object_tag + &embed_tag + "> </embed>\n</object>"
}

fn push_attr(
    tag: &mut String,
    bag: &AttributeBag,
    scope: TagScope,
    name: &str,
    tag_name: Option<&str>,
) {
    let key = AttrKey::shared(name);
    if let Some(attr) = resolve(bag, scope, &key, tag_name) {
        tag.push_str(&format!("{}=\"{}\" ", attr.tag_name, attr.value));
    }
}

/// Appends an object `<param>`; returns whether one was written.
fn push_param(tag: &mut String, bag: &AttributeBag, key: &AttrKey, dialect: MarkupDialect) -> bool {
    match resolve(bag, TagScope::Object, key, None) {
        Some(attr) => {
            tag.push_str(&format!(
                "  <param name=\"{}\" value=\"{}\"{}\n",
                attr.tag_name,
                attr.value,
                dialect.param_close()
            ));
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        generate, generate_object_text, generator_version, MarkupDialect, QuickTimeEmbed,
    };

    #[test]
    fn minimal_call_matches_legacy_layout() {
        let markup = generate_object_text(&[Some("movie.mov"), Some("320"), Some("256"), None])
            .expect("four fixed args are valid");

        let expected = concat!(
            "<object classid=\"clsid:02BF25D5-8C17-4B23-BC80-D3488ABDDC6B\" width=\"320\" height=\"256\" ",
            "codebase=\"http://www.apple.com/qtactivex/qtplugin.cab#version=6,0,2,0\" >\n",
            "  <param name=\"src\" value=\"movie.mov\">\n",
            "  <embed src=\"movie.mov\" width=\"320\" height=\"256\" ",
            "pluginspage=\"http://www.apple.com/quicktime/download/\" > </embed>\n",
            "</object>"
        );
        assert_eq!(markup, expected);
    }

    #[test]
    fn empty_version_falls_back_to_default() {
        let markup = generate_object_text(&[Some("a.mov"), Some("1"), Some("2"), Some("")])
            .expect("valid args");
        assert!(markup.contains("#version=6,0,2,0\""));

        let markup = generate_object_text(&[Some("a.mov"), Some("1"), Some("2"), Some("7,3,0,0")])
            .expect("valid args");
        assert!(markup.contains("#version=7,3,0,0\""));
    }

    #[test]
    fn xhtml_dialect_self_closes_params() {
        let markup = generate(
            "test",
            MarkupDialect::Xhtml,
            &[Some("a.mov"), Some("1"), Some("2"), None, Some("autoplay"), Some("true")],
        )
        .expect("valid args");
        assert!(markup.contains("  <param name=\"src\" value=\"a.mov\" />\n"));
        assert!(markup.contains("  <param name=\"autoplay\" value=\"true\" />\n"));
    }

    #[test]
    fn builder_matches_raw_arguments() {
        let built = QuickTimeEmbed::new("clip.mov", "480", "272")
            .activex_version("7,0,0,0")
            .attr("Name", "clip")
            .attr("emb#Controller", "FALSE")
            .render(MarkupDialect::Html);
        let raw = generate_object_text(&[
            Some("clip.mov"),
            Some("480"),
            Some("272"),
            Some("7,0,0,0"),
            Some("Name"),
            Some("clip"),
            Some("emb#Controller"),
            Some("FALSE"),
        ])
        .expect("valid args");
        assert_eq!(built, raw);
        assert!(built.contains("controller=\"FALSE\" "));
    }

    #[test]
    fn missing_attribute_name_is_skipped() {
        let markup = generate_object_text(&[
            Some("a.mov"),
            Some("1"),
            Some("2"),
            None,
            None,
            Some("orphan"),
        ])
        .expect("count is still even");
        assert!(!markup.contains("orphan"));
    }

    #[test]
    fn generator_version_is_stable() {
        assert_eq!(generator_version(), "1.0");
    }
}
