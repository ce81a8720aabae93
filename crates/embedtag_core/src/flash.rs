//! Flash object markup with player version gating.
//!
//! # Responsibility
//! - Hold the attributes, params and flashvars of one SWF movie.
//! - Render `<embed>` (plugin browsers) or `<object>` (ActiveX) markup.
//! - Decide between rendering, express install, redirecting or doing nothing,
//!   given the host's installed player version.
//!
//! # Invariants
//! - Params and variables keep first-insertion order; re-adding replaces in place.
//! - `write` never mutates the object; express-install state is per call.
//! - Values are emitted verbatim, without escaping.

use crate::model::version::{VersionTriple, EXPRESS_INSTALL_MIN_VERSION};
use log::debug;
use serde::{Deserialize, Serialize};

/// ActiveX class id of the Shockwave Flash control.
pub const FLASH_CLASSID: &str = "clsid:D27CDB6E-AE6D-11cf-96B8-444553540000";
/// Query parameter that bypasses player detection when non-empty.
pub const DEFAULT_DETECT_KEY: &str = "detectflash";
/// Quality param used when the caller sets none.
pub const DEFAULT_QUALITY: &str = "high";

const TITLE_PREFIX_UNITS: usize = 47;
const INSTALL_TITLE_SUFFIX: &str = " - Flash Player Installation";
const ESCAPE_SAFE_CHARS: &str = "@*_+-./";

/// Plugin hosting model of the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginArchitecture {
    /// `navigator.plugins` style browsers; rendered as `<embed>`.
    Netscape,
    /// Internet Explorer; rendered as `<object>`.
    ActiveX,
}

impl PluginArchitecture {
    fn player_type(self) -> &'static str {
        match self {
            Self::Netscape => "PlugIn",
            Self::ActiveX => "ActiveX",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Netscape => "netscape",
            Self::ActiveX => "activex",
        }
    }
}

/// Construction options for [`SwfObject`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwfOptions {
    pub swf: String,
    pub id: String,
    pub width: String,
    pub height: String,
    /// Minimum player version the movie requires.
    pub version: VersionTriple,
    pub bgcolor: Option<String>,
    pub quality: String,
    pub use_express_install: bool,
    /// Where express install returns to; the host location when unset.
    pub xi_redirect_url: Option<String>,
    /// Where to send browsers whose player is too old.
    pub redirect_url: Option<String>,
    pub detect_key: String,
}

impl Default for SwfOptions {
    fn default() -> Self {
        Self {
            swf: String::new(),
            id: String::new(),
            width: String::new(),
            height: String::new(),
            version: VersionTriple::default(),
            bgcolor: None,
            quality: DEFAULT_QUALITY.to_string(),
            use_express_install: false,
            xi_redirect_url: None,
            redirect_url: None,
            detect_key: DEFAULT_DETECT_KEY.to_string(),
        }
    }
}

/// What the host sees when the movie is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerEnvironment {
    pub architecture: PluginArchitecture,
    pub installed: VersionTriple,
    /// Location search string, or the hash when there is no search.
    pub query: String,
    /// Current document location.
    pub location: String,
    pub document_title: String,
}

impl PlayerEnvironment {
    pub fn new(architecture: PluginArchitecture, installed: VersionTriple) -> Self {
        Self {
            architecture,
            installed,
            query: String::new(),
            location: String::new(),
            document_title: String::new(),
        }
    }
}

/// Result of [`SwfObject::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Insert `markup`; set the document title when `document_title` is present.
    Render {
        markup: String,
        document_title: Option<String>,
    },
    /// Player too old; navigate to this URL.
    Redirect(String),
    /// Player too old and no redirect configured.
    Skip,
}

/// One Flash movie and its embed configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwfObject {
    swf: String,
    id: String,
    width: String,
    height: String,
    version: VersionTriple,
    use_express_install: bool,
    xi_redirect_url: Option<String>,
    redirect_url: String,
    detect_key: String,
    params: Vec<(String, String)>,
    variables: Vec<(String, String)>,
}

impl SwfObject {
    pub fn new(options: SwfOptions) -> Self {
        let quality = if options.quality.is_empty() {
            DEFAULT_QUALITY.to_string()
        } else {
            options.quality
        };
        let detect_key = if options.detect_key.is_empty() {
            DEFAULT_DETECT_KEY.to_string()
        } else {
            options.detect_key
        };

        let mut object = Self {
            swf: options.swf,
            id: options.id,
            width: options.width,
            height: options.height,
            version: options.version,
            use_express_install: options.use_express_install,
            xi_redirect_url: options.xi_redirect_url.filter(|url| !url.is_empty()),
            redirect_url: options.redirect_url.unwrap_or_default(),
            detect_key,
            params: Vec::new(),
            variables: Vec::new(),
        };
        if let Some(bgcolor) = options.bgcolor.filter(|color| !color.is_empty()) {
            object.add_param("bgcolor", bgcolor);
        }
        object.add_param("quality", quality);
        object
    }

    pub fn add_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        set_ordered(&mut self.params, name.into(), value.into());
    }

    pub fn add_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        set_ordered(&mut self.variables, name.into(), value.into());
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Flashvars as `name=value` strings, in insertion order.
    pub fn variable_pairs(&self) -> Vec<String> {
        pairs_of(&self.variables)
    }

    /// Renders markup for `architecture` with the current variables.
    pub fn render(&self, architecture: PluginArchitecture) -> String {
        self.render_with(architecture, &self.variables)
    }

    /// Decides what the host should do with this movie.
    ///
    /// Express install applies when enabled and the installed player is at
    /// least 6.0.65 but older than the required version.
    pub fn write(&self, env: &PlayerEnvironment) -> WriteOutcome {
        let mut variables = self.variables.clone();
        let mut document_title = None;

        let express_install = self.use_express_install
            && env.installed.is_at_least(&EXPRESS_INSTALL_MIN_VERSION)
            && !env.installed.is_at_least(&self.version);
        if express_install {
            let return_url = self.xi_redirect_url.as_deref().unwrap_or(&env.location);
            set_ordered(
                &mut variables,
                "MMredirectURL".to_string(),
                legacy_escape(return_url),
            );
            let title = format!(
                "{}{INSTALL_TITLE_SUFFIX}",
                title_prefix(&env.document_title)
            );
            set_ordered(&mut variables, "MMdoctitle".to_string(), title.clone());
            document_title = Some(title);
        }

        let skip_detect = !request_parameter(&env.query, &self.detect_key).is_empty();
        let outcome = if skip_detect
            || express_install
            || env.installed.is_at_least(&self.version)
        {
            if express_install {
                set_ordered(
                    &mut variables,
                    "MMplayerType".to_string(),
                    env.architecture.player_type().to_string(),
                );
            }
            WriteOutcome::Render {
                markup: self.render_with(env.architecture, &variables),
                document_title,
            }
        } else if !self.redirect_url.is_empty() {
            WriteOutcome::Redirect(self.redirect_url.clone())
        } else {
            WriteOutcome::Skip
        };

        debug!(
            "event=swf_write module=flash status={} architecture={} installed={} required={} express_install={} skip_detect={}",
            outcome_label(&outcome),
            env.architecture.as_str(),
            env.installed,
            self.version,
            express_install,
            skip_detect
        );
        outcome
    }

    fn render_with(&self, architecture: PluginArchitecture, variables: &[(String, String)]) -> String {
        let flashvars = pairs_of(variables).join("&");
        match architecture {
            PluginArchitecture::Netscape => {
                let mut node = format!(
                    "<embed type=\"application/x-shockwave-flash\" src=\"{}\" width=\"{}\" height=\"{}\"",
                    self.swf, self.width, self.height
                );
                node.push_str(&format!(" id=\"{0}\" name=\"{0}\" ", self.id));
                for (name, value) in &self.params {
                    node.push_str(&format!("{name}=\"{value}\" "));
                }
                if !flashvars.is_empty() {
                    node.push_str(&format!("flashvars=\"{flashvars}\""));
                }
                node.push_str("/>");
                node
            }
            PluginArchitecture::ActiveX => {
                let mut node = format!(
                    "<object id=\"{}\" classid=\"{FLASH_CLASSID}\" width=\"{}\" height=\"{}\">",
                    self.id, self.width, self.height
                );
                node.push_str(&format!("<param name=\"movie\" value=\"{}\" />", self.swf));
                for (name, value) in &self.params {
                    node.push_str(&format!("<param name=\"{name}\" value=\"{value}\" />"));
                }
                if !flashvars.is_empty() {
                    node.push_str(&format!(
                        "<param name=\"flashvars\" value=\"{flashvars}\" />"
                    ));
                }
                node.push_str("</object>");
                node
            }
        }
    }
}

/// Returns the value of `name` in a location query/hash string.
///
/// The value runs from after `name=` to the next `&` or the end. Returns an
/// empty string when the parameter is absent or the query is a bare `?`.
pub fn request_parameter(query: &str, name: &str) -> String {
    if query.len() <= 1 {
        return String::new();
    }
    let needle = format!("{name}=");
    let Some(start) = query.find(&needle) else {
        return String::new();
    };
    let value_start = start + needle.len();
    let end = query[start..]
        .find('&')
        .map(|offset| start + offset)
        .unwrap_or(query.len());
    query
        .get(value_start..end)
        .map(str::to_string)
        .unwrap_or_default()
}

/// Percent-encodes `value` the way legacy `escape()` does.
///
/// ASCII letters, digits and `@*_+-./` pass through; other UTF-16 code units
/// become `%XX` below 256 and `%uXXXX` above.
pub fn legacy_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for unit in value.encode_utf16() {
        match char::from_u32(u32::from(unit)) {
            Some(c) if c.is_ascii_alphanumeric() || ESCAPE_SAFE_CHARS.contains(c) => {
                escaped.push(c)
            }
            _ if unit < 256 => escaped.push_str(&format!("%{unit:02X}")),
            _ => escaped.push_str(&format!("%u{unit:04X}")),
        }
    }
    escaped
}

/// First 47 UTF-16 code units of `title`; a split surrogate pair becomes U+FFFD.
fn title_prefix(title: &str) -> String {
    let units: Vec<u16> = title.encode_utf16().take(TITLE_PREFIX_UNITS).collect();
    String::from_utf16_lossy(&units)
}

fn set_ordered(entries: &mut Vec<(String, String)>, name: String, value: String) {
    match entries.iter_mut().find(|(key, _)| *key == name) {
        Some((_, slot)) => *slot = value,
        None => entries.push((name, value)),
    }
}

fn pairs_of(entries: &[(String, String)]) -> Vec<String> {
    entries
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect()
}

fn outcome_label(outcome: &WriteOutcome) -> &'static str {
    match outcome {
        WriteOutcome::Render { .. } => "render",
        WriteOutcome::Redirect(_) => "redirect",
        WriteOutcome::Skip => "skip",
    }
}
