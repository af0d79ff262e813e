use axum::response::sse::Event;
use serde_json::Value;
use std::fmt;

pub const PATCH_ELEMENTS_EVENT: &str = "datastar-patch-elements";
pub const PATCH_SIGNALS_EVENT: &str = "datastar-patch-signals";

/// Trait for getting the SSE event type name
pub trait EventType {
    fn event_type(&self) -> &'static str;
}

/// What a patch event asks the client to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchMode {
    Elements,
    Signals,
    Script,
}

/// How an element patch is merged into the DOM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ElementPatchMode {
    /// Morph the target element, matched by the fragment's root id.
    #[default]
    Outer,
    Inner,
    Replace,
    Prepend,
    Append,
    Before,
    After,
    Remove,
}

impl ElementPatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementPatchMode::Outer => "outer",
            ElementPatchMode::Inner => "inner",
            ElementPatchMode::Replace => "replace",
            ElementPatchMode::Prepend => "prepend",
            ElementPatchMode::Append => "append",
            ElementPatchMode::Before => "before",
            ElementPatchMode::After => "after",
            ElementPatchMode::Remove => "remove",
        }
    }
}

impl fmt::Display for ElementPatchMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchElements {
    pub elements: String,
    pub selector: Option<String>,
    pub mode: ElementPatchMode,
    pub use_view_transition: bool,
}

impl PatchElements {
    pub fn new(elements: impl Into<String>) -> Self {
        Self {
            elements: elements.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatchSignals {
    /// Always a JSON object; the emitter rejects anything else.
    pub signals: Value,
    pub only_if_missing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteScript {
    pub script: String,
    /// Remove the injected `<script>` tag once it has run.
    pub auto_remove: bool,
    /// Extra raw attributes for the script tag, e.g. `type="module"`.
    pub attributes: Vec<String>,
}

impl ExecuteScript {
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            auto_remove: true,
            attributes: Vec::new(),
        }
    }

    fn script_tag(&self) -> String {
        let mut open = String::from("<script");
        for attribute in &self.attributes {
            open.push(' ');
            open.push_str(attribute);
        }
        if self.auto_remove {
            open.push_str(r#" data-effect="el.remove()""#);
        }
        format!("{open}>{}</script>", self.script)
    }
}

/// One outbound patch. Each value is rendered to exactly one SSE event.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchEvent {
    Elements(PatchElements),
    Signals(PatchSignals),
    Script(ExecuteScript),
}

impl EventType for PatchEvent {
    fn event_type(&self) -> &'static str {
        match self {
            // Scripts are delivered as an element patch appending a <script> to <body>
            PatchEvent::Elements(_) | PatchEvent::Script(_) => PATCH_ELEMENTS_EVENT,
            PatchEvent::Signals(_) => PATCH_SIGNALS_EVENT,
        }
    }
}

impl PatchEvent {
    pub fn mode(&self) -> PatchMode {
        match self {
            PatchEvent::Elements(_) => PatchMode::Elements,
            PatchEvent::Signals(_) => PatchMode::Signals,
            PatchEvent::Script(_) => PatchMode::Script,
        }
    }

    /// The `data:` lines of this event, without the `data: ` prefix.
    pub fn data_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        match self {
            PatchEvent::Elements(patch) => {
                if let Some(selector) = &patch.selector {
                    lines.push(format!("selector {selector}"));
                }
                if patch.mode != ElementPatchMode::Outer {
                    lines.push(format!("mode {}", patch.mode));
                }
                if patch.use_view_transition {
                    lines.push("useViewTransition true".to_string());
                }
                push_prefixed(&mut lines, "elements", &patch.elements);
            }
            PatchEvent::Signals(patch) => {
                if patch.only_if_missing {
                    lines.push("onlyIfMissing true".to_string());
                }
                push_prefixed(&mut lines, "signals", &patch.signals.to_string());
            }
            PatchEvent::Script(script) => {
                lines.push("selector body".to_string());
                lines.push(format!("mode {}", ElementPatchMode::Append));
                push_prefixed(&mut lines, "elements", &script.script_tag());
            }
        }

        lines
    }

    pub fn to_sse_event(&self) -> Event {
        Event::default()
            .event(self.event_type())
            .data(self.data_lines().join("\n"))
    }
}

fn push_prefixed(lines: &mut Vec<String>, key: &str, text: &str) {
    for line in text.lines() {
        lines.push(format!("{key} {}", line.replace('\r', "")));
    }
}
