//! Purpose: Render a JSON value as indented text with optional ANSI colorization.
//! Exports: `RenderOptions`, `render_json`, `pretty_json`, `DEFAULT_INDENT`, `MAX_INDENT`.
//! Role: Small, pure formatter used by the reporter for the success payload.
//! Invariants: With color off, output equals serde_json's `PrettyFormatter` at the same indent.
//! Invariants: ANSI escapes appear only when explicitly enabled.
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};

pub const DEFAULT_INDENT: usize = 2;
pub const MAX_INDENT: usize = 16;

// 8/16-color palette; bright variants wash out on light themes.
const COLOR_KEY: &str = "36";
const COLOR_STRING: &str = "32";
const COLOR_NUMBER: &str = "33";
const COLOR_BOOL: &str = "35";
const COLOR_NULL: &str = "39";
const COLOR_PUNCT: &str = "39";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RenderOptions {
    pub indent: usize,
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            color: false,
        }
    }
}

pub fn render_json(value: &Value, options: RenderOptions) -> String {
    if !options.color {
        return pretty_json(value, options.indent);
    }
    let mut writer = Writer {
        unit: " ".repeat(options.indent.min(MAX_INDENT)),
        out: String::new(),
    };
    writer.value(value, 0);
    writer.out
}

/// Uncolored rendering through serde_json's own pretty printer.
pub fn pretty_json(value: &Value, indent: usize) -> String {
    let unit = " ".repeat(indent.min(MAX_INDENT));
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(unit.as_bytes());
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    if value.serialize(&mut ser).is_err() {
        return "null".to_string();
    }
    String::from_utf8(buf).unwrap_or_else(|_| "null".to_string())
}

struct Writer {
    unit: String,
    out: String,
}

impl Writer {
    fn value(&mut self, value: &Value, depth: usize) {
        match value {
            Value::Null => self.colored("null", COLOR_NULL),
            Value::Bool(val) => self.colored(if *val { "true" } else { "false" }, COLOR_BOOL),
            Value::Number(num) => self.colored(&num.to_string(), COLOR_NUMBER),
            Value::String(text) => self.colored(&encode_str(text), COLOR_STRING),
            Value::Array(items) => self.array(items, depth),
            Value::Object(map) => self.object(map, depth),
        }
    }

    fn array(&mut self, items: &[Value], depth: usize) {
        if items.is_empty() {
            self.colored("[]", COLOR_PUNCT);
            return;
        }
        self.colored("[", COLOR_PUNCT);
        self.out.push('\n');
        for (idx, item) in items.iter().enumerate() {
            self.indent(depth + 1);
            self.value(item, depth + 1);
            if idx + 1 < items.len() {
                self.colored(",", COLOR_PUNCT);
            }
            self.out.push('\n');
        }
        self.indent(depth);
        self.colored("]", COLOR_PUNCT);
    }

    fn object(&mut self, map: &Map<String, Value>, depth: usize) {
        if map.is_empty() {
            self.colored("{}", COLOR_PUNCT);
            return;
        }
        self.colored("{", COLOR_PUNCT);
        self.out.push('\n');
        let len = map.len();
        for (idx, (key, value)) in map.iter().enumerate() {
            self.indent(depth + 1);
            self.colored(&encode_str(key), COLOR_KEY);
            self.colored(":", COLOR_PUNCT);
            self.out.push(' ');
            self.value(value, depth + 1);
            if idx + 1 < len {
                self.colored(",", COLOR_PUNCT);
            }
            self.out.push('\n');
        }
        self.indent(depth);
        self.colored("}", COLOR_PUNCT);
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str(&self.unit);
        }
    }

    fn colored(&mut self, text: &str, color: &str) {
        self.out.push_str("\u{1b}[");
        self.out.push_str(color);
        self.out.push('m');
        self.out.push_str(text);
        self.out.push_str("\u{1b}[0m");
    }
}

fn encode_str(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string())
}
