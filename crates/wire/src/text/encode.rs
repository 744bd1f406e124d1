//! JSON text encoding for reduced trees
//!
//! Object keys are written in sorted order so output is deterministic.
//! Non-finite floats become `null`.

use crate::format::{float_repr, push_newline, push_quoted, EncodeOptions};
use cells_json_core::JsonValue;
use std::collections::HashMap;

/// Encode a tree to JSON text.
pub fn encode_json(value: &JsonValue, options: &EncodeOptions) -> String {
    let mut encoder = Encoder {
        out: String::new(),
        options,
        level: 0,
    };
    encoder.value(value);
    encoder.out
}

/// Encode a string with JSON escaping.
pub fn encode_string(s: &str, ensure_ascii: bool) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    push_quoted(&mut out, s, ensure_ascii);
    out
}

struct Encoder<'a> {
    out: String,
    options: &'a EncodeOptions,
    level: usize,
}

impl Encoder<'_> {
    fn value(&mut self, value: &JsonValue) {
        match value {
            JsonValue::Null => self.out.push_str("null"),
            JsonValue::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            JsonValue::Int(i) => self.out.push_str(&i.to_string()),
            JsonValue::Float(f) => match float_repr(*f) {
                Some(repr) => self.out.push_str(&repr),
                None => self.out.push_str("null"),
            },
            JsonValue::String(s) => push_quoted(&mut self.out, s, self.options.ensure_ascii),
            JsonValue::Array(arr) => self.array(arr),
            JsonValue::Object(obj) => self.object(obj),
        }
    }

    fn array(&mut self, arr: &[JsonValue]) {
        if arr.is_empty() {
            self.out.push_str("[]");
            return;
        }
        self.out.push('[');
        self.level += 1;
        for (i, item) in arr.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline();
            self.value(item);
        }
        self.level -= 1;
        self.newline();
        self.out.push(']');
    }

    fn object(&mut self, obj: &HashMap<String, JsonValue>) {
        if obj.is_empty() {
            self.out.push_str("{}");
            return;
        }
        // Sort keys for deterministic output
        let mut entries: Vec<_> = obj.iter().collect();
        entries.sort_by_key(|(k, _)| *k);

        self.out.push('{');
        self.level += 1;
        for (i, (key, value)) in entries.into_iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline();
            push_quoted(&mut self.out, key, self.options.ensure_ascii);
            self.out.push_str(self.options.key_separator());
            self.value(value);
        }
        self.level -= 1;
        self.newline();
        self.out.push('}');
    }

    fn newline(&mut self) {
        push_newline(&mut self.out, self.options.indent, self.level);
    }
}
