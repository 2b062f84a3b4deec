//! Checkstyle XML reporter for CI tool integration

use crate::error::Result;
use crate::messages::MessageSet;

use super::Reporter;

pub struct XmlReporter;

impl Reporter for XmlReporter {
    fn format(&self, messages: &MessageSet) -> Result<String> {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str("<checkstyle version=\"3.0\">\n");
        for file in messages.files() {
            out.push_str(&format!(" <file name=\"{}\">\n", escape(file)));
            for message in messages.for_file(file) {
                out.push_str(&format!(
                    "  <error line=\"{}\" column=\"{}\" severity=\"{}\" \
                     message=\"{}\" source=\"{}\"/>\n",
                    message.line,
                    message.column,
                    message.severity.label(),
                    escape(&message.text),
                    escape(&message.code),
                ));
            }
            out.push_str(" </file>\n");
        }
        out.push_str("</checkstyle>\n");
        Ok(out)
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
