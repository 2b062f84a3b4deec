//! Output reporters for filtered lint messages

mod human;
mod json;
mod xml;

use crate::config::ReportFormat;
use crate::error::Result;
use crate::messages::MessageSet;

pub use human::HumanReporter;
pub use json::JsonReporter;
pub use xml::XmlReporter;

/// Renders a message set for output
pub trait Reporter {
    /// Render the messages to a string, including a trailing newline when
    /// non-empty
    fn format(&self, messages: &MessageSet) -> Result<String>;

    /// Process exit code for this result
    fn exit_code(&self, messages: &MessageSet) -> u8 {
        u8::from(!messages.is_empty())
    }
}

/// Create the reporter for a configured format
pub fn create_reporter(format: ReportFormat) -> Box<dyn Reporter> {
    match format {
        ReportFormat::Human => Box::new(HumanReporter),
        ReportFormat::Json => Box::new(JsonReporter),
        ReportFormat::Xml => Box::new(XmlReporter),
    }
}
