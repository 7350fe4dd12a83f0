//! Text and JSON output.

use std::io::{self, Write};

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text output.
    #[default]
    Text,
    /// JSON output.
    Json,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Pretty print (for JSON).
    pub pretty: bool,
}

/// Trait for values the CLI prints.
pub trait Printable {
    /// Print as plain text.
    fn print_text<W: Write>(&self, w: &mut W) -> io::Result<()>;

    /// Convert to JSON value.
    fn to_json(&self) -> serde_json::Value;

    /// Print in the specified format.
    fn print<W: Write>(
        &self,
        w: &mut W,
        format: OutputFormat,
        opts: &OutputOptions,
    ) -> io::Result<()> {
        match format {
            OutputFormat::Text => self.print_text(w),
            OutputFormat::Json => {
                let json = self.to_json();
                if opts.pretty {
                    serde_json::to_writer_pretty(&mut *w, &json)?;
                } else {
                    serde_json::to_writer(&mut *w, &json)?;
                }
                writeln!(w)
            }
        }
    }
}

impl<T: Printable> Printable for [T] {
    fn print_text<W: Write>(&self, w: &mut W) -> io::Result<()> {
        for item in self {
            item.print_text(w)?;
        }
        Ok(())
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.iter().map(Printable::to_json).collect())
    }
}
