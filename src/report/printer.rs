//! Line printer for the inventory report
//!
//! Rows are the selected fields of a resource joined with a comma. Fields
//! are written as-is: a value that itself contains a comma shifts the
//! columns of its line.

use std::io::{self, Write};

const PROJECT_RULE: &str = "========================";

/// Writes report lines to a sink, flushing after every line
pub struct Printer<W: Write> {
    out: W,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// `======================== my-project`
    pub fn project(&mut self, project_id: &str) -> io::Result<()> {
        self.line(&format!("{} {}", PROJECT_RULE, project_id))
    }

    /// `======================== END`
    pub fn end(&mut self) -> io::Result<()> {
        self.line(&format!("{} END", PROJECT_RULE))
    }

    /// `==== Compute Engine ====`
    pub fn section(&mut self, title: &str) -> io::Result<()> {
        self.line(&format!("==== {} ====", title))
    }

    /// `-- Disks --`
    pub fn subsection(&mut self, title: &str) -> io::Result<()> {
        self.line(&format!("-- {} --", title))
    }

    pub fn row<S: AsRef<str>>(&mut self, fields: &[S]) -> io::Result<()> {
        self.line(&join_fields(fields))
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{}", line)?;
        self.out.flush()
    }
}

/// Join fields with `,` and no quoting
pub fn join_fields<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| f.as_ref())
        .collect::<Vec<_>>()
        .join(",")
}
