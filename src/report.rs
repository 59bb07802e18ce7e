use std::fmt;

/// Protocol-output sink consumed by the print operations.
///
/// The hosting context implements this over whatever medium carries its
/// records, such as a connection's output queue or a test fixture. The
/// registry emits one [`type_record`](Reporter::type_record) per type,
/// followed by zero or more [`entry_record`](Reporter::entry_record)s
/// produced by the type's `print` hook (or by the default stub, which
/// emits the bare key when the hook is unset).
pub trait Reporter {
    /// Emit the record announcing a type.
    fn type_record(&mut self, name: &str);
    /// Emit one record for a stored entry.
    fn entry_record(&mut self, text: &str);
}

/// A [`Reporter`] that collects records as lines of text.
///
/// Hosts that queue protocol output before flushing it down a connection
/// can use this directly; it is also what the tests and demos assert
/// against.
///
/// # Examples
///
/// ```
/// use typereg::{LineBuffer, Reporter};
///
/// let mut out = LineBuffer::new();
/// out.type_record("names");
/// out.entry_record("john");
/// assert_eq!(out.lines(), &["type names".to_string(), "john".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records collected so far, in emission order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of records collected.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when nothing has been emitted.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Consumes the buffer, yielding the collected records.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Discards everything collected so far.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Reporter for LineBuffer {
    fn type_record(&mut self, name: &str) {
        self.lines.push(format!("type {}", name));
    }

    fn entry_record(&mut self, text: &str) {
        self.lines.push(text.to_owned());
    }
}

impl fmt::Display for LineBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_accumulate_in_order() {
        let mut out = LineBuffer::new();
        assert!(out.is_empty());

        out.type_record("string");
        out.entry_record("test1");
        out.entry_record("test2");

        assert_eq!(out.len(), 3);
        assert_eq!(out.lines().to_vec(), vec!["type string", "test1", "test2"]);
    }

    #[test]
    fn display_joins_records_as_lines() {
        let mut out = LineBuffer::new();
        out.type_record("names");
        out.entry_record("john");

        assert_eq!(out.to_string(), "type names\njohn\n");
    }

    #[test]
    fn clear_discards_records() {
        let mut out = LineBuffer::new();
        out.type_record("names");
        out.clear();

        assert!(out.is_empty());
        assert_eq!(out.into_lines(), Vec::<String>::new());
    }
}
