//! Incremental line splitting for streamed process output

/// Turns a sequence of raw text chunks, which may split mid-line, into
/// complete lines plus a retained partial tail.
///
/// Invariant: after [`append`](Self::append) the pending tail never contains
/// a line terminator.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return the lines it completed.
    ///
    /// The chunk is joined onto the retained tail and split on `\n`; every
    /// fragment but the last becomes a completed line, the last (possibly
    /// empty) fragment becomes the new tail.
    pub fn append(&mut self, chunk: &str) -> Vec<String> {
        self.pending.push_str(chunk);
        if !self.pending.contains('\n') {
            return Vec::new();
        }

        let buffered = std::mem::take(&mut self.pending);
        let mut lines: Vec<String> = buffered.split('\n').map(String::from).collect();
        // split always yields at least one fragment
        self.pending = lines.pop().unwrap_or_default();
        lines
    }

    /// Return and clear the retained tail, or `None` when nothing is pending.
    ///
    /// Never returns an empty string: an empty fragment after a trailing
    /// terminator was already emitted by the `append` that saw it.
    pub fn flush(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.pending))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_complete_lines() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.append("a\nb\n"), vec!["a", "b"]);
        assert_eq!(buf.flush(), None);
    }

    #[test]
    fn retains_partial_tail_across_appends() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.append("hel"), Vec::<String>::new());
        assert_eq!(buf.append("lo\nwor"), vec!["hello"]);
        assert_eq!(buf.append("ld"), Vec::<String>::new());
        assert_eq!(buf.flush(), Some("world".to_string()));
        assert_eq!(buf.flush(), None);
    }

    #[test]
    fn consecutive_terminators_yield_empty_lines() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.append("a\n\nb\n"), vec!["a", "", "b"]);
    }

    #[test]
    fn chunk_of_only_terminators() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.append("\n\n\n"), vec!["", "", ""]);
        assert_eq!(buf.flush(), None);
    }

    #[test]
    fn flush_on_empty_buffer_is_none() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.flush(), None);
    }

    // Concatenating all completed lines plus the final flush, reinserting
    // terminators, reconstructs the original input exactly.
    #[test]
    fn round_trip_law() {
        let chunks = ["xco", "debuild: lin", "e one\nline two\n\npart", "ial"];
        let mut buf = LineBuffer::new();

        let mut lines = Vec::new();
        for chunk in &chunks {
            lines.extend(buf.append(chunk));
        }
        let tail = buf.flush();

        let mut reconstructed = lines.join("\n");
        if !lines.is_empty() {
            reconstructed.push('\n');
        }
        if let Some(tail) = tail {
            reconstructed.push_str(&tail);
        }

        assert_eq!(reconstructed, chunks.concat());
    }

    #[test]
    fn round_trip_law_trailing_terminator() {
        let chunks = ["a\nb", "\n"];
        let mut buf = LineBuffer::new();

        let mut lines = Vec::new();
        for chunk in &chunks {
            lines.extend(buf.append(chunk));
        }
        assert_eq!(buf.flush(), None);

        let mut reconstructed = lines.join("\n");
        reconstructed.push('\n');
        assert_eq!(reconstructed, chunks.concat());
    }
}
