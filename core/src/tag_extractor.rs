//! Streaming extraction of a delimited inline region (a reasoning block or
//! a diff block) from assistant text, tolerant of the open/close marker
//! being split arbitrarily across chunk boundaries.
//!
//! Generalizes the fixed `<think>`/`<thought>`/`<reasoning>`/`<analysis>`
//! table of a tag-stream sanitizer into a single configured open/close
//! marker pair routed to a chosen [`StreamDelta`] field, with a bounded
//! buffer and an explicit overflow error instead of growing unbounded.

use crate::delta::{ExtractedField, StreamDelta};
use crate::error::TagExtractorError;

/// Default buffer bound: 1 MiB.
pub const DEFAULT_MAX_BUFFER_BYTES: usize = 1024 * 1024;

/// Per-extractor configuration. Immutable after construction; a
/// [`TagExtractor`] is built once from a `TagExtractorConfig` and owns its
/// buffer exclusively for the lifetime of one logical stream.
#[derive(Debug, Clone)]
pub struct TagExtractorConfig {
    pub open_tag: Vec<u8>,
    pub close_tag: Vec<u8>,
    pub field: ExtractedField,
    pub include_markers: bool,
    pub max_buffer_bytes: usize,
}

impl TagExtractorConfig {
    /// Creates a config for a thought/reasoning block.
    ///
    /// # Panics
    ///
    /// Panics if `open_tag` or `close_tag` is empty, matching the
    /// "non-empty byte strings" invariant in the data model.
    #[must_use]
    pub fn thought(open_tag: impl Into<Vec<u8>>, close_tag: impl Into<Vec<u8>>) -> Self {
        Self::new(open_tag, close_tag, ExtractedField::Thought)
    }

    /// Creates a config for a diff block.
    ///
    /// # Panics
    ///
    /// Panics if `open_tag` or `close_tag` is empty.
    #[must_use]
    pub fn diff(open_tag: impl Into<Vec<u8>>, close_tag: impl Into<Vec<u8>>) -> Self {
        Self::new(open_tag, close_tag, ExtractedField::Diff)
    }

    #[must_use]
    pub fn new(
        open_tag: impl Into<Vec<u8>>,
        close_tag: impl Into<Vec<u8>>,
        field: ExtractedField,
    ) -> Self {
        let open_tag = open_tag.into();
        let close_tag = close_tag.into();
        assert!(!open_tag.is_empty(), "open_tag must not be empty");
        assert!(!close_tag.is_empty(), "close_tag must not be empty");
        Self {
            open_tag,
            close_tag,
            field,
            include_markers: false,
            max_buffer_bytes: DEFAULT_MAX_BUFFER_BYTES,
        }
    }

    #[must_use]
    pub fn with_include_markers(mut self, include_markers: bool) -> Self {
        self.include_markers = include_markers;
        self
    }

    #[must_use]
    pub fn with_max_buffer_bytes(mut self, max_buffer_bytes: usize) -> Self {
        self.max_buffer_bytes = max_buffer_bytes;
        self
    }
}

/// Owns the buffer for exactly one logical stream. Not safe to share across
/// concurrent callers; create one instance per stream.
#[derive(Debug)]
pub struct TagExtractor {
    config: TagExtractorConfig,
    buffer: Vec<u8>,
    in_block: bool,
    pending_open_prefix: bool,
}

impl TagExtractor {
    #[must_use]
    pub fn new(config: TagExtractorConfig) -> Self {
        Self {
            config,
            buffer: Vec::new(),
            in_block: false,
            pending_open_prefix: false,
        }
    }

    /// Appends `chunk` to the internal buffer and drains everything that
    /// can be definitively classified as `content` or the configured field.
    ///
    /// # Errors
    ///
    /// Returns [`TagExtractorError::BufferOverflow`] if appending `chunk`
    /// would exceed `max_buffer_bytes`. The buffer is left untouched in
    /// that case, but the stream is considered fatally broken regardless
    /// — callers must not call `process` again on this instance.
    pub fn process(&mut self, chunk: &str) -> Result<Option<StreamDelta>, TagExtractorError> {
        let attempted = self.buffer.len() + chunk.len();
        if attempted > self.config.max_buffer_bytes {
            return Err(TagExtractorError::BufferOverflow {
                attempted,
                limit: self.config.max_buffer_bytes,
            });
        }
        self.buffer.extend_from_slice(chunk.as_bytes());

        let mut content_out: Vec<u8> = Vec::new();
        let mut field_out: Vec<u8> = Vec::new();

        loop {
            if !self.in_block {
                let open_tag = self.config.open_tag.clone();
                if let Some(idx) = find_subslice(&self.buffer, &open_tag) {
                    content_out.extend_from_slice(&self.buffer[..idx]);
                    self.buffer.drain(..idx + open_tag.len());
                    self.in_block = true;
                    self.pending_open_prefix = self.config.include_markers;
                    continue;
                }

                let keep = longest_partial_match_len(&self.buffer, &open_tag);
                let flush_to = self.buffer.len() - keep;
                content_out.extend_from_slice(&self.buffer[..flush_to]);
                self.buffer.drain(..flush_to);
                break;
            }

            let close_tag = self.config.close_tag.clone();
            if let Some(idx) = find_subslice(&self.buffer, &close_tag) {
                if self.pending_open_prefix {
                    field_out.extend_from_slice(&self.config.open_tag);
                    self.pending_open_prefix = false;
                }
                field_out.extend_from_slice(&self.buffer[..idx]);
                if self.config.include_markers {
                    field_out.extend_from_slice(&close_tag);
                }
                self.buffer.drain(..idx + close_tag.len());
                self.in_block = false;
                continue;
            }

            let keep = longest_partial_match_len(&self.buffer, &close_tag);
            let flush_to = self.buffer.len() - keep;
            if self.pending_open_prefix {
                field_out.extend_from_slice(&self.config.open_tag);
                self.pending_open_prefix = false;
            }
            field_out.extend_from_slice(&self.buffer[..flush_to]);
            self.buffer.drain(..flush_to);
            break;
        }

        Ok(self.finish_delta(content_out, field_out))
    }

    /// Drains any remaining buffered bytes: into the configured field if a
    /// block was open, otherwise into `content`. Resets the extractor to
    /// its initial state.
    pub fn flush(&mut self) -> Option<StreamDelta> {
        let remainder = std::mem::take(&mut self.buffer);
        let in_block = self.in_block;
        let pending_open_prefix = self.pending_open_prefix;
        self.in_block = false;
        self.pending_open_prefix = false;

        if remainder.is_empty() {
            return None;
        }

        if in_block {
            let mut field_out = Vec::new();
            if pending_open_prefix && self.config.include_markers {
                field_out.extend_from_slice(&self.config.open_tag);
            }
            field_out.extend_from_slice(&remainder);
            self.finish_delta(Vec::new(), field_out)
        } else {
            self.finish_delta(remainder, Vec::new())
        }
    }

    /// Discards the buffer and returns the extractor to its initial state,
    /// as if freshly constructed.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.in_block = false;
        self.pending_open_prefix = false;
    }

    fn finish_delta(&self, content: Vec<u8>, field: Vec<u8>) -> Option<StreamDelta> {
        let mut delta = StreamDelta::default();
        if !content.is_empty() {
            delta.content = Some(bytes_to_string(content));
        }
        if !field.is_empty() {
            let text = bytes_to_string(field);
            match self.config.field {
                ExtractedField::Thought => delta.thought = Some(text),
                ExtractedField::Diff => delta.diff = Some(text),
            }
        }
        delta.into_option()
    }
}

fn bytes_to_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|err| {
        String::from_utf8_lossy(err.as_bytes()).into_owned()
    })
}

/// Locates the first occurrence of `needle` in `haystack`.
fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// The longest proper suffix of `buffer` that is also a prefix of `marker`,
/// searched from longest to shortest. Returns the length of that suffix (0
/// if none matches), i.e. how many trailing bytes of `buffer` must be
/// retained because they might be the start of `marker`.
fn longest_partial_match_len(buffer: &[u8], marker: &[u8]) -> usize {
    let max_len = buffer.len().min(marker.len().saturating_sub(1));
    for len in (1..=max_len).rev() {
        if buffer.ends_with(&marker[..len]) {
            return len;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn thought_extractor() -> TagExtractor {
        TagExtractor::new(TagExtractorConfig::thought("[START]", "[END]"))
    }

    #[test]
    fn te1_single_chunk_complete_block() {
        let mut extractor = thought_extractor();
        let delta = extractor
            .process("Hello [START]extracted[END] world")
            .unwrap()
            .unwrap();
        assert_eq!(delta.content.as_deref(), Some("Hello  world"));
        assert_eq!(delta.thought.as_deref(), Some("extracted"));
    }

    #[test]
    fn te2_split_across_three_chunks() {
        let mut extractor = thought_extractor();

        let d1 = extractor.process("Before [").unwrap();
        assert_eq!(d1.unwrap().content.as_deref(), Some("Before "));

        let d2 = extractor.process("S").unwrap();
        assert!(d2.is_none());

        let d3 = extractor.process("TART]inside[END] after").unwrap().unwrap();
        assert_eq!(d3.content.as_deref(), Some(" after"));
        assert_eq!(d3.thought.as_deref(), Some("inside"));
    }

    #[test]
    fn te3_partial_block_then_flush_with_no_close_overlap() {
        let mut extractor = thought_extractor();
        let delta = extractor.process("Hello [START]partial").unwrap().unwrap();
        assert_eq!(delta.content.as_deref(), Some("Hello "));
        assert_eq!(delta.thought.as_deref(), Some("partial"));

        let flushed = extractor.flush();
        assert!(flushed.is_none());
    }

    #[test]
    fn te3_flush_recovers_partial_open_marker_as_content() {
        let mut extractor = thought_extractor();
        let delta = extractor.process("Hello [STA").unwrap();
        assert_eq!(delta.unwrap().content.as_deref(), Some("Hello "));

        let flushed = extractor.flush().unwrap();
        assert_eq!(flushed.content.as_deref(), Some("[STA"));
    }

    #[test]
    fn include_markers_wraps_single_chunk_block() {
        let mut extractor = TagExtractor::new(
            TagExtractorConfig::thought("[START]", "[END]").with_include_markers(true),
        );
        let delta = extractor
            .process("pre [START]body[END] post")
            .unwrap()
            .unwrap();
        assert_eq!(delta.thought.as_deref(), Some("[START]body[END]"));
    }

    #[test]
    fn include_markers_wraps_block_split_across_chunks() {
        let mut extractor = TagExtractor::new(
            TagExtractorConfig::thought("[START]", "[END]").with_include_markers(true),
        );
        let d1 = extractor.process("[START]par").unwrap().unwrap();
        assert_eq!(d1.thought.as_deref(), Some("[START]par"));

        let d2 = extractor.process("tial[END]").unwrap().unwrap();
        assert_eq!(d2.thought.as_deref(), Some("tial[END]"));
    }

    #[test]
    fn empty_block_emits_no_field() {
        let mut extractor = thought_extractor();
        let delta = extractor.process("a [START][END] b").unwrap().unwrap();
        assert_eq!(delta.content.as_deref(), Some("a  b"));
        assert!(delta.thought.is_none());
    }

    #[test]
    fn multiple_blocks_in_one_chunk_concatenate() {
        let mut extractor = thought_extractor();
        let delta = extractor
            .process("[START]one[END]x[START]two[END]")
            .unwrap()
            .unwrap();
        assert_eq!(delta.thought.as_deref(), Some("onetwo"));
        assert_eq!(delta.content.as_deref(), Some("x"));
    }

    #[test]
    fn close_tag_prefix_is_held_back_but_content_before_it_flows_immediately() {
        // "[EN" is a prefix of "[END]" but isn't followed by the rest here,
        // so only the 3 trailing bytes are retained; "abc" is already safe
        // to emit and does so in the same call.
        let mut extractor = thought_extractor();
        let d1 = extractor.process("[START]abc[EN").unwrap().unwrap();
        assert_eq!(d1.thought.as_deref(), Some("abc"));
        assert!(d1.content.is_none());

        let d2 = extractor.process("D]rest").unwrap().unwrap();
        assert!(d2.thought.is_none());
        assert_eq!(d2.content.as_deref(), Some("rest"));
    }

    #[test]
    fn buffer_overflow_is_rejected_without_mutating_state() {
        let mut extractor = TagExtractor::new(
            TagExtractorConfig::thought("[START]", "[END]").with_max_buffer_bytes(4),
        );
        let err = extractor.process("too long").unwrap_err();
        assert_eq!(
            err,
            TagExtractorError::BufferOverflow {
                attempted: 8,
                limit: 4
            }
        );
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let mut extractor = thought_extractor();
        extractor.process("[START]partial").unwrap();
        assert!(extractor.in_block);
        extractor.reset();
        assert!(!extractor.in_block);
        assert!(extractor.buffer.is_empty());

        let delta = extractor
            .process("Hello [START]extracted[END] world")
            .unwrap()
            .unwrap();
        assert_eq!(delta.content.as_deref(), Some("Hello  world"));
        assert_eq!(delta.thought.as_deref(), Some("extracted"));
    }

    #[test]
    fn streaming_invariance_byte_by_byte() {
        let text = "prefix [START]reasoning that is fairly long[END] suffix text here";
        let mut whole = thought_extractor();
        let whole_delta = whole.process(text).unwrap().unwrap();

        let mut incremental = thought_extractor();
        let mut content = String::new();
        let mut thought = String::new();
        for byte in text.as_bytes() {
            let chunk = (*byte as char).to_string();
            if let Some(delta) = incremental.process(&chunk).unwrap() {
                content.push_str(delta.content.as_deref().unwrap_or(""));
                thought.push_str(delta.thought.as_deref().unwrap_or(""));
            }
        }

        assert_eq!(content, whole_delta.content.unwrap_or_default());
        assert_eq!(thought, whole_delta.thought.unwrap_or_default());
    }
}
