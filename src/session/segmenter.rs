//! Session Segmenter
//!
//! Splits one raw interactive transcript into per-(context, command) line
//! buffers. Prompt detection is purely textual:
//!
//! ```text
//! SW1:admin> switchshow              default context
//! SW1:FID128:admin> portshow 3       virtual-fabric context FID128
//! admin:/>show disk general          storage array, default context
//! ```
//!
//! A line is a prompt only when it carries the delimiter, enough
//! colon-separated segments and the configured username, so DATA lines
//! holding WWNs or timestamps are never mistaken for prompts.

use crate::domain::model::{ContextId, DEFAULT_CONTEXT};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// =============================================================================
// Prompt Configuration
// =============================================================================

/// How prompts look on the polled device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Character(s) ending the prompt
    pub delimiter: String,
    /// Login name printed in the prompt
    pub username: String,
    /// Prompt carries a virtual-fabric segment (`SW:FID128:admin>`)
    pub virtual_fabric: bool,
    /// Context used when no virtual-fabric segment is present
    pub default_context: String,
    /// Keep leading whitespace of DATA lines (fixed-width listings)
    pub preserve_indentation: bool,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            delimiter: ">".to_string(),
            username: "admin".to_string(),
            virtual_fabric: false,
            default_context: DEFAULT_CONTEXT.to_string(),
            preserve_indentation: false,
        }
    }
}

impl PromptConfig {
    /// Prompt layout for storage-array CLIs
    pub fn array() -> Self {
        Self {
            preserve_indentation: true,
            ..Self::default()
        }
    }

    /// Number of extra colon segments contributed by the context
    pub fn weight(&self) -> usize {
        usize::from(self.virtual_fabric)
    }

    /// Check whether a line is a prompt
    pub fn is_prompt(&self, line: &str) -> bool {
        line.contains(self.delimiter.as_str())
            && line.split(self.delimiter.as_str()).count() >= 2
            && line.split(':').count() >= 2 + self.weight()
            && line.contains(self.username.as_str())
    }

    /// Extract the context of a prompt line
    pub fn context_of(&self, line: &str) -> ContextId {
        if self.virtual_fabric {
            if let Some(segment) = line.split(':').nth(1) {
                return ContextId::new(segment);
            }
        }
        ContextId::new(&self.default_context)
    }

    /// Extract the command of a prompt line, if one follows the delimiter
    pub fn command_of(&self, line: &str) -> Option<String> {
        let segments: Vec<&str> = line.split(':').collect();
        let tail = segments.get(1 + self.weight()..)?.join(":");
        let (_, command) = tail.split_once(self.delimiter.as_str())?;
        let command = command.trim();
        if command.is_empty() {
            None
        } else {
            Some(command.to_string())
        }
    }
}

// =============================================================================
// Command Key
// =============================================================================

/// Identifies one command buffer within a transcript
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommandKey {
    pub context: ContextId,
    pub command: String,
}

impl CommandKey {
    pub fn new(context: impl Into<ContextId>, command: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            command: command.into(),
        }
    }

    /// First word of the command, e.g. `sfpshow` for `sfpshow -all`
    pub fn name(&self) -> &str {
        self.command.split_whitespace().next().unwrap_or_default()
    }

    /// Everything after the command name
    pub fn args(&self) -> &str {
        self.command
            .trim_start()
            .split_once(char::is_whitespace)
            .map(|(_, args)| args.trim())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for CommandKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.context, self.command)
    }
}

// =============================================================================
// Segmentation Result
// =============================================================================

/// Buffered command output of one transcript
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    contexts: IndexSet<ContextId>,
    buffers: IndexMap<CommandKey, Vec<String>>,
}

impl Segmentation {
    /// Contexts in first-registration order
    pub fn contexts(&self) -> impl Iterator<Item = &ContextId> {
        self.contexts.iter()
    }

    /// Buffers in first-seen order
    pub fn buffers(&self) -> impl Iterator<Item = (&CommandKey, &[String])> {
        self.buffers.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn get(&self, key: &CommandKey) -> Option<&[String]> {
        self.buffers.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    fn register_context(&mut self, context: &ContextId) {
        if self.contexts.insert(context.clone()) {
            debug!(context = %context, "Registered context");
        }
    }
}

// =============================================================================
// Session Segmenter
// =============================================================================

/// Segmenter state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmenterState {
    /// No active command; DATA lines are dropped
    Scanning,
    /// DATA lines are appended to this buffer
    Buffering(CommandKey),
}

/// Prompt-driven transcript segmenter
#[derive(Debug)]
pub struct SessionSegmenter {
    config: PromptConfig,
    state: SegmenterState,
    output: Segmentation,
}

impl SessionSegmenter {
    pub fn new(config: PromptConfig) -> Self {
        Self {
            config,
            state: SegmenterState::Scanning,
            output: Segmentation::default(),
        }
    }

    pub fn state(&self) -> &SegmenterState {
        &self.state
    }

    /// Feed one transcript line
    pub fn feed(&mut self, line: &str) {
        if self.config.is_prompt(line) {
            self.on_prompt(line);
        } else {
            self.on_data(line);
        }
    }

    fn on_prompt(&mut self, line: &str) {
        let context = self.config.context_of(line);
        self.output.register_context(&context);

        let Some(command) = self.config.command_of(line) else {
            if line.trim_end().ends_with(self.config.delimiter.as_str()) {
                debug!(context = %context, "Bare prompt");
            } else {
                warn!(line, "Prompt without extractable command, clearing buffer");
            }
            self.state = SegmenterState::Scanning;
            return;
        };

        let key = CommandKey::new(context, command);
        debug!(command = %key, "Start buffering");
        self.state = SegmenterState::Buffering(key);
    }

    fn on_data(&mut self, line: &str) {
        let SegmenterState::Buffering(key) = &self.state else {
            return;
        };

        if key.command.contains('|') {
            debug!(command = %key, "Dropping piped command output");
            self.state = SegmenterState::Scanning;
            return;
        }

        if line.trim().is_empty() {
            return;
        }

        let line = if self.config.preserve_indentation {
            line.trim_end()
        } else {
            line.trim()
        };
        self.output
            .buffers
            .entry(key.clone())
            .or_default()
            .push(line.to_string());
    }

    /// Finish and return the buffered output
    pub fn finish(self) -> Segmentation {
        self.output
    }

    /// Segment a whole transcript
    pub fn segment<I, S>(mut self, lines: I) -> Segmentation
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.feed(line.as_ref());
        }
        self.finish()
    }
}
