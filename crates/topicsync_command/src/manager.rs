//! Command manager and recording sessions.

use crate::command::ChangeCommand;
use crate::error::{CommandError, CommandResult};
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Callback invoked with the buffered commands when a recording stops.
pub type RecordingStopFn = Box<dyn FnMut(&[ChangeCommand]) + Send>;

/// Callback invoked for every added command.
pub type AddFn = Box<dyn FnMut(&mut ChangeCommand) -> CommandResult<()> + Send>;

/// Records applied commands so a batch can be committed or rolled back.
///
/// Commands are applied eagerly as they are added. While a recording session
/// is active they are also buffered; the buffer is then either handed out
/// with [`commit`](Self::commit) or undone with [`reset`](Self::reset).
///
/// ## Session lifecycle
///
/// `Idle -> start_recording -> Recording -> stop_recording -> Idle`
///
/// Stopping a session does not clear the buffer. Consecutive sessions keep
/// appending to the same buffer until it is committed or reset.
///
/// ## Thread safety
///
/// The manager is `Send` but not synchronized. Share it across threads only
/// behind a lock.
pub struct CommandManager {
    recorded: Vec<ChangeCommand>,
    recording: bool,
    on_recording_stop: RecordingStopFn,
    on_add: AddFn,
}

impl CommandManager {
    /// Creates a manager that executes added commands immediately.
    pub fn new() -> Self {
        Self {
            recorded: Vec::new(),
            recording: false,
            on_recording_stop: Box::new(|_| {}),
            on_add: Box::new(|command| command.execute()),
        }
    }

    /// Sets the callback invoked when a recording stops.
    pub fn with_on_recording_stop<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&[ChangeCommand]) + Send + 'static,
    {
        self.on_recording_stop = Box::new(callback);
        self
    }

    /// Sets the callback invoked for every added command.
    ///
    /// The default executes the command against its topic.
    pub fn with_on_add<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut ChangeCommand) -> CommandResult<()> + Send + 'static,
    {
        self.on_add = Box::new(callback);
        self
    }

    /// Returns true while a recording session is active.
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Starts a recording session.
    ///
    /// Fails with [`CommandError::AlreadyRecording`] if a session is active;
    /// the active session is left untouched.
    pub fn start_recording(&mut self) -> CommandResult<()> {
        if self.recording {
            return Err(CommandError::AlreadyRecording);
        }
        self.recording = true;
        tracing::debug!(buffered = self.recorded.len(), "recording started");
        Ok(())
    }

    /// Stops the recording session.
    ///
    /// The stop callback sees the whole buffer, including commands from
    /// earlier sessions that have not been committed or reset.
    pub fn stop_recording(&mut self) {
        if !self.recording {
            tracing::debug!("stop_recording called while idle");
        }
        (self.on_recording_stop)(&self.recorded);
        self.recording = false;
        tracing::debug!(buffered = self.recorded.len(), "recording stopped");
    }

    /// Starts a recording session that stops when the returned guard drops.
    ///
    /// With `allow_already_recording`, calling this during an active session
    /// returns a guard that joins it: nothing is started, and dropping the
    /// guard does not stop the outer session.
    pub fn record(&mut self, allow_already_recording: bool) -> CommandResult<RecordingSession<'_>> {
        if self.recording {
            if allow_already_recording {
                return Ok(RecordingSession {
                    manager: self,
                    owned: false,
                });
            }
            return Err(CommandError::AlreadyRecording);
        }
        self.start_recording()?;
        Ok(RecordingSession {
            manager: self,
            owned: true,
        })
    }

    /// Applies a command and, while recording, buffers it.
    ///
    /// The command is passed to the add callback first; if that fails the
    /// error is returned and the command is not buffered.
    pub fn add(&mut self, mut command: ChangeCommand) -> CommandResult<()> {
        (self.on_add)(&mut command)?;
        tracing::debug!(
            topic = command.topic_name(),
            kind = %command.change().kind(),
            recording = self.recording,
            "command added"
        );
        if self.recording {
            self.recorded.push(command);
        }
        Ok(())
    }

    /// Takes the buffered commands, leaving the buffer empty.
    ///
    /// Nothing is undone; the commands stay applied.
    pub fn commit(&mut self) -> Vec<ChangeCommand> {
        let committed = std::mem::take(&mut self.recorded);
        tracing::debug!(count = committed.len(), "committed recorded commands");
        committed
    }

    /// Undoes every buffered command, last first, and clears the buffer.
    ///
    /// If an undo fails, the failing command and every command before it
    /// stay in the buffer and the error is returned.
    pub fn reset(&mut self) -> CommandResult<()> {
        let total = self.recorded.len();
        while let Some(mut command) = self.recorded.pop() {
            if let Err(e) = command.undo() {
                tracing::warn!(
                    topic = command.topic_name(),
                    error = %e,
                    remaining = self.recorded.len() + 1,
                    "undo failed during reset"
                );
                self.recorded.push(command);
                return Err(e);
            }
        }
        tracing::debug!(count = total, "reset recorded commands");
        Ok(())
    }

    /// Returns the buffered commands.
    pub fn recorded(&self) -> &[ChangeCommand] {
        &self.recorded
    }

    /// Returns the number of buffered commands.
    pub fn len(&self) -> usize {
        self.recorded.len()
    }

    /// Returns true if no commands are buffered.
    pub fn is_empty(&self) -> bool {
        self.recorded.is_empty()
    }
}

impl Default for CommandManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CommandManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandManager")
            .field("recording", &self.recording)
            .field("recorded", &self.recorded)
            .finish_non_exhaustive()
    }
}

/// Scope guard for a recording session.
///
/// Dereferences to the [`CommandManager`]. Dropping the guard stops the
/// session it started, on every exit path including `?` and panics. A guard
/// that joined an existing session stops nothing.
#[derive(Debug)]
pub struct RecordingSession<'a> {
    manager: &'a mut CommandManager,
    owned: bool,
}

impl RecordingSession<'_> {
    /// Returns true if this guard started the session it belongs to.
    pub fn owns_session(&self) -> bool {
        self.owned
    }
}

impl Deref for RecordingSession<'_> {
    type Target = CommandManager;

    fn deref(&self) -> &CommandManager {
        self.manager
    }
}

impl DerefMut for RecordingSession<'_> {
    fn deref_mut(&mut self) -> &mut CommandManager {
        self.manager
    }
}

impl Drop for RecordingSession<'_> {
    fn drop(&mut self) {
        if self.owned {
            self.manager.stop_recording();
        }
    }
}
