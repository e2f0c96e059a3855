use bodies::prelude::BodyKind;

/// An input action, from the keyboard, the speed input or a control script
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ControlCommand {
    FocusNext,
    FocusPrevious,
    Focus(BodyKind),
    /// Stop when running, resume when stopped
    TogglePlayback,
    Stop,
    Resume,
    /// Speed multiplier applied to the base time step increment
    Speed(u32),
    Resize { width: u32, height: u32 },
}

impl ControlCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ControlCommand::FocusNext => "next",
            ControlCommand::FocusPrevious => "prev",
            ControlCommand::Focus(_) => "focus",
            ControlCommand::TogglePlayback => "toggle",
            ControlCommand::Stop => "stop",
            ControlCommand::Resume => "resume",
            ControlCommand::Speed(_) => "speed",
            ControlCommand::Resize { .. } => "resize",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ScheduledCommand {
    /// Applied before this frame runs
    pub frame: u64,
    pub command: ControlCommand,
}

/// Frame-stamped commands, ordered by frame
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct ControlScript {
    entries: Vec<ScheduledCommand>,
    cursor: usize,
}

impl ControlScript {
    pub(crate) fn new(entries: Vec<ScheduledCommand>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].frame <= w[1].frame));
        Self { entries, cursor: 0 }
    }

    pub fn entries(&self) -> &[ScheduledCommand] {
        &self.entries
    }

    /// Returns the commands scheduled at or before `frame` that haven't been
    /// returned yet
    pub fn due(&mut self, frame: u64) -> Vec<ControlCommand> {
        let start = self.cursor;
        while self
            .entries
            .get(self.cursor)
            .map(|e| e.frame <= frame)
            .unwrap_or(false)
        {
            self.cursor += 1;
        }
        self.entries[start..self.cursor]
            .iter()
            .map(|e| e.command)
            .collect()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.entries.len()
    }

    pub fn last_frame(&self) -> Option<u64> {
        self.entries.last().map(|e| e.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_commands_are_returned_once() {
        let mut script = ControlScript::new(vec![
            ScheduledCommand {
                frame: 2,
                command: ControlCommand::FocusNext,
            },
            ScheduledCommand {
                frame: 2,
                command: ControlCommand::Stop,
            },
            ScheduledCommand {
                frame: 5,
                command: ControlCommand::Resume,
            },
        ]);

        assert!(script.due(0).is_empty());
        assert!(script.due(1).is_empty());
        assert_eq!(
            script.due(2),
            vec![ControlCommand::FocusNext, ControlCommand::Stop]
        );
        assert!(script.due(3).is_empty());
        assert!(!script.is_finished());

        // Skipped frames still deliver everything that's due
        assert_eq!(script.due(9), vec![ControlCommand::Resume]);
        assert!(script.is_finished());
        assert_eq!(script.last_frame(), Some(5));
    }
}
