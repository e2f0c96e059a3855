pub use crate::command::{ControlCommand, ControlScript, ScheduledCommand};
pub use crate::parser::{
    parse_command, parse_control_script, parse_speed_multiplier, ParseError, ScriptError,
    SpeedInputError,
};

pub mod command;
pub mod parser;

pub const FRAME_TOKEN: char = '@';
pub const COMMENT_TOKEN: char = '#';
