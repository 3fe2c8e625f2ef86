//! Scripted input for headless replays.
//!
//! Each non-blank line reads `<ticks> <intents>`, where intents is `-` for no
//! input or any combination of `L`, `R`, `J`, `M` and `D`. Everything after a
//! `#` is a comment.

use burrow_core::ControlInput;
use thiserror::Error;

/// Script replayed when no `--script` file is given.
pub(crate) const DEMO_SCRIPT: &str = "\
# walk onto the dash pickup
30 R
# break the barrier
6 RD
40 R
# hop the spike
4 RJ
30 RJ
20 R
10 -
";

/// A run of identical input held for several ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ScriptStep {
    pub(crate) ticks: u32,
    pub(crate) input: ControlInput,
}

/// Errors raised while parsing a script.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum ScriptError {
    /// The line did not contain exactly a tick count and an intent field.
    #[error("line {line}: expected `<ticks> <intents>`")]
    Malformed {
        /// One-based line number.
        line: usize,
    },
    /// The tick count was not a positive integer.
    #[error("line {line}: invalid tick count {value:?}")]
    InvalidTicks {
        /// One-based line number.
        line: usize,
        /// Text that failed to parse.
        value: String,
    },
    /// The intent field contained an unknown letter.
    #[error("line {line}: unknown intent {symbol:?}")]
    UnknownIntent {
        /// One-based line number.
        line: usize,
        /// Offending character.
        symbol: char,
    },
}

/// Parses a script into input steps in file order.
pub(crate) fn parse_script(text: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut steps = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }

        let fields: Vec<&str> = content.split_whitespace().collect();
        let [ticks, intents] = fields.as_slice() else {
            return Err(ScriptError::Malformed { line });
        };
        let ticks = match ticks.parse::<u32>() {
            Ok(ticks) if ticks > 0 => ticks,
            _ => {
                return Err(ScriptError::InvalidTicks {
                    line,
                    value: (*ticks).to_owned(),
                })
            }
        };
        let input = parse_intents(intents, line)?;
        steps.push(ScriptStep { ticks, input });
    }
    Ok(steps)
}

fn parse_intents(field: &str, line: usize) -> Result<ControlInput, ScriptError> {
    let mut input = ControlInput::default();
    if field == "-" {
        return Ok(input);
    }
    for symbol in field.chars() {
        match symbol.to_ascii_uppercase() {
            'L' => input.move_left = true,
            'R' => input.move_right = true,
            'J' => input.jump_held = true,
            'M' => input.morph_toggle = true,
            'D' => input.dash_pressed = true,
            _ => return Err(ScriptError::UnknownIntent { line, symbol }),
        }
    }
    Ok(input)
}
