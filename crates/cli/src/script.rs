//! Event script parsing.
//!
//! One step per line. Blank lines and lines starting with `#` are skipped.

use navmenu::{Key, KeyInput};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    ClickTrigger,
    ClickLogo,
    ClickElement(String),
    ClickLink(usize),
    /// Keydown delivered to the document.
    Key(KeyInput),
    /// Keydown on the trigger; bubbles to the document.
    TriggerKey(KeyInput),
    TouchStart(f64),
    TouchMove(f64),
    TouchEnd,
    Resize(f64),
    Wait,
    Snapshot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub number: usize,
    pub step: Step,
}

#[derive(Debug, Error, PartialEq)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: `{command}` expects {expected}")]
    MissingArgument {
        line: usize,
        command: &'static str,
        expected: &'static str,
    },
    #[error("line {line}: expected {expected}, found `{value}`")]
    InvalidArgument {
        line: usize,
        value: String,
        expected: &'static str,
    },
    #[error("line {line}: unexpected `{extra}` after `{command}`")]
    TrailingInput {
        line: usize,
        command: String,
        extra: String,
    },
}

pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut steps = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let number = index + 1;
        steps.push(ScriptLine {
            number,
            step: parse_line(number, line)?,
        });
    }
    Ok(steps)
}

fn parse_line(line: usize, text: &str) -> Result<Step, ScriptError> {
    let mut words = text.split_whitespace();
    let Some(command) = words.next() else {
        return Err(ScriptError::UnknownCommand {
            line,
            command: String::new(),
        });
    };
    let mut args = Args { line, words };
    let step = match command {
        "click" => match args.required("click", "a target (`trigger`, `logo` or an element id)")? {
            "trigger" => Step::ClickTrigger,
            "logo" => Step::ClickLogo,
            id => Step::ClickElement(id.to_string()),
        },
        "click-link" => Step::ClickLink(args.number("click-link", "a link index")?),
        "key" => Step::Key(args.key("key")?),
        "trigger-key" => Step::TriggerKey(args.key("trigger-key")?),
        "touch-start" => Step::TouchStart(args.number("touch-start", "a y coordinate")?),
        "touch-move" => Step::TouchMove(args.number("touch-move", "a y coordinate")?),
        "touch-end" => Step::TouchEnd,
        "resize" => Step::Resize(args.number("resize", "a viewport width")?),
        "wait" => Step::Wait,
        "snapshot" => Step::Snapshot,
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: other.to_string(),
            });
        }
    };
    args.finish(command)?;
    Ok(step)
}

struct Args<'a> {
    line: usize,
    words: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn required(&mut self, command: &'static str, expected: &'static str) -> Result<&'a str, ScriptError> {
        self.words.next().ok_or(ScriptError::MissingArgument {
            line: self.line,
            command,
            expected,
        })
    }

    fn number<T: std::str::FromStr>(&mut self, command: &'static str, expected: &'static str) -> Result<T, ScriptError> {
        let value = self.required(command, expected)?;
        value.parse().map_err(|_| ScriptError::InvalidArgument {
            line: self.line,
            value: value.to_string(),
            expected,
        })
    }

    /// `<Key> [shift]`
    fn key(&mut self, command: &'static str) -> Result<KeyInput, ScriptError> {
        let name = self.required(command, "a key name")?;
        let Ok(key) = name.parse::<Key>();
        let shift = match self.words.next() {
            None => false,
            Some("shift") => true,
            Some(other) => {
                return Err(ScriptError::InvalidArgument {
                    line: self.line,
                    value: other.to_string(),
                    expected: "`shift`",
                });
            }
        };
        Ok(KeyInput::new(key).with_shift(shift))
    }

    fn finish(mut self, command: &str) -> Result<(), ScriptError> {
        match self.words.next() {
            None => Ok(()),
            Some(extra) => Err(ScriptError::TrailingInput {
                line: self.line,
                command: command.to_string(),
                extra: extra.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script_skips_comments_and_keeps_line_numbers() {
        let source = "# open it\nclick trigger\n\n  wait\nkey tab shift\nsnapshot\n";
        let steps = parse_script(source).unwrap();
        let numbers: Vec<usize> = steps.iter().map(|line| line.number).collect();
        assert_eq!(numbers, vec![2, 4, 5, 6]);
        assert_eq!(steps[0].step, Step::ClickTrigger);
        assert_eq!(steps[2].step, Step::Key(KeyInput::shift_tab()));
    }

    #[test]
    fn test_parse_targets_and_numbers() {
        let steps = parse_script("click outside\nclick-link 2\ntouch-start 10.5\nresize 1024\ntrigger-key enter").unwrap();
        let steps: Vec<Step> = steps.into_iter().map(|line| line.step).collect();
        assert_eq!(
            steps,
            vec![
                Step::ClickElement("outside".to_string()),
                Step::ClickLink(2),
                Step::TouchStart(10.5),
                Step::Resize(1024.0),
                Step::TriggerKey(KeyInput::new(Key::Enter)),
            ]
        );
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        assert_eq!(
            parse_script("wait\njump").unwrap_err(),
            ScriptError::UnknownCommand {
                line: 2,
                command: "jump".to_string()
            }
        );
        assert!(matches!(
            parse_script("\n\nresize wide").unwrap_err(),
            ScriptError::InvalidArgument { line: 3, .. }
        ));
        assert!(matches!(
            parse_script("click").unwrap_err(),
            ScriptError::MissingArgument { line: 1, command: "click", .. }
        ));
        assert_eq!(
            parse_script("wait now").unwrap_err().to_string(),
            "line 1: unexpected `now` after `wait`"
        );
        assert!(matches!(
            parse_script("key tab ctrl").unwrap_err(),
            ScriptError::InvalidArgument { line: 1, .. }
        ));
    }

    #[test]
    fn test_error_message_mentions_line() {
        let error = parse_script("click-link first").unwrap_err();
        assert_eq!(error.to_string(), "line 1: expected a link index, found `first`");
    }
}
