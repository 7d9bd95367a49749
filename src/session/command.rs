//! Session command line parsing.
//!
//! One command per line. Section commands act on the current section unless
//! prefixed with `@<n>` (1-based):
//!
//! ```text
//! title Café du Sport!
//! resume Un résumé\nsur deux lignes
//! @2 text Deuxième section
//! upload photos/cover.jpg
//! height 240
//! position top-left
//! ```
//!
//! `\n`, `\t` and `\\` in arguments are unescaped; everything else is kept
//! verbatim.

use std::path::PathBuf;

use thiserror::Error;

use crate::document::{Action, Dimension, DocumentError, MAX_SECTION_INDEX, MetadataField};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A document mutation.
    Edit(Action),
    /// Decode an image file into a section.
    Upload { index: usize, path: PathBuf },
    /// Replace the document with a parsed markdown file.
    Import(PathBuf),
    Wait,
    Show,
    Render,
    Preview(Option<PathBuf>),
    Submit,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("`{command}` needs {what}")]
    Missing {
        command: &'static str,
        what: &'static str,
    },

    #[error("`{command}`: invalid argument `{value}`")]
    Invalid { command: &'static str, value: String },

    #[error("`@<n>` only applies to section commands")]
    NotASectionCommand,

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Usage text for `help`.
pub const HELP: &str = "\
metadata   title|author|date|category|slug|image|card-image|image-titre|card-image-titre <value>
           set <field> <value>      resume <text>      date today
section    text <text>   upload <file>   image-url <url>   height <n>   width <n>
           position top|top-left|top-right   reset   (prefix with @<n> to target section n)
navigation add   prev   goto <n>   lock on|off
output     show   render   preview [file]   submit   import <file>   wait
session    help   quit";

/// Parse one line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str, cursor: usize) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (target, line) = match line.strip_prefix('@') {
        Some(rest) => {
            let (n, rest) = split_word(rest);
            (Some(section_index("@", n)?), rest)
        }
        None => (None, line),
    };
    let index = target.unwrap_or(cursor);

    let (word, rest) = split_word(line);
    let arg = unescape(rest);

    if let Some(field) = metadata_command(word) {
        return section_free(target, Command::Edit(Action::SetMetadata { field, value: arg }));
    }

    let command = match word {
        // section commands
        "text" => Command::Edit(Action::SetSectionText { index, text: arg }),
        "upload" => Command::Upload {
            index,
            path: PathBuf::from(required("upload", "a file path", arg)?),
        },
        "image-url" => Command::Edit(Action::SetSectionImageReference {
            index,
            reference: arg,
        }),
        "height" | "width" => Command::Edit(Action::SetSectionDimension {
            index,
            dimension: if word == "height" {
                Dimension::Height
            } else {
                Dimension::Width
            },
            value: arg,
        }),
        "position" => Command::Edit(Action::SetSectionPosition {
            index,
            position: required("position", "top, top-left or top-right", arg)?,
        }),
        "reset" => Command::Edit(Action::ResetSection { index }),
        _ => return section_free(target, parse_global(word, arg)?),
    };
    Ok(Some(command))
}

fn parse_global(word: &str, arg: String) -> Result<Command, CommandError> {
    Ok(match word {
        "set" => {
            let (name, value) = split_word(&arg);
            if name.is_empty() {
                return Err(CommandError::Missing {
                    command: "set",
                    what: "a field name",
                });
            }
            Command::Edit(Action::SetMetadata {
                field: name.parse()?,
                value: value.to_string(),
            })
        }
        "add" => Command::Edit(Action::AddSection),
        "prev" => Command::Edit(Action::PreviousSection),
        "goto" => {
            let n = required("goto", "a section number", arg)?;
            Command::Edit(Action::GoToSection {
                index: section_index("goto", &n)?,
            })
        }
        "lock" if arg == "on" => Command::Edit(Action::SetAspectLock(true)),
        "lock" if arg == "off" => Command::Edit(Action::SetAspectLock(false)),
        "lock" => {
            return Err(CommandError::Invalid {
                command: "lock",
                value: arg,
            });
        }
        "import" => Command::Import(PathBuf::from(required("import", "a file path", arg)?)),
        "wait" => Command::Wait,
        "show" => Command::Show,
        "render" => Command::Render,
        "preview" => Command::Preview((!arg.is_empty()).then(|| PathBuf::from(arg))),
        "submit" => Command::Submit,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    })
}

/// Shorthand metadata commands (`title`, `card-image`, ...).
fn metadata_command(word: &str) -> Option<MetadataField> {
    match word {
        "title" => Some(MetadataField::Title),
        "author" => Some(MetadataField::Author),
        "date" => Some(MetadataField::Date),
        "category" => Some(MetadataField::Category),
        "slug" => Some(MetadataField::Slug),
        "image" => Some(MetadataField::Image),
        "card-image" => Some(MetadataField::CardImage),
        "image-titre" => Some(MetadataField::ImageTitre),
        "card-image-titre" => Some(MetadataField::CardImageTitre),
        "resume" => Some(MetadataField::Resume),
        _ => None,
    }
}

/// 1-based section number → index, bounded by [`MAX_SECTION_INDEX`].
fn section_index(command: &'static str, n: &str) -> Result<usize, CommandError> {
    n.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .filter(|&index| index <= MAX_SECTION_INDEX)
        .ok_or_else(|| CommandError::Invalid {
            command,
            value: n.to_string(),
        })
}

fn section_free(target: Option<usize>, command: Command) -> Result<Option<Command>, CommandError> {
    match target {
        Some(_) => Err(CommandError::NotASectionCommand),
        None => Ok(Some(command)),
    }
}

fn required(command: &'static str, what: &'static str, arg: String) -> Result<String, CommandError> {
    if arg.is_empty() {
        Err(CommandError::Missing { command, what })
    } else {
        Ok(arg)
    }
}

/// First whitespace-delimited word and the trimmed remainder.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        parse_line(line, 0).unwrap().unwrap()
    }

    #[test]
    fn test_blank_and_comments() {
        assert_eq!(parse_line("", 0), Ok(None));
        assert_eq!(parse_line("   # note", 0), Ok(None));
    }

    #[test]
    fn test_metadata_shorthands() {
        assert_eq!(
            parse("title  Café du Sport! "),
            Command::Edit(Action::SetMetadata {
                field: MetadataField::Title,
                value: "Café du Sport!".to_string(),
            })
        );
        assert_eq!(
            parse("card-image-titre hero.png"),
            Command::Edit(Action::SetMetadata {
                field: MetadataField::CardImageTitre,
                value: "hero.png".to_string(),
            })
        );
        // empty value clears the field
        assert_eq!(
            parse("author"),
            Command::Edit(Action::SetMetadata {
                field: MetadataField::Author,
                value: String::new(),
            })
        );
    }

    #[test]
    fn test_set_generic_field() {
        assert_eq!(
            parse("set cardImage c.png"),
            Command::Edit(Action::SetMetadata {
                field: MetadataField::CardImage,
                value: "c.png".to_string(),
            })
        );
        assert!(matches!(
            parse_line("set subtitle x", 0),
            Err(CommandError::Document(DocumentError::UnknownField(_)))
        ));
    }

    #[test]
    fn test_section_commands_use_cursor() {
        assert_eq!(
            parse_line("text Hi", 2).unwrap(),
            Some(Command::Edit(Action::SetSectionText {
                index: 2,
                text: "Hi".to_string(),
            }))
        );
    }

    #[test]
    fn test_explicit_target() {
        assert_eq!(
            parse_line("@8 height 100", 0).unwrap(),
            Some(Command::Edit(Action::SetSectionDimension {
                index: 7,
                dimension: Dimension::Height,
                value: "100".to_string(),
            }))
        );
        assert_eq!(parse_line("@2 title x", 0), Err(CommandError::NotASectionCommand));
        assert!(matches!(parse_line("@0 text x", 0), Err(CommandError::Invalid { .. })));
    }

    #[test]
    fn test_section_number_upper_bound() {
        let last = (MAX_SECTION_INDEX + 1).to_string();
        assert_eq!(
            parse_line(&format!("goto {last}"), 0).unwrap(),
            Some(Command::Edit(Action::GoToSection {
                index: MAX_SECTION_INDEX
            }))
        );
        for line in [
            "@18446744073709551615 text x",
            "@1000000000 text x",
            "@99999999999999999999999 text x",
            "goto 18446744073709551615",
        ] {
            assert!(
                matches!(parse_line(line, 0), Err(CommandError::Invalid { .. })),
                "{line}"
            );
        }
    }

    #[test]
    fn test_unescape() {
        assert_eq!(
            parse("resume a\\nb\\\\n\\q"),
            Command::Edit(Action::SetMetadata {
                field: MetadataField::Resume,
                value: "a\nb\\n\\q".to_string(),
            })
        );
    }

    #[test]
    fn test_navigation_and_output() {
        assert_eq!(parse("add"), Command::Edit(Action::AddSection));
        assert_eq!(parse("goto 3"), Command::Edit(Action::GoToSection { index: 2 }));
        assert_eq!(parse("lock off"), Command::Edit(Action::SetAspectLock(false)));
        assert_eq!(parse("preview"), Command::Preview(None));
        assert_eq!(parse("preview out.html"), Command::Preview(Some("out.html".into())));
        assert_eq!(parse("exit"), Command::Quit);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            parse_line("frobnicate", 0),
            Err(CommandError::Unknown("frobnicate".to_string()))
        );
        assert!(matches!(parse_line("upload", 0), Err(CommandError::Missing { .. })));
        assert!(matches!(parse_line("goto zero", 0), Err(CommandError::Invalid { .. })));
        assert!(matches!(parse_line("lock maybe", 0), Err(CommandError::Invalid { .. })));
    }

    #[test]
    fn test_position_passed_raw() {
        // validity is decided by the document, which ignores unknown tags
        assert_eq!(
            parse("position bottom"),
            Command::Edit(Action::SetSectionPosition {
                index: 0,
                position: "bottom".to_string(),
            })
        );
    }
}
