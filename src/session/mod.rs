//! Editing session: a line-oriented front end over [`Document::apply`].
//!
//! Lines come from an interactive prompt or a script file. Before each
//! command, finished image decodes are folded into the document; results for
//! slots that were reset or re-uploaded since are dropped.
//!
//! Nothing that happens inside a session is fatal. Refused edits, bad
//! arguments, unreadable images and failed submissions are reported and the
//! session carries on.

mod command;
mod decode;

pub use command::{Command, CommandError, HELP, parse_line};
pub use decode::{DecodeError, Decoded, Decoder, read_image};

use std::fmt::Write as _;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::FormConfig;
use crate::document::{Action, Document, DocumentError, MetadataField, Outcome};
use crate::markdown::{self, render};
use crate::utils::date::Date;
use crate::{debug, log, preview, upload};

/// Whether the session keeps reading lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<'c> {
    doc: Document,
    decoder: Decoder,
    config: &'c FormConfig,
    /// Directory relative `upload`/`import` paths resolve against.
    base: PathBuf,
}

impl<'c> Session<'c> {
    /// New session with an empty document seeded from `[session]`.
    pub fn new(config: &'c FormConfig) -> Result<Self> {
        let mut doc = Document::new(config.slug.clone());
        doc.set_aspect_lock(config.session.aspect_lock);
        if let Some(author) = &config.session.author {
            doc.metadata.author.clone_from(author);
        }

        let base = std::env::current_dir().context("Failed to get current working directory")?;
        Ok(Self {
            doc,
            decoder: Decoder::new()?,
            config,
            base,
        })
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Settle pending decodes and hand back the document.
    pub fn finish(mut self) -> Document {
        self.settle();
        self.doc
    }

    /// Load a source file: markdown is imported, anything else replayed.
    pub fn load(&mut self, source: &Path) -> Result<()> {
        if source.extension().is_some_and(|ext| ext == "md") {
            self.import(source)
        } else {
            self.run_script(source)
        }
    }

    /// Replace the document with a parsed markdown file.
    pub fn import(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let parsed = markdown::parse(&content, self.config.slug.clone())
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        self.doc.replace_with(parsed);
        log!(
            "session";
            "imported {} ({} section(s))",
            path.display(),
            self.doc.sections().len()
        );
        Ok(())
    }

    /// Replay a script, then wait for its image decodes.
    pub fn run_script(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            self.base = parent.to_path_buf();
        }

        for (number, line) in content.lines().enumerate() {
            match parse_line(line, self.doc.cursor()) {
                Ok(Some(command)) => {
                    if self.execute(command) == Flow::Quit {
                        break;
                    }
                }
                Ok(None) => {}
                Err(err) => log!("error"; "{}:{}: {}", path.display(), number + 1, err),
            }
        }

        self.settle();
        Ok(())
    }

    /// Prompt loop on stdin until `quit` or end of input.
    pub fn run_interactive(&mut self) -> Result<()> {
        log!("session"; "type `help` for commands, `quit` to leave");
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut line = String::new();

        loop {
            self.collect();
            eprint!("{}", self.prompt());
            io::stderr().flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                eprintln!();
                break;
            }
            match parse_line(&line, self.doc.cursor()) {
                Ok(Some(command)) => {
                    if self.execute(command) == Flow::Quit {
                        break;
                    }
                }
                Ok(None) => {}
                Err(err) => log!("error"; "{err}"),
            }
        }

        self.settle();
        Ok(())
    }

    fn prompt(&self) -> String {
        let total = self.doc.sections().len().max(self.doc.cursor() + 1);
        format!("postform [{}/{}]> ", self.doc.cursor() + 1, total)
    }

    /// Run one parsed command.
    pub fn execute(&mut self, command: Command) -> Flow {
        self.collect();
        match command {
            Command::Edit(action) => self.edit(action),
            Command::Upload { index, path } => self.upload(index, path),
            Command::Import(path) => {
                let path = self.resolve(&path);
                if let Err(err) = self.import(&path) {
                    log!("error"; "{err:#}");
                }
            }
            Command::Wait => {
                if self.decoder.in_flight() == 0 {
                    log!("notice"; "no image is loading");
                }
                self.settle();
            }
            Command::Show => print!("{}", describe(&self.doc)),
            Command::Render => print!("{}", render(&self.doc, &self.config.render)),
            Command::Preview(path) => {
                let path = path.map_or_else(|| self.config.preview.output.clone(), |p| self.resolve(&p));
                match preview::write_page(&self.doc, &self.config.render, &path) {
                    Ok(()) => log!("preview"; "wrote {}", path.display()),
                    Err(err) => log!("error"; "{err:#}"),
                }
            }
            Command::Submit => {
                self.settle();
                match upload::submit(&self.doc, &self.config.render, &self.config.upload) {
                    Ok(receipt) => match receipt.markdown_url {
                        Some(url) => log!("done"; "article saved ({url})"),
                        None => log!("done"; "article saved"),
                    },
                    Err(err) => log!("error"; "{err}"),
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn edit(&mut self, action: Action) {
        let action = match action {
            Action::SetMetadata {
                field: MetadataField::Date,
                value,
            } => Action::SetMetadata {
                field: MetadataField::Date,
                value: normalize_date(value),
            },
            other => other,
        };

        let index = action.section_index();
        match self.doc.apply(action) {
            Ok(Outcome::Ignored) => log!("notice"; "nothing changed"),
            Ok(outcome) => {
                if let Some(index) = index {
                    debug!("session"; "section {}: {:?}", index + 1, outcome);
                }
            }
            Err(
                err @ (DocumentError::SectionLimitExceeded { .. }
                | DocumentError::SectionOutOfRange { .. }),
            ) => log!("notice"; "{err}"),
            Err(err) => log!("error"; "{err}"),
        }
    }

    fn upload(&mut self, index: usize, path: PathBuf) {
        let path = self.resolve(&path);
        // claiming first makes any decode already running for the slot stale
        let generation = match self.doc.apply(Action::ClaimSectionImage { index }) {
            Ok(Outcome::Claimed(generation)) => generation,
            Ok(_) => return,
            Err(err) => {
                log!("notice"; "{err}");
                return;
            }
        };
        debug!("session"; "decoding {} into section {}", path.display(), index + 1);
        self.decoder.start(index, generation, path);
    }

    /// Fold finished decodes into the document without blocking.
    fn collect(&mut self) {
        for decoded in self.decoder.drain() {
            self.apply_decoded(decoded);
        }
    }

    /// Block on in-flight decodes and fold them in.
    fn settle(&mut self) {
        for decoded in self.decoder.wait() {
            self.apply_decoded(decoded);
        }
    }

    fn apply_decoded(&mut self, decoded: Decoded) {
        let Decoded {
            index,
            generation,
            path,
            result,
        } = decoded;

        let image = match result {
            Ok(image) => image,
            Err(err) => {
                log!("notice"; "image not loaded: {err}");
                return;
            }
        };
        let (width, height) = (image.width, image.height);
        let action = Action::SetSectionImage {
            index,
            image: Some(image),
            generation: Some(generation),
        };
        match self.doc.apply(action) {
            Ok(Outcome::Applied) => log!(
                "session";
                "section {}: {} ({}x{})",
                index + 1,
                path.display(),
                width,
                height
            ),
            _ => debug!("session"; "dropped stale decode of {}", path.display()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        }
    }
}

/// `today` becomes the current date; anything else is kept, with a warning
/// when it is not a valid `YYYY-MM-DD`.
fn normalize_date(value: String) -> String {
    if value.eq_ignore_ascii_case("today") {
        return Date::today().to_iso();
    }
    if !value.is_empty() && Date::parse(&value).is_none() {
        log!("warning"; "`{value}` is not a YYYY-MM-DD date");
    }
    value
}

/// Human-readable summary for `show`.
fn describe(doc: &Document) -> String {
    let mut out = String::new();
    let meta = &doc.metadata;
    for field in MetadataField::ALL {
        let value: &str = match field {
            MetadataField::Category => meta.category.as_str(),
            MetadataField::Title => &meta.title,
            MetadataField::Author => &meta.author,
            MetadataField::Date => &meta.date,
            MetadataField::Slug => &meta.slug,
            MetadataField::Image => &meta.image,
            MetadataField::CardImage => &meta.card_image,
            MetadataField::ImageTitre => &meta.image_titre,
            MetadataField::CardImageTitre => &meta.card_image_titre,
            MetadataField::Resume => &meta.resume,
        };
        let _ = writeln!(out, "{:>16}: {}", field.key(), preview_text(value));
    }

    let _ = writeln!(
        out,
        "{:>16}: {}",
        "aspectLock",
        if doc.aspect_lock() { "on" } else { "off" }
    );
    for (i, section) in doc.sections().iter().enumerate() {
        let marker = if i == doc.cursor() { '>' } else { ' ' };
        let size = |v: Option<u32>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
        let _ = writeln!(
            out,
            "{marker} section {}: {}x{} {} image={} text={}",
            i + 1,
            size(section.image_width),
            size(section.image_height),
            section.image_position,
            preview_text(&section.image),
            preview_text(&section.text),
        );
    }
    out
}

/// First line, cut at 48 characters.
fn preview_text(value: &str) -> String {
    let line = value.lines().next().unwrap_or_default();
    let mut short: String = line.chars().take(48).collect();
    if short.len() < value.len() {
        short.push('…');
    }
    short
}
