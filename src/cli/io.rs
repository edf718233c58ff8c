use std::{
    borrow::Cow,
    io::{BufRead, Write},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::core::CliError;

/// Capability to request one field of input from the user.
///
/// Operations only ever talk to a `Prompter`, so they can run against scripted
/// input in tests. End of input is reported as [`CliError::EndOfInput`].
pub trait Prompter {
    fn ask(&mut self, prompt: &str) -> Result<String, CliError>;

    /// Reads a menu choice. Implementations may offer completion here.
    fn ask_choice(&mut self, prompt: &str) -> Result<String, CliError> {
        self.ask(prompt)
    }
}

/// Line-oriented prompter over any reader/writer pair. Used for script mode and tests.
pub struct LinePrompter<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, prompt: &str) -> Result<String, CliError> {
        write!(self.writer, "{prompt}")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            writeln!(self.writer)?;
            return Err(CliError::EndOfInput);
        }
        writeln!(self.writer)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Interactive prompter backed by `rustyline`, with completion of menu names.
pub struct EditorPrompter {
    editor: Editor<MenuHelper, DefaultHistory>,
}

impl EditorPrompter {
    pub fn new(menu_names: Vec<&'static str>) -> Result<Self, CliError> {
        let mut editor = Editor::<MenuHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(MenuHelper::new(menu_names)));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
        Ok(Self { editor })
    }

    fn read(&mut self, prompt: &str, completing: bool) -> Result<String, CliError> {
        if let Some(helper) = self.editor.helper_mut() {
            helper.active = completing;
        }
        match self.editor.readline(prompt) {
            Ok(line) => {
                if completing && !line.trim().is_empty() {
                    self.editor.add_history_entry(line.trim()).ok();
                }
                Ok(line)
            }
            Err(ReadlineError::Interrupted) => Err(CliError::Cancelled),
            Err(ReadlineError::Eof) => Err(CliError::EndOfInput),
            Err(err) => Err(err.into()),
        }
    }
}

impl Prompter for EditorPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String, CliError> {
        self.read(prompt, false)
    }

    fn ask_choice(&mut self, prompt: &str) -> Result<String, CliError> {
        self.read(prompt, true)
    }
}

struct MenuHelper {
    names: Vec<String>,
    active: bool,
}

impl MenuHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut names: Vec<String> = names
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        names.sort();
        names.dedup();
        Self {
            names,
            active: false,
        }
    }
}

impl Helper for MenuHelper {}

impl Completer for MenuHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        if !self.active {
            return Ok((pos, Vec::new()));
        }
        let prefix = line[..pos].trim_start();
        let start = pos - prefix.len();
        let needle = prefix.to_ascii_lowercase();
        let candidates = self
            .names
            .iter()
            .filter(|name| name.starts_with(&needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for MenuHelper {
    type Hint = String;
}

impl Highlighter for MenuHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for MenuHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}
