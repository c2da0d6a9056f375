//! Line-driven terminal front end for a quiz session.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use quiz_core::model::Selection;
use services::{
    CatalogEntry, FinishReport, Navigation, OptionVerdict, ReviewItem, SessionEngine, SessionError,
};
use storage::question_bank::resolve_image;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// How the quiz loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellExit {
    /// Statistics shown and the score handed to the store.
    Finished,
    /// Left with `q` or end of input; nothing persisted.
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Submit(Selection),
    Next,
    Previous,
    Goto(usize),
    ToggleTimer,
    ResetTimer,
    Stop,
    Quit,
    Help,
    Redraw,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
enum InputError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("option numbers start at 1")]
    Zero,
    #[error("g needs a question number")]
    MissingTarget,
}

fn parse_input(line: &str) -> Result<Input, InputError> {
    let line = line.trim();
    match line {
        "" => return Ok(Input::Redraw),
        "-" => return Ok(Input::Submit(Selection::empty())),
        "n" => return Ok(Input::Next),
        "p" => return Ok(Input::Previous),
        "t" => return Ok(Input::ToggleTimer),
        "r" => return Ok(Input::ResetTimer),
        "s" => return Ok(Input::Stop),
        "q" => return Ok(Input::Quit),
        "h" | "?" => return Ok(Input::Help),
        _ => {}
    }

    if let Some(rest) = line.strip_prefix('g') {
        let target = rest
            .trim()
            .parse::<usize>()
            .map_err(|_| InputError::MissingTarget)?;
        return one_based(target).map(Input::Goto);
    }

    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<usize>()
                .map_err(|_| InputError::Unknown(line.to_owned()))
                .and_then(one_based)
        })
        .collect::<Result<Selection, _>>()
        .map(Input::Submit)
}

fn one_based(number: usize) -> Result<usize, InputError> {
    number.checked_sub(1).ok_or(InputError::Zero)
}

const HELP: &str = "\
  1 3     submit options 1 and 3 (commas also work)
  -       submit without ticking anything
  n / p   next / previous question
  g <n>   jump to question n
  t / r   pause-resume / reset the timer
  s       stop and show the statistics
  q       leave without saving";

pub struct Shell<'a, R, W> {
    engine: &'a mut SessionEngine,
    input: R,
    out: W,
    image_base: Option<PathBuf>,
    last_sync: Instant,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(engine: &'a mut SessionEngine, input: R, out: W) -> Self {
        Self {
            engine,
            input,
            out,
            image_base: None,
            last_sync: Instant::now(),
        }
    }

    /// Directory that relative image paths in the quiz file are resolved against.
    #[must_use]
    pub fn with_image_base(mut self, base: Option<PathBuf>) -> Self {
        self.image_base = base;
        self
    }

    /// Drive the engine's open session until it is finished or abandoned.
    ///
    /// # Errors
    ///
    /// Returns `ShellError::Session` when no session is open and
    /// `ShellError::Io` when the terminal cannot be read or written.
    pub fn run(mut self) -> Result<ShellExit, ShellError> {
        if self.engine.session().is_none() {
            return Err(SessionError::Idle.into());
        }
        self.last_sync = Instant::now();
        self.render_question()?;

        loop {
            let Some(line) = self.prompt("> ")? else {
                self.engine.exit();
                return Ok(ShellExit::Abandoned);
            };
            self.sync_timer();

            let input = match parse_input(&line) {
                Ok(input) => input,
                Err(err) => {
                    writeln!(self.out, "{err} (h for help)")?;
                    continue;
                }
            };

            match input {
                Input::Quit => {
                    self.engine.exit();
                    writeln!(self.out, "Quiz closed without saving.")?;
                    return Ok(ShellExit::Abandoned);
                }
                Input::Stop => return self.conclude(),
                Input::Next => match self.engine.next()? {
                    Navigation::Moved(_) => self.render_question()?,
                    Navigation::AtEnd => return self.conclude(),
                },
                Input::Previous => {
                    self.engine.previous()?;
                    self.render_question()?;
                }
                Input::Goto(index) => {
                    self.engine.goto(index)?;
                    self.render_question()?;
                }
                Input::ToggleTimer => {
                    self.engine.toggle_timer()?;
                    self.render_timer()?;
                }
                Input::ResetTimer => {
                    self.engine.reset_timer(true)?;
                    self.render_timer()?;
                }
                Input::Help => writeln!(self.out, "{HELP}")?,
                Input::Redraw => self.render_question()?,
                Input::Submit(selection) => match self.engine.submit(selection) {
                    Ok(outcome) if outcome.finished => return self.conclude(),
                    Ok(_) => self.render_question()?,
                    Err(err @ SessionError::OptionOutOfRange { .. }) => {
                        writeln!(self.out, "{err}")?;
                    }
                    Err(err) => return Err(err.into()),
                },
            }
        }
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.out, "{text}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    /// Apply wall-clock seconds since the last prompt to the countdown.
    fn sync_timer(&mut self) {
        let elapsed = self.last_sync.elapsed().as_secs();
        if elapsed == 0 {
            return;
        }
        self.engine
            .elapse(u32::try_from(elapsed).unwrap_or(u32::MAX));
        self.last_sync += Duration::from_secs(elapsed);
    }

    fn conclude(mut self) -> Result<ShellExit, ShellError> {
        let report = self.engine.finish()?;
        render_summary(&mut self.out, &report)?;

        let answer = self.prompt("Show the answer review? [y/N] ")?;
        if answer.is_some_and(|a| a.trim().eq_ignore_ascii_case("y")) {
            let items = self.engine.review()?;
            render_review(&mut self.out, &items, self.image_base.as_deref())?;
        }
        self.engine.close();
        Ok(ShellExit::Finished)
    }

    fn render_timer(&mut self) -> io::Result<()> {
        let Some(session) = self.engine.session() else {
            return Ok(());
        };
        let timer = session.timer();
        let state = if timer.is_running() { "" } else { " (paused)" };
        writeln!(self.out, "Time left: {}{state}", timer.label())
    }

    fn render_question(&mut self) -> io::Result<()> {
        let Some(session) = self.engine.session() else {
            return Ok(());
        };
        let current = session.current();
        let timer = session.timer();
        let paused = if timer.is_running() { "" } else { " paused" };

        writeln!(self.out)?;
        writeln!(self.out, "{}  [{}{paused}]", session.title(), timer.label())?;
        writeln!(
            self.out,
            "Question {}/{}",
            current.position + 1,
            current.total
        )?;
        writeln!(self.out, "{}", current.question.text())?;
        if let Some(image) = current.question.image() {
            let shown = self
                .image_base
                .as_deref()
                .and_then(|base| resolve_image(base, image));
            match shown {
                Some(path) => writeln!(self.out, "  (image: {})", path.display())?,
                None => writeln!(self.out, "  (image not found: {})", image.display())?,
            }
        }
        for (index, label) in current.options.iter().enumerate() {
            let mark = if current.saved.is_some_and(|s| s.contains(index)) {
                'x'
            } else {
                ' '
            };
            writeln!(self.out, "  [{mark}] {}. {label}", index + 1)?;
        }
        Ok(())
    }
}

pub fn render_summary(out: &mut impl Write, report: &FinishReport) -> io::Result<()> {
    let summary = &report.summary;
    writeln!(out)?;
    writeln!(out, "Statistics for {}", summary.key())?;
    writeln!(
        out,
        "You scored {:.2} out of {} correct!",
        summary.total_score(),
        summary.total()
    )?;
    writeln!(out, "Correct Answers: {}", summary.correct())?;
    writeln!(out, "Incorrect Answers: {}", summary.incorrect())?;
    writeln!(out, "Skipped Questions: {}", summary.skipped())?;
    let verdict = if summary.passed() { "passed" } else { "failed" };
    writeln!(out, "Score: {:.2} % ({verdict})", summary.pct())?;
    if report.recorded.is_none() {
        writeln!(out, "The score could not be saved.")?;
    }
    Ok(())
}

pub fn render_review(
    out: &mut impl Write,
    items: &[ReviewItem],
    image_base: Option<&std::path::Path>,
) -> io::Result<()> {
    for item in items {
        writeln!(out)?;
        let status = match item.score {
            None => "skipped".to_owned(),
            Some(score) => format!("score {score:.2}"),
        };
        writeln!(out, "{}. {} ({status})", item.position + 1, item.text)?;
        if let Some(image) = &item.image {
            let path = image_base
                .and_then(|base| resolve_image(base, image))
                .unwrap_or_else(|| image.clone());
            writeln!(out, "   (image: {})", path.display())?;
        }
        for option in &item.options {
            let marker = match option.verdict() {
                OptionVerdict::Hit => "[Correct]  ",
                OptionVerdict::Wrong => "[Incorrect]",
                OptionVerdict::Missed => "[Missed]   ",
                OptionVerdict::Neutral => "           ",
            };
            writeln!(out, "   {marker} {}", option.label)?;
            if let Some(explanation) = &option.explanation {
                writeln!(out, "                 {explanation}")?;
            }
        }
    }
    Ok(())
}

pub fn render_catalog(out: &mut impl Write, entries: &[CatalogEntry]) -> io::Result<()> {
    if entries.is_empty() {
        return writeln!(out, "No quiz files found.");
    }
    for entry in entries {
        let score = match (entry.last_pct, entry.passed()) {
            (Some(pct), Some(true)) => format!("{pct:.1}% passed"),
            (Some(pct), _) => format!("{pct:.1}% failed"),
            (None, _) => "not attempted".to_owned(),
        };
        writeln!(
            out,
            "{:<32} {:>4} questions  {score}",
            entry.key.as_str(),
            entry.question_count
        )?;
    }
    Ok(())
}
