use std::fmt::Write as _;
use std::io::{BufRead, Write};
use std::path::Path;

use form_runtime::{FillSession, SUBMITTED_MESSAGE};
use form_spec::{AnswerSet, Field, FieldType, FillPayload, UploadFile, render::SELECT_PLACEHOLDER};

use crate::CliResult;
use crate::prompt::{prompt, read_block};

/// Controls which bits of state the wizard prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Question prompts only.
    Clean,
    /// Also status and progress after every answer.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Walks the fields of a loaded form and feeds answers into the session.
pub struct FillWizard<R, W> {
    input: R,
    output: W,
    verbosity: Verbosity,
}

impl<R: BufRead, W: Write> FillWizard<R, W> {
    pub fn new(input: R, output: W, verbosity: Verbosity) -> Self {
        Self {
            input,
            output,
            verbosity,
        }
    }

    /// Prompts for every field that has no answer or file yet.
    pub fn collect(&mut self, session: &mut FillSession) -> CliResult<()> {
        let fields = session.form().schema.fields.clone();
        let total = fields.len();
        writeln!(self.output, "Answer each question (blank to skip).")?;

        for (index, field) in fields.iter().enumerate() {
            if session.answers().is_answered(&field.id) || session.uploads().get(&field.id).is_some()
            {
                continue;
            }
            writeln!(
                self.output,
                "{}/{} {} [{}]",
                index + 1,
                total,
                field.label,
                field.kind.label()
            )?;
            match field.kind {
                FieldType::Text => self.ask_text(session, field)?,
                FieldType::Textarea => self.ask_textarea(session, field)?,
                FieldType::Select => self.ask_select(session, field)?,
                FieldType::File => self.ask_file(session, field)?,
            }
            if self.verbosity.is_verbose() {
                self.show_status(&session.payload())?;
            }
        }
        Ok(())
    }

    fn ask_text(&mut self, session: &mut FillSession, field: &Field) -> CliResult<()> {
        if let Some(line) = prompt(&mut self.input, &mut self.output, ">")?
            && !line.is_empty()
        {
            session.set_answer(&field.id, &line)?;
        }
        Ok(())
    }

    fn ask_textarea(&mut self, session: &mut FillSession, field: &Field) -> CliResult<()> {
        writeln!(self.output, "(finish with an empty line)")?;
        let lines = read_block(&mut self.input)?;
        if !lines.is_empty() {
            session.set_answer(&field.id, &lines.join("\n"))?;
        }
        Ok(())
    }

    fn ask_select(&mut self, session: &mut FillSession, field: &Field) -> CliResult<()> {
        let options = field.display_options();
        writeln!(self.output, "  0) {}", SELECT_PLACEHOLDER)?;
        for (position, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}) {}", position + 1, option)?;
        }
        loop {
            let Some(line) = prompt(&mut self.input, &mut self.output, ">")? else {
                return Ok(());
            };
            let choice = match line.trim().parse::<usize>() {
                Ok(0) => String::new(),
                Ok(position) => match options.get(position - 1) {
                    Some(option) => option.clone(),
                    None => {
                        writeln!(self.output, "Invalid answer: no option {}", position)?;
                        continue;
                    }
                },
                Err(_) => line,
            };
            match session.set_answer(&field.id, &choice) {
                Ok(()) => return Ok(()),
                Err(err) => writeln!(self.output, "Invalid answer: {}", err)?,
            }
        }
    }

    fn ask_file(&mut self, session: &mut FillSession, field: &Field) -> CliResult<()> {
        loop {
            let Some(line) = prompt(&mut self.input, &mut self.output, "file path (blank to skip)")?
            else {
                return Ok(());
            };
            let path = line.trim();
            if path.is_empty() {
                return Ok(());
            }
            match UploadFile::from_path(Path::new(path)) {
                Ok(file) => {
                    writeln!(self.output, "Attached {} ({} bytes)", file.name, file.size())?;
                    session.attach_file(&field.id, Some(file))?;
                    return Ok(());
                }
                Err(err) => writeln!(self.output, "Cannot read '{}': {}", path, err)?,
            }
        }
    }

    fn show_status(&mut self, payload: &FillPayload) -> CliResult<()> {
        writeln!(
            self.output,
            "Status: {} ({}/{})",
            payload.status.as_str(),
            payload.progress.answered,
            payload.progress.total
        )?;
        Ok(())
    }

    pub fn show_completion(&mut self, answers: &AnswerSet, cbor: bool) -> CliResult<()> {
        writeln!(self.output, "{}", SUBMITTED_MESSAGE)?;
        writeln!(self.output, "{}", answers.to_json_pretty()?)?;
        if cbor {
            writeln!(self.output, "Answers (CBOR hex): {}", encode_hex(&answers.to_cbor()?))?;
        }
        Ok(())
    }
}

/// Applies answers from a JSON file; file questions take a path to upload.
/// Blank values leave the question unanswered.
pub fn prefill(session: &mut FillSession, answers: &AnswerSet, base_dir: &Path) -> CliResult<()> {
    for (question_id, value) in answers.iter() {
        if value.trim().is_empty() {
            continue;
        }
        let kind = session
            .form()
            .schema
            .field(question_id)
            .map(|field| field.kind);
        match kind {
            Some(FieldType::File) => {
                let file = UploadFile::from_path(&base_dir.join(value))
                    .map_err(|err| format!("cannot read file for '{}': {}", question_id, err))?;
                session.attach_file(question_id, Some(file))?;
            }
            _ => session.set_answer(question_id, value)?,
        }
    }
    Ok(())
}

fn encode_hex(bytes: &[u8]) -> String {
    let mut encoded = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(&mut encoded, "{:02x}", byte);
    }
    encoded
}
