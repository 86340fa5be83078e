use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use tracing::warn;

use form_runtime::{FormBackend, SavedForm, save_form};
use form_spec::{
    FieldType, FormBuilder, LinkTemplate, render_canvas_text, validate_schema,
};

use crate::CliResult;
use crate::prompt::prompt;

/// One line typed into the builder shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderCommand {
    Title(String),
    Add(FieldType),
    Label { reference: String, text: String },
    Options { reference: String, text: String },
    Move { reference: String, position: usize },
    Drag { active: String, over: Option<String> },
    Delete(String),
    List,
    Types,
    Save,
    Help,
    Quit,
}

impl FromStr for BuilderCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim_start()),
            None => (line, ""),
        };
        match verb.to_lowercase().as_str() {
            "title" => Ok(BuilderCommand::Title(rest.trim_end().to_string())),
            "add" => rest
                .parse::<FieldType>()
                .map(BuilderCommand::Add)
                .map_err(|err| err.to_string()),
            "label" => {
                let (reference, text) = split_reference(rest, "label <question> <text>")?;
                Ok(BuilderCommand::Label {
                    reference,
                    text: text.trim_end().to_string(),
                })
            }
            "options" => {
                // Option text is kept raw after the single separating space and
                // may be empty.
                let (reference, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if reference.is_empty() {
                    return Err("usage: options <question> [<a,b,c>]".into());
                }
                Ok(BuilderCommand::Options {
                    reference: reference.to_string(),
                    text: text.trim_end_matches(['\r', '\n']).to_string(),
                })
            }
            "move" => {
                let (reference, position) = split_reference(rest, "move <question> <position>")?;
                let position = position
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|position| *position >= 1)
                    .ok_or_else(|| "position must be a whole number starting at 1".to_string())?;
                Ok(BuilderCommand::Move {
                    reference,
                    position,
                })
            }
            "drag" => {
                let mut parts = rest.split_whitespace();
                let active = parts
                    .next()
                    .ok_or_else(|| "usage: drag <question> [<target question>]".to_string())?;
                Ok(BuilderCommand::Drag {
                    active: active.to_string(),
                    over: parts.next().map(String::from),
                })
            }
            "delete" | "rm" => {
                let reference = rest.trim();
                if reference.is_empty() {
                    return Err("usage: delete <question>".into());
                }
                Ok(BuilderCommand::Delete(reference.to_string()))
            }
            "list" | "ls" => Ok(BuilderCommand::List),
            "types" => Ok(BuilderCommand::Types),
            "save" => Ok(BuilderCommand::Save),
            "help" | "?" => Ok(BuilderCommand::Help),
            "quit" | "exit" | "q" => Ok(BuilderCommand::Quit),
            "" => Err("type a command (help lists them)".into()),
            other => Err(format!("unknown command '{}' (help lists them)", other)),
        }
    }
}

fn split_reference(rest: &str, usage: &str) -> Result<(String, String), String> {
    match rest.split_once(char::is_whitespace) {
        Some((reference, text)) if !reference.is_empty() => {
            Ok((reference.to_string(), text.trim_start().to_string()))
        }
        _ => Err(format!("usage: {}", usage)),
    }
}

const HELP: &str = "Commands:
  title <text>                 set the form title
  add <text|textarea|select|file>
  label <question> <text>      rename a question
  options <question> [<a,b,c>] comma separated options (multiple choice only)
  move <question> <position>   move a question to a 1-based position
  drag <question> [<target>]   drop a question onto another question's slot
  delete <question>            remove a question
  list                         show the canvas
  types                        show question types
  save                         save the form and print its link
  quit                         leave the builder
Questions are referenced by position or id.";

/// Interactive builder view.
pub struct BuilderShell<'a> {
    builder: FormBuilder,
    backend: &'a dyn FormBackend,
    links: &'a LinkTemplate,
    export: Option<PathBuf>,
    saved: Option<SavedForm>,
}

impl<'a> BuilderShell<'a> {
    pub fn new(builder: FormBuilder, backend: &'a dyn FormBackend, links: &'a LinkTemplate) -> Self {
        Self {
            builder,
            backend,
            links,
            export: None,
            saved: None,
        }
    }

    /// Also write the schema JSON here on every save.
    pub fn export_to(mut self, path: Option<PathBuf>) -> Self {
        self.export = path;
        self
    }

    pub fn builder(&self) -> &FormBuilder {
        &self.builder
    }

    /// Runs until `quit` or end of input; returns the last save, if any.
    pub async fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        mut output: W,
    ) -> CliResult<Option<SavedForm>> {
        writeln!(output, "Form builder (help lists commands)")?;
        while let Some(line) = prompt(&mut input, &mut output, "builder")? {
            if line.trim().is_empty() {
                continue;
            }
            let command = match line.parse::<BuilderCommand>() {
                Ok(command) => command,
                Err(err) => {
                    writeln!(output, "{}", err)?;
                    continue;
                }
            };
            if command == BuilderCommand::Quit {
                break;
            }
            if let Err(err) = self.apply(command, &mut output).await {
                writeln!(output, "Error: {}", err)?;
            }
        }
        Ok(self.saved.clone())
    }

    async fn apply<W: Write>(&mut self, command: BuilderCommand, output: &mut W) -> CliResult<()> {
        match command {
            BuilderCommand::Title(title) => {
                self.builder.set_title(title);
                writeln!(output, "Title set.")?;
            }
            BuilderCommand::Add(kind) => {
                let id = self.builder.add_field(kind);
                writeln!(
                    output,
                    "Added {} question #{} ({}).",
                    kind.label(),
                    self.builder.len(),
                    id
                )?;
            }
            BuilderCommand::Label { reference, text } => {
                let id = self.resolve(&reference)?;
                self.builder.update_label(&id, text)?;
                writeln!(output, "Label updated.")?;
            }
            BuilderCommand::Options { reference, text } => {
                let id = self.resolve(&reference)?;
                self.builder.set_options_from_text(&id, &text)?;
                writeln!(output, "Options updated.")?;
            }
            BuilderCommand::Move {
                reference,
                position,
            } => {
                let id = self.resolve(&reference)?;
                self.builder.move_to(&id, position - 1)?;
                writeln!(output, "{}", render_canvas_text(&self.builder))?;
            }
            BuilderCommand::Drag { active, over } => {
                let active = self.resolve(&active)?;
                let over = over.map(|over| self.resolve(&over)).transpose()?;
                self.builder.reorder(&active, over.as_deref())?;
                writeln!(output, "{}", render_canvas_text(&self.builder))?;
            }
            BuilderCommand::Delete(reference) => {
                let id = self.resolve(&reference)?;
                let removed = self.builder.remove_field(&id)?;
                writeln!(output, "Deleted '{}'.", removed.label)?;
            }
            BuilderCommand::List => {
                writeln!(output, "{}", render_canvas_text(&self.builder))?;
            }
            BuilderCommand::Types => {
                for kind in FieldType::ALL {
                    writeln!(output, "  {:<9} {}", kind.as_str(), kind.label())?;
                }
            }
            BuilderCommand::Save => self.save(output).await?,
            BuilderCommand::Help => writeln!(output, "{}", HELP)?,
            BuilderCommand::Quit => {}
        }
        Ok(())
    }

    async fn save<W: Write>(&mut self, output: &mut W) -> CliResult<()> {
        let schema = self.builder.schema();
        let report = validate_schema(&schema);
        for issue in &report.issues {
            warn!(field = %issue.field_id, code = %issue.code, "{}", issue.message);
        }

        let saved = save_form(self.backend, &self.builder, self.links).await?;
        if let Some(path) = &self.export {
            write_json(path, &schema)?;
            writeln!(output, "Schema written to {}", path.display())?;
        }
        writeln!(output, "{}", saved.message())?;
        self.saved = Some(saved);
        Ok(())
    }

    fn resolve(&self, reference: &str) -> CliResult<String> {
        Ok(self.builder.resolve(reference)?.id.clone())
    }
}

pub fn write_json(path: &Path, value: &impl Serialize) -> io::Result<()> {
    let contents = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}
