//! Line-oriented driver over [`ChatApp`]. Plain text is sent as a question
//! about the selected document; lines starting with `/` are commands.

use crate::api::{Backend, FileUpload};
use crate::commands::knowledge::{is_accepted, ACCEPTED_EXTENSION};
use crate::commands::ChatApp;
use crate::store::models::{DocId, Role, Turn};
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const HELP: &str = "\
Commands:
  /docs            refresh and list documents
  /select <id>     switch to a document
  /upload <path>   upload a PDF
  /history         show the current conversation
  /sources [n]     show citations for turn n (default: latest cited answer)
  /help            show this help
  /quit            exit
Anything else is sent as a question about the selected document.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Docs,
    Select(DocId),
    Upload(PathBuf),
    History,
    Sources(Option<usize>),
    Quit,
    Ask(String),
    Empty,
    Invalid(String),
}

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Ask(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match (name, arg) {
        ("help", _) => Command::Help,
        ("docs", _) => Command::Docs,
        ("history", _) => Command::History,
        ("quit" | "exit", _) => Command::Quit,
        ("select", id) => match id.parse() {
            Ok(id) => Command::Select(id),
            Err(_) => Command::Invalid(format!("not a document id: {:?}", id)),
        },
        ("upload", "") => Command::Invalid("usage: /upload <path>".into()),
        ("upload", path) => Command::Upload(PathBuf::from(path)),
        ("sources", "") => Command::Sources(None),
        ("sources", n) => match n.parse() {
            Ok(n) if n > 0 => Command::Sources(Some(n)),
            _ => Command::Invalid(format!("not a turn number: {:?}", n)),
        },
        (other, _) => Command::Invalid(format!("unknown command /{}", other)),
    }
}

fn render_turn(out: &mut impl Write, index: usize, turn: &Turn) -> io::Result<()> {
    let who = match turn.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    writeln!(out, "[{}] {}: {}", index, who, turn.content)?;
    if let Some(citations) = &turn.citations {
        writeln!(
            out,
            "    ({} citations, /sources {} to view)",
            citations.len(),
            index
        )?;
    }
    Ok(())
}

pub struct Repl<B> {
    app: ChatApp<B>,
}

impl<B: Backend> Repl<B> {
    pub fn new(app: ChatApp<B>) -> Self {
        Self { app }
    }

    pub fn app(&self) -> &ChatApp<B> {
        &self.app
    }

    /// Reads lines until EOF or `/quit`.
    pub async fn run<R, W>(&self, input: R, out: &mut W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        writeln!(out, "Type /help for commands.")?;
        while let Some(line) = lines.next_line().await? {
            if !self.handle(parse(&line), out).await? {
                break;
            }
            out.flush()?;
        }
        Ok(())
    }

    /// Runs one command. Returns false when the session should end.
    pub async fn handle<W: Write>(&self, command: Command, out: &mut W) -> io::Result<bool> {
        match command {
            Command::Empty => {}
            Command::Quit => return Ok(false),
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Invalid(msg) => writeln!(out, "{}", msg)?,
            Command::Docs => {
                if let Err(e) = self.app.refresh().await {
                    writeln!(out, "Could not refresh documents ({}); showing last known list.", e)?;
                }
                self.list_documents(out)?;
            }
            Command::Select(id) => {
                self.app.select_document(id);
                match self.app.selected_document() {
                    Some(doc) => writeln!(out, "Chatting about {}", doc.filename)?,
                    None => writeln!(out, "Document {} is not in the list", id)?,
                }
                self.history(out)?;
            }
            Command::Upload(path) => self.upload(path, out).await?,
            Command::History => self.history(out)?,
            Command::Sources(index) => self.sources(index, out)?,
            Command::Ask(text) => self.ask(text, out).await?,
        }
        Ok(true)
    }

    fn list_documents(&self, out: &mut impl Write) -> io::Result<()> {
        let documents = self.app.documents();
        if documents.is_empty() {
            return writeln!(out, "No documents uploaded yet");
        }
        let selected = self.app.selected();
        for doc in documents {
            let marker = if Some(doc.id) == selected { '*' } else { ' ' };
            writeln!(
                out,
                "{} {:>4}  {}  ({} chunks)",
                marker, doc.id, doc.filename, doc.chunk_count
            )?;
        }
        Ok(())
    }

    fn history(&self, out: &mut impl Write) -> io::Result<()> {
        let turns = self.app.visible();
        if turns.is_empty() {
            return writeln!(out, "(no messages yet)");
        }
        for (i, turn) in turns.iter().enumerate() {
            render_turn(out, i + 1, turn)?;
        }
        Ok(())
    }

    fn sources(&self, index: Option<usize>, out: &mut impl Write) -> io::Result<()> {
        let turns = self.app.visible();
        let found = match index {
            Some(n) => n.checked_sub(1).and_then(|i| turns.get(i)).map(|t| (n, t)),
            None => turns
                .iter()
                .enumerate()
                .rev()
                .find(|(_, t)| t.has_citations())
                .map(|(i, t)| (i + 1, t)),
        };
        let Some((n, turn)) = found.filter(|(_, t)| t.has_citations()) else {
            return writeln!(out, "No citations to show");
        };

        writeln!(out, "Citations for turn {}:", n)?;
        for (label, excerpt) in turn.citation_pairs() {
            writeln!(out, "  Chunk {}:", label)?;
            writeln!(out, "    {}", excerpt)?;
        }
        Ok(())
    }

    async fn upload(&self, path: PathBuf, out: &mut impl Write) -> io::Result<()> {
        if !is_accepted(&path) {
            return writeln!(out, "Only .{} files can be uploaded", ACCEPTED_EXTENSION);
        }
        if !self.app.can_upload() {
            return writeln!(out, "An upload is already in progress");
        }
        let file = match FileUpload::from_path(&path).await {
            Ok(file) => file,
            Err(e) => return writeln!(out, "Could not read {}: {}", path.display(), e),
        };

        writeln!(out, "Uploading {}...", file.filename)?;
        match self.app.upload_document(file).await {
            Some(_) => self.history(out),
            None => match self.app.notice() {
                Some(notice) => writeln!(out, "{}", notice.content),
                None => Ok(()),
            },
        }
    }

    async fn ask(&self, text: String, out: &mut impl Write) -> io::Result<()> {
        let Some(doc_id) = self.app.selected() else {
            return writeln!(out, "Upload a document first...");
        };
        self.app.set_input(text);
        if !self.app.send().await {
            return Ok(());
        }

        let session = self.app.session(doc_id);
        if let Some(turn) = session.last() {
            render_turn(out, session.len(), turn)?;
        }
        Ok(())
    }
}
