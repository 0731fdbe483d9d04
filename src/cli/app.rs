//! CLI module for the lulu-journal application.
//!
//! This module translates parsed commands into controller operations and
//! renders the results for the terminal.

use std::{
    fs,
    io::{stdin, stdout, Write},
    path::{Path, PathBuf},
};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Local};
use console::style;
use log::warn;

use crate::{
    AspectRatio, Category, CategoryFilter, ChatMessage, ChatMode, ChatRole, Commands, Config,
    GeminiClient, GroundingMetadata, JournalApp, JournalError, Location, Record, RecordDraft,
    RecordStore, Result, NOTE_STICKERS,
};

/// What the user sees when an AI call fails and verbose mode is off.
const GENERIC_AI_NOTICE: &str = "Sorry, I encountered an error. Please try again.";

/// CLI application handler - executes commands against the controller.
pub struct App {
    /// The journal controller and its store
    journal: JournalApp,

    /// Application configuration
    config: Config,

    /// Whether to display verbose output
    verbose: bool,
}

impl App {
    /// Create a new CLI application over the given data directory.
    pub fn new(config: Config, verbose: bool) -> Result<Self> {
        let store = RecordStore::new(config.data_dir.clone())?;
        let journal = JournalApp::new(store)?;

        Ok(Self {
            journal,
            config,
            verbose,
        })
    }

    /// Run the CLI application with the given command.
    pub async fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Add {
                title,
                category,
                content,
                image,
            } => self.handle_add(title, category, content, image)?,

            Commands::Edit {
                id,
                title,
                category,
                content,
                image,
            } => self.handle_edit(id, title, category, content, image)?,

            Commands::Delete { id, force } => self.handle_delete(id, force)?,

            Commands::List {
                category,
                search,
                json,
            } => self.handle_list(category, search, json)?,

            Commands::Notes { json } => self.handle_notes(json)?,

            Commands::Note {
                content,
                color,
                sticker,
            } => self.handle_note(content, color, sticker)?,

            Commands::Cloud => self.handle_cloud(),

            Commands::Days => self.handle_days(),

            Commands::Anniversary { date, title } => self.handle_anniversary(date, title)?,

            Commands::Export { format, output } => self.handle_export(&format, output)?,

            Commands::Import { file } => self.handle_import(file)?,

            Commands::Tap { count } => self.handle_tap(count)?,

            Commands::Chat {
                message,
                mode,
                lat,
                lng,
            } => self.handle_chat(message, mode, lat, lng).await?,

            Commands::Imagine {
                prompt,
                aspect_ratio,
                output,
            } => self.handle_imagine(prompt, aspect_ratio, output).await?,

            Commands::Retouch {
                image,
                prompt,
                output,
            } => self.handle_retouch(image, prompt, output).await?,

            Commands::Describe { image } => self.handle_describe(image).await?,
        }

        Ok(())
    }

    fn handle_add(
        &mut self,
        title: String,
        category: Category,
        content: String,
        image: Option<PathBuf>,
    ) -> Result<()> {
        let image = image.map(|path| read_image_as_data_uri(&path)).transpose()?;

        let draft = RecordDraft {
            title,
            category,
            content,
            image,
            bg_color: None,
            sticker: None,
        };

        match self.journal.save_record(draft, None) {
            Ok(id) => println!("Record created: {}", style(id).green()),
            Err(e) => self.report_save_failure(e)?,
        }
        Ok(())
    }

    fn handle_edit(
        &mut self,
        id: String,
        title: Option<String>,
        category: Option<Category>,
        content: Option<String>,
        image: Option<String>,
    ) -> Result<()> {
        let current = self
            .journal
            .records()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| JournalError::RecordNotFound { id: id.clone() })?;

        let image = match image.as_deref() {
            None => current.image.clone(),
            Some("none") => None,
            Some(path) => Some(read_image_as_data_uri(Path::new(path))?),
        };

        let draft = RecordDraft {
            title: title.unwrap_or(current.title),
            category: category.unwrap_or(current.category),
            content: content.unwrap_or(current.content),
            image,
            bg_color: current.bg_color,
            sticker: current.sticker,
        };

        match self.journal.save_record(draft, Some(&id)) {
            Ok(id) => println!("Record updated: {}", style(id).green()),
            Err(e) => self.report_save_failure(e)?,
        }
        Ok(())
    }

    fn handle_delete(&mut self, id: String, force: bool) -> Result<()> {
        self.journal.request_delete(&id)?;

        if !force {
            let title = self
                .journal
                .records()
                .iter()
                .find(|r| r.id == id)
                .map(|r| r.title.clone())
                .unwrap_or_default();

            print!("Delete \"{}\"? This cannot be undone. [y/N] ", title);
            stdout().flush()?;
            let mut answer = String::new();
            stdin().read_line(&mut answer)?;

            if !answer.trim().eq_ignore_ascii_case("y") {
                self.journal.cancel_delete();
                println!("Cancelled.");
                return Ok(());
            }
        }

        match self.journal.confirm_delete() {
            Ok(id) => println!("Deleted record {}", style(id).green()),
            Err(e) => self.report_save_failure(e)?,
        }
        Ok(())
    }

    fn handle_list(
        &mut self,
        category: Option<Category>,
        search: Option<String>,
        json: bool,
    ) -> Result<()> {
        self.journal.set_filter(match category {
            Some(category) => CategoryFilter::Only(category),
            None => CategoryFilter::All,
        });
        self.journal.set_search(search.unwrap_or_default());

        let records = self.journal.home_records();

        if json {
            println!("{}", serde_json::to_string_pretty(&records)?);
            return Ok(());
        }

        if records.is_empty() {
            println!("{}", style("记下美好，留住感动 - no records yet").dim());
            return Ok(());
        }

        for record in records {
            print_record_line(record);
        }
        Ok(())
    }

    fn handle_notes(&self, json: bool) -> Result<()> {
        let notes = self.journal.note_records();

        if json {
            println!("{}", serde_json::to_string_pretty(&notes)?);
            return Ok(());
        }

        if notes.is_empty() {
            println!("{}", style("随手记，把想法贴在这里~").dim());
            return Ok(());
        }

        for note in notes {
            let sticker = note.sticker.as_deref().unwrap_or("");
            println!(
                "{}  {} {}  {}",
                style(&note.id).dim(),
                sticker,
                format_date(note.date),
                note.content
            );
        }
        Ok(())
    }

    fn handle_note(
        &mut self,
        content: String,
        color: Option<String>,
        sticker: Option<String>,
    ) -> Result<()> {
        if let Some(sticker) = sticker.as_deref() {
            validate_sticker(sticker)?;
        }

        match self.journal.save_quick_note(content, color, sticker) {
            Ok(Some(id)) => println!("Quick note saved: {}", style(id).green()),
            Ok(None) => println!("Nothing to save."),
            Err(e) => self.report_save_failure(e)?,
        }
        Ok(())
    }

    fn handle_cloud(&self) {
        let ranked = crate::summarize(self.journal.records());

        if ranked.is_empty() {
            println!("{}", style("还没有足够的数据生成词云哦~").dim());
            return;
        }

        for (rank, (word, count)) in ranked.iter().enumerate() {
            println!("{:>3}. {}  {}", rank + 1, style(word).cyan(), style(count).dim());
        }
    }

    fn handle_days(&self) {
        let today = Local::now().date_naive();
        let setting = self.journal.anniversary();

        match self.journal.days_since_anniversary(today) {
            Some(days) => println!(
                "{} 已经 {} 天  (since {})",
                setting.title,
                style(days).magenta().bold(),
                setting.date
            ),
            None => println!("No anniversary set. Use `lulu anniversary <YYYY-MM-DD>`."),
        }
    }

    fn handle_anniversary(&mut self, date: String, title: Option<String>) -> Result<()> {
        let title = title.unwrap_or_else(|| self.journal.anniversary().title.clone());
        self.journal.set_anniversary(date, title)?;

        let setting = self.journal.anniversary();
        println!(
            "Anniversary set: {} ({})",
            style(&setting.date).green(),
            setting.title
        );
        Ok(())
    }

    fn handle_export(&self, format: &str, output: Option<PathBuf>) -> Result<()> {
        let output = match format {
            "csv" => output.unwrap_or_else(|| PathBuf::from(RecordStore::default_csv_export_name())),
            _ => output.unwrap_or_else(|| PathBuf::from(RecordStore::default_json_export_name())),
        };

        match format {
            "csv" => {
                self.journal.export_csv(&output)?;
                println!(
                    "Exported CSV to {} {}",
                    style(output.display()).green(),
                    style("(images truncated; not a backup)").dim()
                );
            }
            _ => {
                self.journal.export_json(&output)?;
                println!("Exported JSON backup to {}", style(output.display()).green());
            }
        }
        Ok(())
    }

    fn handle_import(&mut self, file: PathBuf) -> Result<()> {
        let bytes = fs::read(&file)?;
        let count = self.journal.import(&bytes)?;
        println!("导入成功! Imported {} records.", style(count).green());
        Ok(())
    }

    fn handle_tap(&mut self, count: u64) -> Result<()> {
        let total = self.journal.tap_merit(count)?;
        println!("功德 +{}  (total {})", count, style(total).yellow().bold());
        Ok(())
    }

    async fn handle_chat(
        &self,
        message: String,
        mode: ChatMode,
        lat: Option<f64>,
        lng: Option<f64>,
    ) -> Result<()> {
        let client = self.ai_client()?;
        let location = match (lat, lng) {
            (Some(lat), Some(lng)) => Some(Location { lat, lng }),
            _ => None,
        };

        let mut exchange = vec![ChatMessage::user(message.clone())];
        match client.chat(&message, mode, location).await {
            Ok(reply) => exchange.push(ChatMessage::model(reply.text, reply.grounding)),
            Err(e) => {
                warn!("AI call failed: {}", e);
                let text = if self.verbose {
                    e.to_string()
                } else {
                    GENERIC_AI_NOTICE.to_string()
                };
                exchange.push(ChatMessage::error(text));
            }
        }

        for entry in &exchange {
            print_chat_message(entry);
        }
        Ok(())
    }

    async fn handle_imagine(
        &self,
        prompt: String,
        aspect_ratio: AspectRatio,
        output: PathBuf,
    ) -> Result<()> {
        let client = self.ai_client()?;

        let data_uri = match client.generate_image(&prompt, aspect_ratio).await {
            Ok(uri) => uri,
            Err(e) => return Err(self.collaborator_notice(e)),
        };

        write_data_uri(&data_uri, &output)?;
        println!("Image written to {}", style(output.display()).green());
        Ok(())
    }

    async fn handle_retouch(
        &self,
        image: PathBuf,
        prompt: String,
        output: PathBuf,
    ) -> Result<()> {
        let client = self.ai_client()?;
        let source = read_image_as_data_uri(&image)?;

        let data_uri = match client.edit_image(&source, &prompt).await {
            Ok(uri) => uri,
            Err(e) => return Err(self.collaborator_notice(e)),
        };

        write_data_uri(&data_uri, &output)?;
        println!("Edited image written to {}", style(output.display()).green());
        Ok(())
    }

    async fn handle_describe(&self, image: PathBuf) -> Result<()> {
        let client = self.ai_client()?;
        let source = read_image_as_data_uri(&image)?;

        match client.describe_image(&source).await {
            Ok(text) => {
                println!("{}", text);
                Ok(())
            }
            Err(e) => Err(self.collaborator_notice(e)),
        }
    }

    fn ai_client(&self) -> Result<GeminiClient> {
        GeminiClient::new(self.config.get_api_key()?)
    }

    /// One generic user-facing notice per failed AI call; the details go
    /// to the log only.
    fn collaborator_notice(&self, e: JournalError) -> JournalError {
        warn!("AI call failed: {}", e);
        if self.verbose {
            return e;
        }
        JournalError::Collaborator {
            message: GENERIC_AI_NOTICE.to_string(),
        }
    }

    /// A failed save is a warning, not a crash: the in-memory state (and
    /// this process's output) stay useful.
    fn report_save_failure(&self, e: JournalError) -> Result<()> {
        if e.is_quota() {
            eprintln!("{}", style(format!("Warning: {}", e)).yellow());
            return Ok(());
        }
        Err(e)
    }
}

fn print_record_line(record: &Record) {
    let image_marker = if record.image.is_some() { " [image]" } else { "" };
    println!(
        "{}  {}  [{}] {}{}",
        style(&record.id).dim(),
        format_date(record.date),
        style(record.category).blue(),
        style(&record.title).bold(),
        style(image_marker).dim()
    );
    if !record.content.is_empty() {
        println!("      {}", record.content);
    }
}

fn print_chat_message(message: &ChatMessage) {
    let prefix = match message.role {
        ChatRole::User => style("you:").dim(),
        ChatRole::Model => style("lulu:").magenta(),
    };

    if message.is_error {
        println!("{} {}", prefix, style(&message.text).red());
    } else {
        println!("{} {}", prefix, message.text);
    }

    if let Some(grounding) = &message.grounding {
        print_citations(grounding);
    }
}

/// Quick-note stickers come from the fixed preset palette.
fn validate_sticker(sticker: &str) -> Result<()> {
    if NOTE_STICKERS.contains(&sticker) {
        return Ok(());
    }
    Err(JournalError::ApplicationError {
        message: format!(
            "'{}' is not a preset sticker (try {} or {})",
            sticker, NOTE_STICKERS[0], NOTE_STICKERS[2]
        ),
    })
}

fn print_citations(grounding: &GroundingMetadata) {
    let sources = grounding
        .grounding_chunks
        .iter()
        .filter_map(|chunk| chunk.web.as_ref().or(chunk.maps.as_ref()));

    let mut printed_header = false;
    for source in sources {
        if !printed_header {
            println!("{}", style("Sources:").dim());
            printed_header = true;
        }
        println!(
            "  - {} {}",
            source.title.as_deref().unwrap_or("(untitled)"),
            style(source.uri.as_deref().unwrap_or("")).dim()
        );
    }
}

fn format_date(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "????-??-??".to_string())
}

/// Reads an image file into a data URI for embedding in a record.
fn read_image_as_data_uri(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(format!("data:{};base64,{}", image_mime(path), STANDARD.encode(bytes)))
}

/// Decodes a data URI (or bare base64 payload) into a file.
fn write_data_uri(data_uri: &str, output: &Path) -> Result<()> {
    let payload = data_uri
        .split_once(";base64,")
        .map(|(_, payload)| payload)
        .unwrap_or(data_uri);

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| JournalError::InvalidFormat {
            message: format!("Bad base64 image payload: {}", e),
        })?;

    fs::write(output, bytes)?;
    Ok(())
}

fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sticker_must_come_from_the_preset_palette() {
        assert!(validate_sticker(NOTE_STICKERS[0]).is_ok());
        assert!(validate_sticker("🎉").is_ok());
        assert!(validate_sticker("not a sticker").is_err());
    }

    #[test]
    fn mime_follows_extension_with_png_fallback() {
        assert_eq!(image_mime(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(image_mime(Path::new("a.JPEG")), "image/jpeg");
        assert_eq!(image_mime(Path::new("a.webp")), "image/webp");
        assert_eq!(image_mime(Path::new("a.bin")), "image/png");
    }

    #[test]
    fn image_round_trips_through_data_uri() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = dir.path().join("pic.png");
        fs::write(&source, [0x89, b'P', b'N', b'G']).unwrap();

        let uri = read_image_as_data_uri(&source).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));

        let output = dir.path().join("out.png");
        write_data_uri(&uri, &output).unwrap();
        assert_eq!(fs::read(&output).unwrap(), vec![0x89, b'P', b'N', b'G']);
    }
}
