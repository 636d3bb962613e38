//! Module implementing the subcommands of the application.

use std::fs;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use futures::Future;
use lolz::{ImageMeme, MemeDraft, SortOrder, Studio, StudioError};
use thiserror::Error;

use crate::args::Command;


/// Format of the creation time of memes on the list.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";


/// Execute given command, writing its results to the output.
pub fn execute<W: Write>(studio: &Studio, command: Command, quiet: bool,
                         mut output: W) -> Result<(), CommandError> {
    trace!("Executing {:?}", command);
    match command {
        Command::Render{draft, output_path, quality} => {
            let draft = read_draft(&draft)?;
            render(studio, draft, output_path.as_ref().map(|p| p.as_path()), quality, output)
        }
        Command::Save{draft, description} => {
            let draft = read_draft(&draft)?;
            let meme = studio.save(draft, description).wait()?;
            let printed = if quiet {
                writeln!(output, "{}", meme.id)
            } else {
                writeln!(output, "Saved meme {} as {}", meme.id, meme.image_path.display())
            };
            printed.map_err(CommandError::Print)
        }
        Command::List{order, json} => {
            let memes = studio.memes(order).wait()?;
            print_memes(&memes, order, json, output).map_err(CommandError::Print)
        }
        Command::Favorite{id} => {
            let favorite = studio.toggle_favorite(id).wait()?;
            if quiet { return Ok(()); }
            writeln!(output, "Meme {} {}", id,
                if favorite { "is now a favorite" } else { "is no longer a favorite" })
                .map_err(CommandError::Print)
        }
        Command::Delete{ids} => {
            let deleted = studio.delete(ids).wait()?;
            if quiet { return Ok(()); }
            writeln!(output, "Deleted {} meme(s)", deleted).map_err(CommandError::Print)
        }
        Command::Share{id} => {
            let uri = studio.share(id).wait()?;
            writeln!(output, "{}", uri).map_err(CommandError::Print)
        }
        Command::Templates => {
            let templates = studio.templates().wait()?;
            if templates.is_empty() {
                warn!("No templates installed in {}", studio.files().templates_dir().display());
            }
            for id in templates {
                writeln!(output, "{}", id).map_err(CommandError::Print)?;
            }
            Ok(())
        }
    }
}


/// Error that may occur while executing a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("cannot read meme draft {}: {source}", .path.display())]
    ReadDraft { path: PathBuf, source: io::Error },
    #[error("invalid meme draft {}: {source}", .path.display())]
    ParseDraft { path: PathBuf, source: serde_json::Error },
    #[error("cannot write image to {}: {source}", .path.display())]
    WriteImage { path: PathBuf, source: io::Error },
    #[error("cannot print the result: {0}")]
    Print(#[source] io::Error),
    #[error("{0}")]
    Studio(#[from] StudioError),
}

impl CommandError {
    /// Short failure message that can be shown to the user.
    pub fn user_message(&self) -> &'static str {
        match *self {
            CommandError::ReadDraft{..} => "Could not read meme draft",
            CommandError::ParseDraft{..} => "Invalid meme draft",
            CommandError::WriteImage{..} => "Could not write meme image",
            CommandError::Print(_) => "Could not print the result",
            CommandError::Studio(ref e) => e.user_message(),
        }
    }

    /// Exit code of the program that failed with this error.
    pub fn exit_code(&self) -> exitcode::ExitCode {
        match *self {
            CommandError::ReadDraft{..} => exitcode::NOINPUT,
            CommandError::ParseDraft{..} => exitcode::DATAERR,
            CommandError::WriteImage{..} => exitcode::CANTCREAT,
            CommandError::Print(_) => exitcode::IOERR,
            CommandError::Studio(StudioError::NoSuchMeme(_)) => exitcode::DATAERR,
            CommandError::Studio(StudioError::Files(_)) => exitcode::IOERR,
            CommandError::Studio(_) => exitcode::UNAVAILABLE,
        }
    }
}


/// Read the meme draft from a JSON file, or standard input if the path is `-`.
fn read_draft(path: &Path) -> Result<MemeDraft, CommandError> {
    let parse_err = |source| CommandError::ParseDraft{path: path.to_owned(), source};
    let draft: MemeDraft = if path == Path::new("-") {
        trace!("Reading meme draft from standard input...");
        let stdin = io::stdin();
        let handle = stdin.lock();
        serde_json::from_reader(handle).map_err(parse_err)?
    } else {
        trace!("Reading meme draft from {}...", path.display());
        let file = fs::File::open(path)
            .map_err(|source| CommandError::ReadDraft{path: path.to_owned(), source})?;
        serde_json::from_reader(BufReader::new(file)).map_err(parse_err)?
    };
    debug!("Meme draft read from {}: {:?}", path.display(), draft);
    Ok(draft)
}

/// Render a draft into a JPEG file, or given output if there's no file.
fn render<W: Write>(studio: &Studio, draft: MemeDraft, path: Option<&Path>,
                    quality: Option<u8>, mut output: W) -> Result<(), CommandError> {
    if !draft.has_text() {
        warn!("Meme draft has no text to render");
    }
    let engine = studio.engine();
    let quality = quality.unwrap_or_else(|| engine.config().jpeg_quality);
    let rendered = engine.render(draft.template, &draft.text_boxes, draft.container)
        .map_err(StudioError::from)?;
    let bytes = rendered.to_jpeg(quality).map_err(StudioError::from)?;
    drop(rendered);
    if let Some(cache) = engine.template_cache() {
        debug!("Template cache: {}", cache.stats());
    }
    if let Some(cache) = engine.font_cache() {
        debug!("Font cache: {}", cache.stats());
    }

    match path {
        Some(path) => {
            trace!("Writing {} bytes to {}...", bytes.len(), path.display());
            fs::write(path, &bytes)
                .map_err(|source| CommandError::WriteImage{path: path.to_owned(), source})?;
            info!("Meme written to {}", path.display());
            Ok(())
        }
        None => {
            trace!("Writing {} bytes to standard output...", bytes.len());
            output.write_all(&bytes).and_then(|_| output.flush()).map_err(CommandError::Print)
        }
    }
}

fn print_memes<W: Write>(memes: &[ImageMeme], order: SortOrder, json: bool,
                         mut output: W) -> io::Result<()> {
    debug!("Listing {} saved meme(s) ({})", memes.len(), order);
    if json {
        serde_json::to_writer_pretty(&mut output, memes)?;
        return writeln!(output);
    }
    for meme in memes {
        writeln!(output, "{}", format_meme(meme))?;
    }
    Ok(())
}

/// Format a meme as a line of the list.
fn format_meme(meme: &ImageMeme) -> String {
    let mut line = format!("{:>4} {} {}  {}",
        meme.id.0, if meme.is_favorite { '*' } else { ' ' },
        format_timestamp(meme.created_at), meme.image_path.display());
    if !meme.description.is_empty() {
        line.push_str(&format!("  {:?}", meme.description));
    }
    line
}

fn format_timestamp(millis: i64) -> String {
    let timespec = time::Timespec::new(
        millis.div_euclid(1000), (millis.rem_euclid(1000) * 1_000_000) as i32);
    let tm = time::at(timespec);
    time::strftime(TIMESTAMP_FORMAT, &tm).unwrap_or_else(|_| millis.to_string())
}



#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use image::{Rgba, RgbaImage};
    use lolz::{ImageMeme, MemeId, MemoryMemeStore, SortOrder, StudioBuilder};
    use spectral::prelude::*;

    use crate::args::Command;
    use super::{execute, format_meme, read_draft, CommandError};

    const DRAFT: &str = r#"{
        "template": 1,
        "container": {"width": 300, "height": 300},
        "text_boxes": [{"id": 1, "text": " ", "position": {"x": 10, "y": 20}}]
    }"#;

    fn studio(root: &Path) -> lolz::Studio {
        let studio = StudioBuilder::new(root).store(MemoryMemeStore::new()).build().unwrap();
        RgbaImage::from_pixel(100, 50, Rgba([0xff, 0xff, 0xff, 0xff]))
            .save(studio.files().templates_dir().join("1.png")).unwrap();
        studio
    }

    fn run(studio: &lolz::Studio, command: Command) -> Result<String, CommandError> {
        let mut output = vec![];
        execute(studio, command, false, &mut output)?;
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    #[test]
    fn draft_errors() {
        let dir = tempfile::tempdir().unwrap();
        match read_draft(&dir.path().join("missing.json")) {
            Err(e @ CommandError::ReadDraft{..}) => assert_eq!(exitcode::NOINPUT, e.exit_code()),
            r => panic!("unexpected result: {:?}", r),
        }
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"template": "nope"}"#).unwrap();
        match read_draft(&path) {
            Err(e @ CommandError::ParseDraft{..}) => assert_eq!("Invalid meme draft", e.user_message()),
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn render_to_file_and_output() {
        let dir = tempfile::tempdir().unwrap();
        let studio = studio(&dir.path().join("data"));
        let draft = dir.path().join("draft.json");
        fs::write(&draft, DRAFT).unwrap();

        let out = dir.path().join("out.jpg");
        run(&studio, Command::Render{
            draft: draft.clone(), output_path: Some(out.clone()), quality: Some(50)}).unwrap();
        let image = image::open(&out).unwrap();
        assert_eq!((300, 150), (image.width(), image.height()));

        let mut output = vec![];
        execute(&studio, Command::Render{draft, output_path: None, quality: None},
            false, &mut output).unwrap();
        assert_eq!(&[0xff, 0xd8], &output[..2]);
    }

    #[test]
    fn saved_meme_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let studio = studio(&dir.path().join("data"));
        let draft = dir.path().join("draft.json");
        fs::write(&draft, DRAFT).unwrap();

        let saved = run(&studio, Command::Save{draft, description: "test".into()}).unwrap();
        assert!(saved.starts_with("Saved meme 1 as "));

        let json = run(&studio, Command::List{order: SortOrder::NewestFirst, json: true}).unwrap();
        let memes: Vec<ImageMeme> = serde_json::from_str(&json).unwrap();
        assert_eq!(1, memes.len());
        assert_eq!("test", memes[0].description);

        let fav = run(&studio, Command::Favorite{id: MemeId(1)}).unwrap();
        assert_eq!("Meme 1 is now a favorite\n", fav);
        let list = run(&studio, Command::List{order: SortOrder::default(), json: false}).unwrap();
        assert!(list.starts_with("   1 * "));

        let uri = run(&studio, Command::Share{id: MemeId(1)}).unwrap();
        assert!(uri.starts_with("file://"));

        let deleted = run(&studio, Command::Delete{ids: vec![MemeId(1), MemeId(2)]}).unwrap();
        assert_eq!("Deleted 1 meme(s)\n", deleted);
        assert!(!memes[0].image_path.exists());
        match run(&studio, Command::Share{id: MemeId(1)}) {
            Err(e) => assert_eq!(exitcode::DATAERR, e.exit_code()),
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn templates() {
        let dir = tempfile::tempdir().unwrap();
        let studio = studio(dir.path());
        assert_that!(run(&studio, Command::Templates)).is_ok().is_equal_to("1\n".to_owned());
    }

    #[test]
    fn meme_line() {
        let mut meme = ImageMeme::new("/tmp/m.jpg", "funny");
        meme.id = MemeId(12);
        let line = format_meme(&meme);
        assert!(line.starts_with("  12   "));
        assert!(line.ends_with("/tmp/m.jpg  \"funny\""));
    }
}
