//! Module for handling command line arguments.

mod model;
mod parser;


use std::convert::TryFrom;
use std::env;
use std::ffi::OsString;

use super::{NAME, VERSION};
pub use self::model::{ArgsError, Command, Options};
use self::parser::create_parser;


/// Parse command line arguments and return `Options` object.
#[inline]
pub fn parse() -> Result<Options, ArgsError> {
    parse_from_argv(env::args_os())
}

/// Parse application options from given array of arguments
/// (*all* arguments, including binary name).
#[inline]
pub fn parse_from_argv<I, T>(argv: I) -> Result<Options, ArgsError>
    where I: IntoIterator<Item=T>, T: Clone + Into<OsString>
{
    let parser = create_parser();
    let matches = parser.get_matches_from_safe(argv)?;
    Options::try_from(matches)
}


#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use lolz::{MemeId, SortOrder};
    use spectral::prelude::*;

    use crate::NAME;
    use super::{parse_from_argv, ArgsError, Command};

    #[test]
    fn no_args() {
        assert_that!(parse_from_argv(Vec::<&str>::new())).is_err();
        assert_that!(parse_from_argv(vec![*NAME])).is_err();
    }

    #[test]
    fn help_shows_authors() {
        match parse_from_argv(vec![*NAME, "--help"]) {
            Err(ArgsError::Parse(e)) => {
                assert_eq!(clap::ErrorKind::HelpDisplayed, e.kind);
                assert!(e.message.contains(env!("CARGO_PKG_AUTHORS")), "{}", e.message);
            }
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn defaults() {
        let opts = parse_from_argv(vec![*NAME, "templates"]).unwrap();
        assert_eq!(0, opts.verbosity);
        assert_eq!(PathBuf::from("./lolz-data"), opts.data_dir);
        assert_eq!(PathBuf::from("data/templates"), opts.assets_dir);
        assert_eq!(PathBuf::from("data/fonts"), opts.fonts_dir);
        assert_eq!(Command::Templates, opts.command);
    }

    #[test]
    fn verbosity() {
        let opts = parse_from_argv(vec![*NAME, "-vv", "templates"]).unwrap();
        assert_eq!(2, opts.verbosity);
        let opts = parse_from_argv(vec![*NAME, "-q", "templates"]).unwrap();
        assert!(opts.quiet());
        assert_that!(parse_from_argv(vec![*NAME, "-v", "-q", "templates"])).is_err();
    }

    #[test]
    fn directories() {
        let opts = parse_from_argv(vec![
            *NAME, "--data-dir", "/tmp/lolz", "--assets", "a", "--fonts", "f", "list"]).unwrap();
        assert_eq!(PathBuf::from("/tmp/lolz"), opts.data_dir);
        assert_eq!(PathBuf::from("a"), opts.assets_dir);
        assert_eq!(PathBuf::from("f"), opts.fonts_dir);
    }

    #[test]
    fn render() {
        let opts = parse_from_argv(vec![*NAME, "render", "draft.json"]).unwrap();
        assert_eq!(Command::Render{
            draft: "draft.json".into(), output_path: None, quality: None}, opts.command);

        let opts = parse_from_argv(vec![
            *NAME, "render", "draft.json", "-o", "out.jpg", "--quality", "70"]).unwrap();
        assert_eq!(Command::Render{
            draft: "draft.json".into(), output_path: Some("out.jpg".into()), quality: Some(70)},
            opts.command);

        let opts = parse_from_argv(vec![*NAME, "render", "-", "-o", "-"]).unwrap();
        assert_eq!(Command::Render{draft: "-".into(), output_path: None, quality: None},
            opts.command);
    }

    #[test]
    fn render_invalid_quality() {
        for quality in &["0", "101", "high"] {
            match parse_from_argv(vec![*NAME, "render", "d.json", "--quality", *quality]) {
                Err(ArgsError::Quality(q)) => assert_eq!(*quality, q),
                r => panic!("unexpected result: {:?}", r),
            }
        }
    }

    #[test]
    fn render_requires_draft() {
        assert_that!(parse_from_argv(vec![*NAME, "render"])).is_err();
    }

    #[test]
    fn save() {
        let opts = parse_from_argv(vec![
            *NAME, "save", "d.json", "--description", " my meme "]).unwrap();
        assert_eq!(Command::Save{draft: "d.json".into(), description: "my meme".into()},
            opts.command);
    }

    #[test]
    fn list() {
        let opts = parse_from_argv(vec![*NAME, "list"]).unwrap();
        assert_eq!(Command::List{order: SortOrder::NewestFirst, json: false}, opts.command);
        let opts = parse_from_argv(vec![*NAME, "list", "--sort", "favorites", "--json"]).unwrap();
        assert_eq!(Command::List{order: SortOrder::FavoritesFirst, json: true}, opts.command);
        assert_that!(parse_from_argv(vec![*NAME, "list", "--sort", "random"])).is_err();
    }

    #[test]
    fn meme_ids() {
        let opts = parse_from_argv(vec![*NAME, "favorite", "3"]).unwrap();
        assert_eq!(Command::Favorite{id: MemeId(3)}, opts.command);
        let opts = parse_from_argv(vec![*NAME, "share", "7"]).unwrap();
        assert_eq!(Command::Share{id: MemeId(7)}, opts.command);
        let opts = parse_from_argv(vec![*NAME, "delete", "1", "2", "5"]).unwrap();
        assert_eq!(Command::Delete{ids: vec![MemeId(1), MemeId(2), MemeId(5)]}, opts.command);
    }

    #[test]
    fn invalid_meme_ids() {
        assert_that!(parse_from_argv(vec![*NAME, "delete"])).is_err();
        for id in &["0", "x", "1.5"] {
            match parse_from_argv(vec![*NAME, "share", *id]) {
                Err(ArgsError::MemeId(s)) => assert_eq!(*id, s),
                r => panic!("unexpected result: {:?}", r),
            }
        }
    }
}
