//! Module defining the command line argument parser.

use std::convert::TryFrom;
use std::path::PathBuf;

use clap::{self, AppSettings, Arg, ArgMatches, SubCommand};
use lolz::{MemeId, SortOrder};

use super::{NAME, VERSION};
use super::model::{ArgsError, Command, Options};


impl<'a> TryFrom<ArgMatches<'a>> for Options {
    type Error = ArgsError;

    fn try_from(matches: ArgMatches<'a>) -> Result<Self, Self::Error> {
        let verbose_count = matches.occurrences_of(OPT_VERBOSE) as isize;
        let quiet_count = matches.occurrences_of(OPT_QUIET) as isize;
        let verbosity = verbose_count - quiet_count;

        let path_of = |name: &str, default: &str| PathBuf::from(
            matches.value_of(name).map(|p| p.trim()).unwrap_or(default));
        let data_dir = path_of(OPT_DATA_DIR, DEFAULT_DATA_DIR);
        let assets_dir = path_of(OPT_ASSETS, DEFAULT_ASSETS_DIR);
        let fonts_dir = path_of(OPT_FONTS, DEFAULT_FONTS_DIR);

        let command = match matches.subcommand() {
            (CMD_RENDER, Some(m)) => {
                // Output path can be set explicitly to stdout via `-`.
                let output_path = m.value_of(OPT_OUTPUT)
                    .map(|p| p.trim())
                    .and_then(|p| if p == "-" { None } else { Some(p) })
                    .map(PathBuf::from);
                let quality = m.value_of(OPT_QUALITY).map(parse_quality).transpose()?;
                Command::Render{draft: draft_path(m), output_path, quality}
            }
            (CMD_SAVE, Some(m)) => {
                let description = m.value_of(OPT_DESCRIPTION).unwrap_or("").trim().to_owned();
                Command::Save{draft: draft_path(m), description}
            }
            (CMD_LIST, Some(m)) => {
                let order = match m.value_of(OPT_SORT) {
                    Some(s) => s.parse().map_err(ArgsError::SortOrder)?,
                    None => SortOrder::default(),
                };
                Command::List{order, json: m.is_present(OPT_JSON)}
            }
            (CMD_FAVORITE, Some(m)) => Command::Favorite{id: meme_id(m)?},
            (CMD_DELETE, Some(m)) => {
                let ids = m.values_of(ARG_ID).into_iter().flatten()
                    .map(parse_meme_id)
                    .collect::<Result<Vec<_>, _>>()?;
                Command::Delete{ids}
            }
            (CMD_SHARE, Some(m)) => Command::Share{id: meme_id(m)?},
            (CMD_TEMPLATES, _) => Command::Templates,
            (cmd, _) => return Err(clap::Error::with_description(
                &format!("unknown command `{}`", cmd),
                clap::ErrorKind::UnrecognizedSubcommand).into()),
        };

        Ok(Options{verbosity, data_dir, assets_dir, fonts_dir, command})
    }
}

fn draft_path(matches: &ArgMatches) -> PathBuf {
    PathBuf::from(matches.value_of(ARG_DRAFT).unwrap_or("-").trim())
}

fn meme_id(matches: &ArgMatches) -> Result<MemeId, ArgsError> {
    parse_meme_id(matches.value_of(ARG_ID).unwrap_or(""))
}

fn parse_meme_id(s: &str) -> Result<MemeId, ArgsError> {
    match s.parse::<MemeId>() {
        Ok(id) if id.0 > 0 => Ok(id),
        _ => Err(ArgsError::MemeId(s.to_owned())),
    }
}

fn parse_quality(s: &str) -> Result<u8, ArgsError> {
    match s.trim().parse::<u8>() {
        Ok(q) if q >= 1 && q <= 100 => Ok(q),
        _ => Err(ArgsError::Quality(s.to_owned())),
    }
}


// Parser definition

/// Type of the argument parser object
/// (which is called an "App" in clap's silly nomenclature).
pub type Parser<'p> = clap::App<'p, 'p>;


lazy_static! {
    static ref ABOUT: &'static str = option_env!("CARGO_PKG_DESCRIPTION").unwrap_or("");
}

const CMD_RENDER: &str = "render";
const CMD_SAVE: &str = "save";
const CMD_LIST: &str = "list";
const CMD_FAVORITE: &str = "favorite";
const CMD_DELETE: &str = "delete";
const CMD_SHARE: &str = "share";
const CMD_TEMPLATES: &str = "templates";

const ARG_DRAFT: &str = "draft";
const ARG_ID: &str = "id";
const OPT_OUTPUT: &str = "output";
const OPT_QUALITY: &str = "quality";
const OPT_DESCRIPTION: &str = "description";
const OPT_SORT: &str = "sort";
const OPT_JSON: &str = "json";
const OPT_DATA_DIR: &str = "data-dir";
const OPT_ASSETS: &str = "assets";
const OPT_FONTS: &str = "fonts";
const OPT_VERBOSE: &str = "verbose";
const OPT_QUIET: &str = "quiet";

const DEFAULT_DATA_DIR: &str = "./lolz-data";
const DEFAULT_ASSETS_DIR: &str = "data/templates";
const DEFAULT_FONTS_DIR: &str = "data/fonts";


/// Create the parser for application's command line.
pub fn create_parser<'p>() -> Parser<'p> {
    let mut parser = Parser::new(*NAME);
    if let Some(version) = *VERSION {
        parser = parser.version(version);
    }
    parser
        .about(*ABOUT)
        .author(env!("CARGO_PKG_AUTHORS"))

        .setting(AppSettings::StrictUtf8)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .setting(AppSettings::VersionlessSubcommands)

        .setting(AppSettings::UnifiedHelpMessage)
        .setting(AppSettings::DontCollapseArgsInUsage)
        .setting(AppSettings::DeriveDisplayOrder)

        // Directories.
        .arg(Arg::with_name(OPT_DATA_DIR)
            .long("data-dir").short("d")
            .value_name("DIR")
            .help("Directory to keep the saved memes in")
            .long_help(concat!(
                "Directory where the app keeps its files.\n\n",
                "It holds the installed templates, the saved memes with their list, ",
                "and the images rendered for sharing. It's created if it doesn't exist.")))
        .arg(Arg::with_name(OPT_ASSETS)
            .long("assets")
            .value_name("DIR")
            .help("Directory with the bundled templates to install"))
        .arg(Arg::with_name(OPT_FONTS)
            .long("fonts")
            .value_name("DIR")
            .help("Directory to load the fonts from"))

        // Verbosity flags.
        .arg(Arg::with_name(OPT_VERBOSE)
            .long("verbose").short("v")
            .multiple(true)
            .conflicts_with(OPT_QUIET)
            .help("Increase logging verbosity"))
        .arg(Arg::with_name(OPT_QUIET)
            .long("quiet").short("q")
            .multiple(true)
            .conflicts_with(OPT_VERBOSE)
            .help("Decrease logging verbosity"))

        .subcommand(SubCommand::with_name(CMD_RENDER)
            .about("Render a meme draft into an image without saving it")
            .arg(draft_arg())
            .arg(Arg::with_name(OPT_OUTPUT)
                .long("output").short("o")
                .value_name("FILE")
                .help("File to write the rendered JPEG to")
                .long_help(concat!(
                    "What file should the final image be written to.\n\n",
                    "By default, or when this flag is set to `-` (single dash), ",
                    "the image is written to standard output.")))
            .arg(Arg::with_name(OPT_QUALITY)
                .long("quality")
                .value_name("N")
                .help("JPEG quality, from 1 to 100")))
        .subcommand(SubCommand::with_name(CMD_SAVE)
            .about("Render a meme draft and keep it among the saved memes")
            .arg(draft_arg())
            .arg(Arg::with_name(OPT_DESCRIPTION)
                .long("description")
                .value_name("TEXT")
                .help("Description of the saved meme")))
        .subcommand(SubCommand::with_name(CMD_LIST)
            .about("List the saved memes")
            .arg(Arg::with_name(OPT_SORT)
                .long("sort").short("s")
                .value_name("ORDER")
                .possible_values(&["newest", "oldest", "favorites"])
                .help("Order of the list"))
            .arg(Arg::with_name(OPT_JSON)
                .long("json")
                .help("Print the list as JSON")))
        .subcommand(SubCommand::with_name(CMD_FAVORITE)
            .about("Toggle whether a saved meme is a favorite")
            .arg(id_arg()))
        .subcommand(SubCommand::with_name(CMD_DELETE)
            .about("Delete saved memes together with their images")
            .arg(id_arg().multiple(true)))
        .subcommand(SubCommand::with_name(CMD_SHARE)
            .about("Print the URI to share a saved meme with")
            .arg(id_arg()))
        .subcommand(SubCommand::with_name(CMD_TEMPLATES)
            .about("List the available templates"))

        .help_short("H")
        .version_short("V")
}

fn draft_arg<'p>() -> Arg<'p, 'p> {
    Arg::with_name(ARG_DRAFT)
        .value_name("DRAFT")
        .required(true)
        .help("JSON file with the meme draft")
        .long_help(concat!(
            "JSON file with the meme draft to render, or `-` for standard input.\n\n",
            "The draft holds the template id, the size of the container it's shown in ",
            "and the text boxes, e.g.: {\"template\": 1, \"container\": ",
            "{\"width\": 400, \"height\": 400}, \"text_boxes\": [...]}"))
}

fn id_arg<'p>() -> Arg<'p, 'p> {
    Arg::with_name(ARG_ID)
        .value_name("ID")
        .required(true)
        .help("Id of the saved meme")
}
