#[macro_use]
extern crate tracing;

mod app;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use winit::event_loop::{ControlFlow, EventLoop};

use pixboard::config::Config;
use pixboard::route::parse_dimensions;
use pixboard::store::{Persistable, Store};
use pixboard::swatches::Swatches;
use pixboard::buffer::whole_dimensions;
use pixboard::{Board, BoardError, BoardSource};

use crate::app::App;

#[derive(argh::FromArgs)]
/// Shared pixel board you paint cell by cell
struct Args {
    #[argh(positional)]
    /// board size such as 20x20
    size: Option<String>,

    #[argh(option)]
    /// encoded board to start from
    from: Option<String>,

    #[argh(option)]
    /// file containing an encoded board
    from_file: Option<PathBuf>,

    #[argh(option, default = "PathBuf::from(\"pixboard.json\")")]
    /// config file
    config: PathBuf,

    #[argh(option)]
    /// directory for saved state, overrides the config
    data_dir: Option<PathBuf>,

    #[argh(switch)]
    /// print the encoded board and exit
    share: bool,

    #[argh(option)]
    /// write the board as a PNG (one pixel per cell) and exit
    export_png: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args: Args = argh::from_env();

    let mut config = Config::load(&args.config)?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }

    let size = match args.size.as_deref().map(parse_dimensions).transpose() {
        Ok(size) => size,
        Err(e) => {
            error!("invalid board size {:?}", args.size.as_deref().unwrap_or_default());
            anyhow::bail!(e);
        }
    };
    let size = size.map(|(w, h)| whole_dimensions(w, h)).transpose()?;

    let from = match (args.from, args.from_file) {
        (Some(encoded), _) => Some(encoded),
        (None, Some(path)) => Some(
            fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?,
        ),
        (None, None) => None,
    };

    let store = Store::open(&config.data_dir)?;
    let saved_board = Persistable::load(store.clone(), "board", String::new());
    let swatches = Persistable::load(store, "swatches", Swatches::default());

    // Explicit payload, then explicit size, then the last saved board
    let from = from.or_else(|| {
        (size.is_none() && !saved_board.get().is_empty()).then(|| saved_board.get().clone())
    });
    let (fallback_width, fallback_height) =
        size.unwrap_or((config.default_width, config.default_height));

    let board = match BoardSource::resolve(size, from) {
        Ok(BoardSource::Encoded(encoded)) => {
            let (board, error) =
                Board::restore(&encoded, fallback_width, fallback_height, config.payload_policy)?;
            if let Some(e) = error {
                warn!("started with a blank board: {e}");
            }
            board
        }
        Ok(source) => Board::new(source, config.payload_policy)?,
        Err(BoardError::MissingSource) => Board::new(
            BoardSource::Dimensions {
                width: config.default_width,
                height: config.default_height,
            },
            config.payload_policy,
        )?,
        Err(e) => return Err(e.into()),
    };

    if args.share {
        println!("{}", board.encode());
        return Ok(());
    }
    if let Some(path) = args.export_png {
        board.export_png(&path)?;
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(board, swatches, saved_board, config);
    event_loop.run_app(&mut app)?;
    Ok(())
}
