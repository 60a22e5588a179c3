use clap::{App, Arg, SubCommand};
use favicon_ico::{FaviconOptions, FitMode, ResizeOptions};
use log::{info, LevelFilter};
use std::error::Error;
use std::fs;
use std::path::PathBuf;

//===========================================================================//

fn main() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
    std::process::exit(match run() {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {}", error);
            1
        }
    })
}

fn run() -> Result<(), Box<dyn Error>> {
    let matches = App::new("favicontool")
        .version("0.1")
        .about("Generates favicons and resizes PNG files")
        .subcommand(
            SubCommand::with_name("favicon")
                .about("Creates a multi-size ICO file from a PNG file")
                .arg(
                    Arg::with_name("output")
                        .takes_value(true)
                        .value_name("PATH")
                        .short("o")
                        .long("output")
                        .help("Sets output path (default: favicon.ico)"),
                )
                .arg(
                    Arg::with_name("sizes")
                        .takes_value(true)
                        .value_name("LIST")
                        .long("sizes")
                        .help("Comma-separated icon sizes"),
                )
                .arg(Arg::with_name("png").required(true)),
        )
        .subcommand(
            SubCommand::with_name("resize")
                .about("Resizes a PNG file")
                .arg(
                    Arg::with_name("output")
                        .takes_value(true)
                        .value_name("PATH")
                        .short("o")
                        .long("output")
                        .help("Sets output path"),
                )
                .arg(
                    Arg::with_name("max-width")
                        .takes_value(true)
                        .value_name("PIXELS")
                        .long("max-width"),
                )
                .arg(
                    Arg::with_name("max-height")
                        .takes_value(true)
                        .value_name("PIXELS")
                        .long("max-height"),
                )
                .arg(
                    Arg::with_name("fit")
                        .takes_value(true)
                        .possible_values(&["contain", "cover"])
                        .long("fit"),
                )
                .arg(Arg::with_name("png").required(true)),
        )
        .get_matches();
    if let Some(submatches) = matches.subcommand_matches("favicon") {
        let png_path = submatches.value_of("png").ok_or("no PNG given")?;
        let mut options = FaviconOptions::default();
        if let Some(list) = submatches.value_of("sizes") {
            options.sizes = list
                .split(',')
                .map(|size| size.trim().parse::<f64>())
                .collect::<Result<_, _>>()?;
        }
        let out_path = PathBuf::from(
            submatches.value_of("output").unwrap_or(favicon_ico::ICO_FILE_NAME),
        );
        let favicon = favicon_ico::generate_favicon_from_png(
            &fs::read(png_path)?,
            &options,
        )?;
        fs::write(&out_path, favicon.data())?;
        info!(
            "wrote {:?} ({} bytes, {} sizes)",
            out_path,
            favicon.size_bytes(),
            favicon.previews().len()
        );
    } else if let Some(submatches) = matches.subcommand_matches("resize") {
        let png_path = submatches.value_of("png").ok_or("no PNG given")?;
        let options = ResizeOptions {
            max_width: parse_pixels(submatches.value_of("max-width"))?,
            max_height: parse_pixels(submatches.value_of("max-height"))?,
            fit: submatches
                .value_of("fit")
                .and_then(FitMode::from_name)
                .unwrap_or_default(),
        };
        let out_path = match submatches.value_of("output") {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(format!("{}.resized.png", png_path)),
        };
        let resized = favicon_ico::resize_png(&fs::read(png_path)?, &options)?;
        fs::write(&out_path, &resized.data)?;
        info!("wrote {:?} ({}x{})", out_path, resized.width, resized.height);
    }
    Ok(())
}

fn parse_pixels(value: Option<&str>) -> Result<Option<u32>, Box<dyn Error>> {
    match value {
        Some(value) => Ok(Some(value.parse::<u32>()?)),
        None => Ok(None),
    }
}

//===========================================================================//
