use clap::{App, Arg, SubCommand};
use std::path::{Path, PathBuf};
use std::process;

//===========================================================================//

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "{:<5} [{}] {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

//===========================================================================//

fn main() {
    let size_arg = Arg::with_name("size")
        .takes_value(true)
        .value_name("PIXELS")
        .short("s")
        .long("size")
        .help("Sets the side length of the output image");
    let output_arg = Arg::with_name("output")
        .takes_value(true)
        .value_name("PATH")
        .short("o")
        .long("output")
        .help("Sets output path");
    let matches = App::new("pngtool")
        .version("0.1")
        .about("Resizes PNG files and converts them to ICO files")
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Logs codec activity to stderr"),
        )
        .subcommand(
            SubCommand::with_name("info")
                .about("Lists the header and chunks of a PNG file")
                .arg(Arg::with_name("png").required(true)),
        )
        .subcommand(
            SubCommand::with_name("resize")
                .about("Downsamples a square PNG file")
                .arg(size_arg.clone().required(true))
                .arg(output_arg.clone())
                .arg(Arg::with_name("png").required(true)),
        )
        .subcommand(
            SubCommand::with_name("ico")
                .about("Converts a PNG file into a single-image ICO file")
                .arg(size_arg)
                .arg(output_arg)
                .arg(Arg::with_name("png").required(true)),
        )
        .get_matches();

    let level = match matches.occurrences_of("verbose") {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);

    if let Some(submatches) = matches.subcommand_matches("info") {
        let path = submatches.value_of("png").unwrap();
        let image = or_exit(pngico::load(path));
        let header = image.header();
        println!(
            "{}x{}, bit depth {}, color type {} ({:?}), \
             compression {}, filter {}, interlace {}",
            header.width,
            header.height,
            header.bit_depth,
            header.color_type,
            header.color(),
            header.compression_method,
            header.filter_method,
            header.interlace_method
        );
        for (index, chunk) in image.chunks().iter().enumerate() {
            let crc = if chunk.has_valid_checksum() { "ok" } else { "BAD" };
            println!(
                "{:5}: {} {} bytes, crc {:08x} {}",
                index,
                String::from_utf8_lossy(chunk.chunk_type()),
                chunk.length(),
                chunk.checksum(),
                crc
            );
        }
    } else if let Some(submatches) = matches.subcommand_matches("resize") {
        let path = submatches.value_of("png").unwrap();
        let size = parse_size(submatches.value_of("size").unwrap());
        let out_path =
            output_path(submatches.value_of("output"), path, size, "png");
        let image = or_exit(pngico::load(path));
        let resized = or_exit(image.resize(size, None));
        or_exit(resized.save_png(Some(out_path.as_path())));
        println!("Wrote {:?}", out_path);
    } else if let Some(submatches) = matches.subcommand_matches("ico") {
        let path = submatches.value_of("png").unwrap();
        let image = or_exit(pngico::load(path));
        let size = submatches.value_of("size").map(parse_size);
        let side = size.unwrap_or_else(|| image.width());
        let out_path =
            output_path(submatches.value_of("output"), path, side, "ico");
        let image = match size {
            Some(size) if size != image.width() => {
                or_exit(image.resize(size, None))
            }
            _ => image,
        };
        or_exit(image.save_ico(&out_path));
        println!("Wrote {:?}", out_path);
    }
}

//===========================================================================//

fn parse_size(value: &str) -> u32 {
    match value.parse::<u32>() {
        Ok(size) if size > 0 => size,
        _ => {
            eprintln!("error: invalid size {:?}", value);
            process::exit(2);
        }
    }
}

fn output_path(
    explicit: Option<&str>,
    input: &str,
    size: u32,
    extension: &str,
) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }
    let stem = Path::new(input)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string());
    PathBuf::from(format!("{}{}x{}.{}", stem, size, size, extension))
}

fn or_exit<T>(result: pngico::Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(error) => {
            eprintln!("error: {}", error);
            process::exit(1);
        }
    }
}

//===========================================================================//
