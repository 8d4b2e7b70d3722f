// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use svgimage::{Color, Image, RenderOptions};

const USAGE: &str = "\
Render basic SVG shapes into a PNG image.

Usage: svgimage [OPTIONS] <input> [<output>]

<input> is an SVG or SVGZ file, or '-' to read stdin.
<output> is a PNG file. It can be omitted only together with --dump-svg.

Size (the document size is used by default):
  -w, --width PX         Output width; height keeps the aspect ratio
  -h, --height PX        Output height; width keeps the aspect ratio
  -z, --zoom FACTOR      Scale the document size

Drawing:
  --background COLOR     Fill the image first, e.g. white or #336699
  --no-anti-alias        Draw shapes with hard edges

Misc:
  --dump-svg PATH        Write the parsed document back as SVG
  --perf                 Print how long each step took
  --quiet                Do not print warnings
  -V, --version          Print the version
  --help                 Print this text
";

fn main() {
    let args = match Args::from_env() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}.\n\n{}", e, USAGE);
            std::process::exit(1);
        }
    };

    if !args.quiet && log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LOGGER.level);
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {}.", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), String> {
    let timer = Timer { enabled: args.perf };

    let data = timer.run("Reading", || read_input(&args.input))?;
    let image = timer.run("Parsing", || Image::from_data(&data).map_err(|e| e.to_string()))?;

    if let Some(ref path) = args.dump_svg {
        std::fs::write(path, image.to_xml_string(true))
            .map_err(|e| format!("cannot write '{}': {}", path.display(), e))?;
    }

    let output = match args.output {
        Some(ref path) => path,
        None => return Ok(()),
    };

    let (width, height) = args
        .size
        .resolve(image.size())
        .ok_or("the output size is zero")?;

    let buf = timer
        .run("Rendering", || {
            image.rasterize_with(width, height, args.background, &args.render)
        })
        .ok_or("cannot allocate the output image")?;

    timer.run("Saving", || buf.save_png(output).map_err(|e| e.to_string()))
}

fn read_input(input: &str) -> Result<Vec<u8>, String> {
    if input == "-" {
        use std::io::Read;

        let mut data = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut data)
            .map_err(|e| format!("cannot read stdin: {}", e))?;
        Ok(data)
    } else {
        std::fs::read(input).map_err(|e| format!("cannot read '{}': {}", input, e))
    }
}

struct Args {
    input: String,
    output: Option<PathBuf>,
    dump_svg: Option<PathBuf>,
    size: OutputSize,
    background: Option<Color>,
    render: RenderOptions,
    perf: bool,
    quiet: bool,
}

impl Args {
    fn from_env() -> Result<Self, String> {
        let mut raw = pico_args::Arguments::from_env();

        if raw.contains("--help") {
            print!("{}", USAGE);
            std::process::exit(0);
        }

        if raw.contains(["-V", "--version"]) {
            println!("{}", env!("CARGO_PKG_VERSION"));
            std::process::exit(0);
        }

        let width = raw
            .opt_value_from_fn(["-w", "--width"], parse_pixels)
            .map_err(|e| e.to_string())?;
        let height = raw
            .opt_value_from_fn(["-h", "--height"], parse_pixels)
            .map_err(|e| e.to_string())?;
        let zoom = raw
            .opt_value_from_fn(["-z", "--zoom"], parse_zoom)
            .map_err(|e| e.to_string())?;

        let size = match (width, height, zoom) {
            (Some(w), Some(h), _) => OutputSize::Exact(w, h),
            (Some(w), None, _) => OutputSize::Width(w),
            (None, Some(h), _) => OutputSize::Height(h),
            (None, None, Some(z)) => OutputSize::Zoom(z),
            (None, None, None) => OutputSize::Original,
        };

        if zoom.is_some() && (width.is_some() || height.is_some()) {
            eprintln!("Warning: --zoom is ignored when --width or --height is set.");
        }

        let args = Args {
            background: raw.opt_value_from_str("--background").map_err(|e| e.to_string())?,
            render: RenderOptions {
                anti_alias: !raw.contains("--no-anti-alias"),
            },
            perf: raw.contains("--perf"),
            quiet: raw.contains("--quiet"),
            dump_svg: raw.opt_value_from_str("--dump-svg").map_err(|e| e.to_string())?,
            input: raw.free_from_str().map_err(|e| e.to_string())?,
            output: raw.opt_free_from_str().map_err(|e| e.to_string())?,
            size,
        };

        if args.output.is_none() && args.dump_svg.is_none() {
            return Err("an output file is required".to_string());
        }

        Ok(args)
    }
}

fn parse_pixels(s: &str) -> Result<u32, String> {
    match s.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        Ok(_) => Err("a size must be positive".to_string()),
        Err(_) => Err(format!("'{}' is not a pixel size", s)),
    }
}

fn parse_zoom(s: &str) -> Result<f32, String> {
    match s.parse::<f32>() {
        Ok(n) if n > 0.0 && n.is_finite() => Ok(n),
        Ok(_) => Err("a zoom factor must be positive".to_string()),
        Err(_) => Err(format!("'{}' is not a zoom factor", s)),
    }
}

/// How the output size is derived from the document size.
#[derive(Clone, Copy, PartialEq, Debug)]
enum OutputSize {
    Original,
    Width(u32),
    Height(u32),
    Exact(u32, u32),
    Zoom(f32),
}

impl OutputSize {
    /// Returns the output size in whole pixels, rounded up.
    fn resolve(self, (w, h): (f64, f64)) -> Option<(u32, u32)> {
        if !(w > 0.0 && h > 0.0) {
            return None;
        }

        let (w, h) = match self {
            OutputSize::Original => (w, h),
            OutputSize::Width(n) => (n as f64, h * n as f64 / w),
            OutputSize::Height(n) => (w * n as f64 / h, n as f64),
            OutputSize::Exact(nw, nh) => (nw as f64, nh as f64),
            OutputSize::Zoom(z) => (w * z as f64, h * z as f64),
        };

        let max = u32::MAX as f64;
        let (w, h) = (w.ceil(), h.ceil());
        if (1.0..=max).contains(&w) && (1.0..=max).contains(&h) {
            Some((w as u32, h as u32))
        } else {
            None
        }
    }
}

/// Prints step durations when enabled.
struct Timer {
    enabled: bool,
}

impl Timer {
    fn run<T>(&self, step: &str, f: impl FnOnce() -> T) -> T {
        if !self.enabled {
            return f();
        }

        let start = std::time::Instant::now();
        let res = f();
        println!("{}: {:.2}ms", step, start.elapsed().as_secs_f64() * 1000.0);
        res
    }
}

static LOGGER: StderrLogger = StderrLogger {
    level: log::LevelFilter::Warn,
};

/// Writes log records to stderr.
struct StderrLogger {
    level: log::LevelFilter,
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let source = record.module_path().unwrap_or_else(|| record.target());
        eprintln!("{} [{}] {}", record.level(), source, record.args());
    }

    fn flush(&self) {}
}
