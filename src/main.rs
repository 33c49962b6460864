//! Drift Words headless runner
//!
//! Lays out text with fixed-pitch metrics, runs the simulation at 60 fps and
//! prints frames as JSON lines on stdout.
//!
//! Usage: drift-words --help

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::io::Write;
    use std::path::PathBuf;

    use clap::Parser;
    use serde::Serialize;

    use drift_words::{DriftState, MonospaceMetrics, Profile, Settings, parse_rows, tick};

    const DEFAULT_TEXT: &str = "Design engineer\nbuilding playful, useful things\nfor the web";
    const FRAME_DT: f32 = 1.0 / 60.0;

    #[derive(Debug, Parser)]
    #[command(
        name = "drift-words",
        about = "Simulate floating word rows and print frames as JSON lines",
        version
    )]
    struct Options {
        /// Text file to lay out (one row per line)
        text_path: Option<PathBuf>,

        /// Force the compact (slow, tight) profile
        #[arg(long)]
        compact: bool,

        /// Number of 60 fps frames to simulate
        #[arg(long, default_value_t = 300)]
        frames: u64,

        /// Print every Nth frame
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
        every: u64,

        /// Row width in px (also picks the profile)
        #[arg(long, default_value_t = 1280.0)]
        width: f32,

        /// Settings JSON file
        #[arg(long = "settings")]
        settings_path: Option<PathBuf>,
    }

    #[derive(Serialize)]
    struct Frame<'a> {
        tick: u64,
        profile: &'static str,
        rows: Vec<&'a [f32]>,
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let opts = Options::parse();

        let text = match &opts.text_path {
            Some(path) => std::fs::read_to_string(path)?,
            None => DEFAULT_TEXT.to_string(),
        };
        let mut settings = match &opts.settings_path {
            Some(path) => Settings::from_json(&std::fs::read_to_string(path)?)?,
            None => Settings::default(),
        };
        if opts.compact {
            settings.profile = Some(Profile::Compact);
        }
        let profile = settings.profile_for_viewport(opts.width);

        let rows = parse_rows(&text);
        let layout = MonospaceMetrics::default().layout(&rows, opts.width);
        let mut state = DriftState::new(&layout, profile.params());
        log::info!(
            "Simulating {} rows / {} words for {} frames ({} profile)",
            rows.rows.len(),
            rows.token_count(),
            opts.frames,
            profile.as_str()
        );

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        for n in 1..=opts.frames {
            tick(&mut state, FRAME_DT);
            if n % opts.every == 0 {
                let offsets = state.offsets();
                let frame = Frame {
                    tick: n,
                    profile: profile.as_str(),
                    rows: state.rows.iter().map(|r| &offsets[r.tokens.clone()]).collect(),
                };
                serde_json::to_writer(&mut out, &frame)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}
