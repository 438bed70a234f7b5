//! Glissando CLI
//!
//! Usage:
//!   glissando layout <SCENE> [--style FILE] [--svg OUT]
//!   glissando steps --start P --end P [--style S] [--key FIFTHS] [--clef CLEF] [--line L]
//!   glissando schedule --start P --end P [--ease-in N] [--ease-out N] [--duration D]

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use glissando::playback::{Clef, DiatonicContext, GlideSchedule, StaffScale};
use glissando::{
    render_scene_svg, resolve_steps, EngravingStyle, EstimatedMetrics, GlissandoStyle, Scene,
    SvgConfig,
};

#[derive(Parser)]
#[command(name = "glissando")]
#[command(about = "Glissando layout and pitch stepping")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Lay out every glissando of a TOML scene
    Layout {
        /// Scene file (TOML)
        scene: PathBuf,

        /// Engraving style file (TOML)
        #[arg(short, long)]
        style: Option<PathBuf>,

        /// Also write the rendered glissandi as SVG
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// Print the semitone offsets a glide sounds
    Steps {
        #[arg(long, allow_negative_numbers = true)]
        start: i32,

        #[arg(long, allow_negative_numbers = true)]
        end: i32,

        /// chromatic, diatonic, white-keys, black-keys or portamento
        #[arg(long, default_value = "chromatic")]
        style: GlissandoStyle,

        /// Sharps (positive) or flats (negative) in the key signature
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        key: i32,

        /// treble, bass, alto or tenor
        #[arg(long, default_value = "treble")]
        clef: Clef,

        /// Staff line of the start note, in half spaces below the top line
        #[arg(long, allow_negative_numbers = true)]
        line: Option<i32>,
    },

    /// Print eased onsets of a chromatic glide
    Schedule {
        #[arg(long, allow_negative_numbers = true)]
        start: i32,

        #[arg(long, allow_negative_numbers = true)]
        end: i32,

        #[arg(long, default_value_t = 0)]
        ease_in: i32,

        #[arg(long, default_value_t = 0)]
        ease_out: i32,

        /// Glide duration
        #[arg(long, default_value_t = 1.0)]
        duration: f64,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Layout { scene, style, svg } => run_layout(&scene, style.as_ref(), svg.as_ref()),
        Command::Steps {
            start,
            end,
            style,
            key,
            clef,
            line,
        } => run_steps(start, end, style, key, clef, line),
        Command::Schedule {
            start,
            end,
            ease_in,
            ease_out,
            duration,
        } => run_schedule(start, end, ease_in, ease_out, duration),
    }
}

fn run_layout(path: &PathBuf, style_path: Option<&PathBuf>, svg_path: Option<&PathBuf>) {
    let style = match style_path {
        Some(path) => match EngravingStyle::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading style '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => EngravingStyle::default(),
    };

    let source = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    };

    let mut scene = match Scene::from_str_with_style(&source, &style) {
        Ok(scene) => scene,
        Err(e) => {
            eprint!("{}", e.format(&source, &path.display().to_string()));
            std::process::exit(1);
        }
    };

    let layouts = scene.layout_all(&style.layout);
    for (index, layout) in layouts.iter().enumerate() {
        let mode = if layout.detached { " (detached)" } else { "" };
        println!("glissando {}{}", index, mode);
        for segment in &layout.segments {
            println!(
                "  {:?} system {:?}: pos ({:.3}, {:.3}) pos2 ({:.3}, {:.3})",
                segment.role,
                segment.system.map(|s| s.0),
                segment.pos.x,
                segment.pos.y,
                segment.pos2.x,
                segment.pos2.y
            );
        }
        let bb = layout.bbox;
        println!(
            "  bbox ({:.3}, {:.3}) {:.3} x {:.3}",
            bb.x, bb.y, bb.width, bb.height
        );
        for point in &layout.attach_points {
            println!("  attach note {} at x {:.3}", point.note.0, point.x);
        }
    }

    if let Some(out) = svg_path {
        let config = SvgConfig::default().with_spatium(style.layout.spatium);
        let svg = render_scene_svg(&scene, &config, &EstimatedMetrics);
        if let Err(e) = fs::write(out, svg) {
            eprintln!("Error writing '{}': {}", out.display(), e);
            std::process::exit(1);
        }
    }
}

/// Highest staff position whose pitch does not exceed `pitch`
fn default_line(scale: &StaffScale, pitch: i32) -> i32 {
    use glissando::LinePitchMap;
    (-30..60)
        .find(|&line| scale.pitch_at_line(line) <= pitch)
        .unwrap_or(0)
}

fn run_steps(
    start: i32,
    end: i32,
    style: GlissandoStyle,
    key: i32,
    clef: Clef,
    line: Option<i32>,
) {
    let scale = StaffScale::new(clef, key);
    let start_line = line.unwrap_or_else(|| default_line(&scale, start));
    let context = DiatonicContext::new(&scale, start_line);

    match resolve_steps(start, end, style, Some(context)) {
        Some(offsets) => {
            let list: Vec<String> = offsets.iter().map(|o| o.to_string()).collect();
            println!("[{}]", list.join(", "));
        }
        None => println!("not applicable"),
    }
}

fn run_schedule(start: i32, end: i32, ease_in: i32, ease_out: i32, duration: f64) {
    let Some(offsets) = resolve_steps(start, end, GlissandoStyle::Chromatic, None) else {
        println!("not applicable");
        return;
    };
    for event in GlideSchedule::new(ease_in, ease_out).events(&offsets, duration) {
        println!("{:+} at {:.4}", event.offset, event.onset);
    }
}
