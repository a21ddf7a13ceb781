use clap::builder::styling::AnsiColor;
use clap::builder::Styles;
use clap::Parser;

const fn extra_build_info() -> &'static str {
    match option_env!("CARGO_BUILD_DESC") {
        Some(e) => e,
        None => env!("CARGO_PKG_VERSION"),
    }
}
pub const VERSION: &str = extra_build_info();
const INFO_STRING: &str = "
qualfilter version ";
const AFTER_STRING: &str = "
   ──────────────────────────────────
   length and quality filtering of .fastq reads, with before/after histograms";

// colouring of the help
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().bold())
    .usage(AnsiColor::BrightMagenta.on_default().bold())
    .literal(AnsiColor::BrightMagenta.on_default())
    .placeholder(AnsiColor::White.on_default());

#[derive(Parser, Debug)]
#[command(
    version = VERSION,
    about = format!("{}{}{}", INFO_STRING, VERSION, AFTER_STRING),
    arg_required_else_help = true,
    styles = STYLES
)]
pub struct Cli {
    /// the input .fastq file
    #[arg(short, long)]
    pub input: String,

    /// the output .fastq file, containing only the retained reads
    #[arg(short, long)]
    pub output: String,

    /// the output .svg file for the length and quality histograms
    #[arg(short, long)]
    pub graph: String,

    /// minimum read length to retain (inclusive)
    #[arg(long, visible_alias = "lmin")]
    pub length_min: usize,

    /// maximum read length to retain (inclusive)
    #[arg(long, visible_alias = "lmax")]
    pub length_max: usize,

    /// reads with a mean quality at or below this value are rejected
    #[arg(short, long, allow_negative_numbers = true)]
    pub quality_threshold: f64,

    /// open the histograms in the default viewer once they are written
    #[arg(short, long = "display", action)]
    pub d: bool,
}
