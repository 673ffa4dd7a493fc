use std::path::PathBuf;

#[derive(Debug, clap::Parser)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub subcommand: Subcommands,
    #[command(flatten)]
    pub globals: GlobalArgs,
}

#[derive(Debug, clap::Args)]
#[non_exhaustive]
pub struct GlobalArgs {
    /// Print debug information
    #[arg(short, long, global(true))]
    pub verbose: bool,
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommands {
    /// Compress a PNG image into a fractal-coded file.
    #[command(short_flag = 'c')]
    Compress(CompressArgs),
    /// Decompress a fractal-coded file into a grayscale PNG image.
    #[command(short_flag = 'd')]
    Decompress(DecompressArgs),
    /// Print information about a fractal-coded file.
    #[command(short_flag = 'I')]
    Info(InfoArgs),
}

#[derive(Debug, clap::Args)]
pub struct CompressArgs {
    /// Input image path. Color input is reduced to luma.
    pub input: PathBuf,
    /// Output file path.
    #[arg(short, long)]
    pub output: PathBuf,
    /// MSE threshold at the root partition level; higher values subdivide
    /// less and produce smaller output.
    #[arg(short, long, default_value_t = 5.0)]
    pub threshold: f32,
    /// Minimum range block side.
    #[arg(long, default_value_t = 4)]
    pub min_range: u8,
    /// Root range block side.
    #[arg(long, default_value_t = 32)]
    pub max_range: u8,
    /// Number of worker threads; defaults to the available parallelism.
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,
    /// Decode the encoded output again and report the round-trip error.
    #[arg(long)]
    pub verify: bool,
}

#[derive(Debug, clap::Args)]
pub struct DecompressArgs {
    /// Input fractal-coded file.
    pub input: PathBuf,
    /// Output PNG path.
    #[arg(short, long)]
    pub output: PathBuf,
    /// Number of decoder iterations.
    #[arg(long)]
    pub iterations: Option<u32>,
}

#[derive(Debug, clap::Args)]
pub struct InfoArgs {
    /// Input fractal-coded file.
    pub input: PathBuf,
}
