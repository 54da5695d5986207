use clap::Parser;

#[derive(Parser)]
#[command(version, about = "Collect free proxy nodes from a web page", long_about = None)]
pub struct Args {
    #[arg(
        short,
        long,
        default_value = "https://free.52it.de/",
        help = "Page to scrape node descriptors from"
    )]
    pub url: String,

    #[arg(short, long, default_value = "nodes", help = "Output directory")]
    pub output: String,

    #[arg(short, long, help = "Parse a local text blob instead of fetching")]
    pub input: Option<String>,

    #[arg(short, long, help = "Emit debug log")]
    pub verbose: bool,
}
