use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use git_release::config;
use git_release::domain::Version;
use git_release::release::{self, ReleaseOptions};
use git_release::reporter::Reporter;
use git_release::resolver::VersionSource;

#[derive(clap::Parser)]
#[command(
    name = "git-release",
    about = "Automatic versioning and changelog generation, using conventional commit messages"
)]
struct Args {
    #[arg(short = 'w', long, help = "Directory containing the projects to version")]
    working_dir: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        short,
        long,
        help = "Skip changing versions in projects, changelog generation and git commit"
    )]
    dry_run: bool,

    #[arg(long, help = "Skip git dirty check")]
    skip_dirty: bool,

    #[arg(
        long,
        help = "Skip commit and git tag after updating changelog and incrementing the version"
    )]
    skip_commit: bool,

    #[arg(short, long, help = "Specify the release version manually")]
    release_as: Option<String>,

    #[arg(
        long,
        help = "Set the source of the version. Supports Default, GitTag and Csproj (case insensitive)"
    )]
    version_source: Option<String>,

    #[arg(
        short,
        long,
        help = "Do not bump the version if no significant commits (fix, feat or BREAKING) are found"
    )]
    ignore_insignificant_commits: bool,

    #[arg(
        long,
        help = "Include all commits in the changelog, not just fix, feat and breaking changes"
    )]
    changelog_all: bool,

    #[arg(long, help = "Suppress output to console")]
    silent: bool,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("git-release {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let reporter = Reporter::new(args.silent);

    // Load configuration
    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            reporter.error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let version_source = match args.version_source.as_deref() {
        None => VersionSource::Default,
        Some(input) => VersionSource::parse(input).unwrap_or_else(|| {
            reporter.warn("Selected version source is not supported. Default value will be used");
            VersionSource::Default
        }),
    };

    let release_as = match args.release_as.as_deref().map(Version::parse).transpose() {
        Ok(version) => version,
        Err(e) => {
            reporter.error(&e.to_string());
            std::process::exit(1);
        }
    };

    let working_dir = match args.working_dir {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };

    let options = ReleaseOptions {
        working_dir,
        dry_run: args.dry_run,
        skip_dirty_check: args.skip_dirty,
        skip_commit: args.skip_commit,
        release_as,
        version_source,
        ignore_insignificant: args.ignore_insignificant_commits,
        changelog_all: args.changelog_all,
    };

    match release::run(&options, &config, &reporter) {
        Ok(_) => Ok(()),
        Err(e) => {
            reporter.error(&e.to_string());
            std::process::exit(1);
        }
    }
}
