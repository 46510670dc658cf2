use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lumen_assets::{AssetPaths, decode_texture, load_shader_source};
use std::path::PathBuf;
use std::process::Command;

const SHADERS: [&str; 3] = ["basic", "outline", "light"];

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for lumen")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, assets, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Verify that every shader and texture under the resource directory loads
    Assets {
        #[arg(long, default_value = "res")]
        res_dir: PathBuf,
    },
    /// Build rustdoc for the workspace
    Doc,
    /// Run the desktop demo
    Run,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            cargo("fmt check", &["fmt", "--all", "--", "--check"])?;
            run_clippy()?;
            cargo("test", &["test", "--workspace"])?;
            check_assets(AssetPaths::default())?;
            cargo("doc", &["doc", "--workspace", "--no-deps"])?;
        }
        Commands::Fmt => cargo("fmt check", &["fmt", "--all", "--", "--check"])?,
        Commands::Clippy => run_clippy()?,
        Commands::Test => cargo("test", &["test", "--workspace"])?,
        Commands::Assets { res_dir } => check_assets(AssetPaths::new(res_dir))?,
        Commands::Doc => cargo("doc", &["doc", "--workspace", "--no-deps"])?,
        Commands::Run => cargo("run", &["run", "-p", "lumen-desktop"])?,
    }

    Ok(())
}

fn cargo(label: &str, args: &[&str]) -> Result<()> {
    println!("==> Running cargo {label}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {label} failed");
    }
    Ok(())
}

fn run_clippy() -> Result<()> {
    cargo(
        "clippy",
        &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
    )
}

fn check_assets(paths: AssetPaths) -> Result<()> {
    println!("==> Checking assets under {}", paths.root().display());
    for name in SHADERS {
        let path = paths.shader(name);
        let source = load_shader_source(&path)?;
        println!("  shader {}: {} bytes", path.display(), source.len());
    }
    for path in [paths.diffuse_texture(), paths.specular_texture()] {
        let texture =
            decode_texture(&path).with_context(|| format!("checking {}", path.display()))?;
        println!(
            "  texture {}: {}x{}, {} channels, {} mips",
            path.display(),
            texture.width,
            texture.height,
            texture.source_channels,
            texture.mip_level_count()
        );
    }
    Ok(())
}
